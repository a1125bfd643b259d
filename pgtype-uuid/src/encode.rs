use pgtype::{Arg, EncodePlan, IsNull, TypeError, WrappedArg, WrappedEncodePlan};

use crate::value::{NullUuid, Uuid};

/// Claims `uuid::Uuid` and `Option<uuid::Uuid>` parameters for the `uuid`
/// codec; declines everything else.
pub fn try_wrap_uuid_encode_plan(
    value: &Arg<'_>,
) -> Option<(Box<dyn WrappedEncodePlan>, WrappedArg)> {
    if let Some(uuid) = value.downcast_ref::<uuid::Uuid>() {
        return Some((
            Box::<WrapUuidEncodePlan>::default() as Box<dyn WrappedEncodePlan>,
            WrappedArg::uuid(Uuid::from(*uuid)),
        ));
    }

    if let Some(uuid) = value.downcast_ref::<Option<uuid::Uuid>>() {
        return Some((
            Box::<WrapNullUuidEncodePlan>::default() as Box<dyn WrappedEncodePlan>,
            WrappedArg::uuid(NullUuid::from(*uuid)),
        ));
    }

    None
}

#[derive(Default)]
struct WrapUuidEncodePlan {
    next: Option<Box<dyn EncodePlan>>,
}

impl EncodePlan for WrapUuidEncodePlan {
    fn encode(&self, value: &Arg<'_>, buf: &mut Vec<u8>) -> pgtype::Result<IsNull> {
        let uuid = value
            .downcast_ref::<uuid::Uuid>()
            .ok_or(TypeError::UnexpectedTarget("uuid::Uuid"))?;
        let next = self.next.as_ref().ok_or(TypeError::NextPlanUnset)?;

        next.encode(&Arg::Uuid(&Uuid::from(*uuid)), buf)
    }
}

impl WrappedEncodePlan for WrapUuidEncodePlan {
    fn set_next(&mut self, next: Box<dyn EncodePlan>) {
        self.next = Some(next);
    }
}

#[derive(Default)]
struct WrapNullUuidEncodePlan {
    next: Option<Box<dyn EncodePlan>>,
}

impl EncodePlan for WrapNullUuidEncodePlan {
    fn encode(&self, value: &Arg<'_>, buf: &mut Vec<u8>) -> pgtype::Result<IsNull> {
        let uuid = value
            .downcast_ref::<Option<uuid::Uuid>>()
            .ok_or(TypeError::UnexpectedTarget("Option<uuid::Uuid>"))?;
        let next = self.next.as_ref().ok_or(TypeError::NextPlanUnset)?;

        next.encode(&Arg::Uuid(&NullUuid::from(*uuid)), buf)
    }
}

impl WrappedEncodePlan for WrapNullUuidEncodePlan {
    fn set_next(&mut self, next: Box<dyn EncodePlan>) {
        self.next = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declines_other_types() {
        assert!(try_wrap_uuid_encode_plan(&Arg::value(&42i32)).is_none());
        assert!(try_wrap_uuid_encode_plan(&Arg::value(&[0u8; 16])).is_none());
        assert!(try_wrap_uuid_encode_plan(&Arg::Null).is_none());
    }

    #[test]
    fn unset_next_plan() {
        let plan = WrapUuidEncodePlan::default();
        let err = plan
            .encode(&Arg::value(&uuid::Uuid::nil()), &mut Vec::new())
            .unwrap_err();

        assert!(matches!(err, TypeError::NextPlanUnset));
    }
}
