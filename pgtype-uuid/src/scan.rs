use pgtype::{Dest, ScanPlan, TypeError, WrappedDest, WrappedScanPlan};

use crate::value::{NullUuid, Uuid};

/// Claims `uuid::Uuid` and `Option<uuid::Uuid>` destinations for the `uuid`
/// codec; declines everything else.
pub fn try_wrap_uuid_scan_plan(
    target: &Dest<'_>,
) -> Option<(Box<dyn WrappedScanPlan>, WrappedDest)> {
    if target.is::<uuid::Uuid>() {
        return Some((
            Box::<WrapUuidScanPlan>::default() as Box<dyn WrappedScanPlan>,
            WrappedDest::uuid(Uuid::default()),
        ));
    }

    if target.is::<Option<uuid::Uuid>>() {
        return Some((
            Box::<WrapNullUuidScanPlan>::default() as Box<dyn WrappedScanPlan>,
            WrappedDest::uuid(NullUuid::default()),
        ));
    }

    None
}

#[derive(Default)]
struct WrapUuidScanPlan {
    next: Option<Box<dyn ScanPlan>>,
}

impl ScanPlan for WrapUuidScanPlan {
    fn scan(&self, src: Option<&[u8]>, dst: &mut Dest<'_>) -> pgtype::Result<()> {
        let next = self.next.as_ref().ok_or(TypeError::NextPlanUnset)?;
        let target = dst
            .downcast_mut::<uuid::Uuid>()
            .ok_or(TypeError::UnexpectedTarget("uuid::Uuid"))?;

        let mut uuid = Uuid::from(*target);
        next.scan(src, &mut Dest::Uuid(&mut uuid))?;
        *target = uuid.into();

        Ok(())
    }
}

impl WrappedScanPlan for WrapUuidScanPlan {
    fn set_next(&mut self, next: Box<dyn ScanPlan>) {
        self.next = Some(next);
    }
}

#[derive(Default)]
struct WrapNullUuidScanPlan {
    next: Option<Box<dyn ScanPlan>>,
}

impl ScanPlan for WrapNullUuidScanPlan {
    fn scan(&self, src: Option<&[u8]>, dst: &mut Dest<'_>) -> pgtype::Result<()> {
        let next = self.next.as_ref().ok_or(TypeError::NextPlanUnset)?;
        let target = dst
            .downcast_mut::<Option<uuid::Uuid>>()
            .ok_or(TypeError::UnexpectedTarget("Option<uuid::Uuid>"))?;

        let mut uuid = NullUuid::from(*target);
        next.scan(src, &mut Dest::Uuid(&mut uuid))?;
        *target = uuid.into();

        Ok(())
    }
}

impl WrappedScanPlan for WrapNullUuidScanPlan {
    fn set_next(&mut self, next: Box<dyn ScanPlan>) {
        self.next = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declines_other_types() {
        let mut bytes = [0u8; 16];
        assert!(try_wrap_uuid_scan_plan(&Dest::value(&mut bytes)).is_none());

        let mut text = String::new();
        assert!(try_wrap_uuid_scan_plan(&Dest::value(&mut text)).is_none());
    }

    #[test]
    fn claims_uuid_targets() {
        let mut uuid = uuid::Uuid::nil();
        assert!(try_wrap_uuid_scan_plan(&Dest::value(&mut uuid)).is_some());

        let mut uuid: Option<uuid::Uuid> = None;
        assert!(try_wrap_uuid_scan_plan(&Dest::value(&mut uuid)).is_some());
    }
}
