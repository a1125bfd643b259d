use pgtype::{Arg, Codec, Dest, EncodePlan, Format, Oid, ScanPlan, TypeMap, Value};

use crate::error::UuidError;

/// The native `uuid` codec, except that [`Codec::decode_value`] yields
/// `uuid::Uuid` instead of raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCodec(pgtype::UuidCodec);

impl Codec for UuidCodec {
    fn preferred_format(&self) -> Format {
        self.0.preferred_format()
    }

    fn plan_encode(
        &self,
        map: &TypeMap,
        oid: Oid,
        format: Format,
        value: &Arg<'_>,
    ) -> Option<Box<dyn EncodePlan>> {
        self.0.plan_encode(map, oid, format, value)
    }

    fn plan_scan(
        &self,
        map: &TypeMap,
        oid: Oid,
        format: Format,
        target: &mut Dest<'_>,
    ) -> Option<Box<dyn ScanPlan>> {
        self.0.plan_scan(map, oid, format, target)
    }

    fn decode_value(
        &self,
        map: &TypeMap,
        oid: Oid,
        format: Format,
        src: Option<&[u8]>,
    ) -> pgtype::Result<Option<Value>> {
        let Some(src) = src else {
            return Ok(None);
        };

        let mut target = uuid::Uuid::nil();
        let plan = map
            .plan_scan(oid, format, &mut Dest::value(&mut target))
            .ok_or(UuidError::NoPlanFound { oid, format })?;

        plan.scan(Some(src), &mut Dest::value(&mut target))?;

        Ok(Some(Box::new(target)))
    }
}
