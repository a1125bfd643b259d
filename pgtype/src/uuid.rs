use uuid::fmt::{Hyphenated, Simple};

use crate::{
    codec::Codec,
    error::{Result, TypeError},
    map::TypeMap,
    oid::{Format, Oid},
    plan::{Arg, Dest, EncodePlan, IsNull, ScanPlan, Value},
};

const UUID_LEN: usize = 16;

/// Wire representation of a PostgreSQL `uuid`.
///
/// `valid == false` stands for SQL `NULL`; `bytes` is meaningless then.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PgUuid {
    pub bytes: [u8; 16],
    pub valid: bool,
}

impl PgUuid {
    pub fn new(bytes: [u8; 16]) -> Self {
        Self { bytes, valid: true }
    }

    pub fn null() -> Self {
        Self::default()
    }
}

/// Implemented by destinations the native `uuid` codec can scan into.
pub trait UuidScanner {
    fn scan_uuid(&mut self, value: PgUuid) -> Result<()>;
}

/// Implemented by values the native `uuid` codec can encode.
pub trait UuidValuer {
    fn uuid_value(&self) -> Result<PgUuid>;
}

impl UuidScanner for PgUuid {
    fn scan_uuid(&mut self, value: PgUuid) -> Result<()> {
        *self = value;
        Ok(())
    }
}

impl UuidValuer for PgUuid {
    fn uuid_value(&self) -> Result<PgUuid> {
        Ok(*self)
    }
}

/// Native codec for the `uuid` type, in both binary and text formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCodec;

impl Codec for UuidCodec {
    fn preferred_format(&self) -> Format {
        Format::Binary
    }

    fn plan_encode(
        &self,
        _map: &TypeMap,
        _oid: Oid,
        format: Format,
        value: &Arg<'_>,
    ) -> Option<Box<dyn EncodePlan>> {
        match value {
            Arg::Uuid(_) => Some(Box::new(EncodeUuidPlan { format })),
            value if value.is::<PgUuid>() => Some(Box::new(EncodeUuidPlan { format })),
            _ => None,
        }
    }

    fn plan_scan(
        &self,
        _map: &TypeMap,
        _oid: Oid,
        format: Format,
        target: &mut Dest<'_>,
    ) -> Option<Box<dyn ScanPlan>> {
        match target {
            Dest::Uuid(_) => Some(Box::new(ScanUuidPlan { format })),
            target if target.is::<PgUuid>() => Some(Box::new(ScanUuidPlan { format })),
            _ => None,
        }
    }

    fn decode_value(
        &self,
        _map: &TypeMap,
        _oid: Oid,
        format: Format,
        src: Option<&[u8]>,
    ) -> Result<Option<Value>> {
        let Some(src) = src else {
            return Ok(None);
        };

        Ok(Some(Box::new(decode(format, src)?)))
    }
}

struct EncodeUuidPlan {
    format: Format,
}

impl EncodePlan for EncodeUuidPlan {
    fn encode(&self, value: &Arg<'_>, buf: &mut Vec<u8>) -> Result<IsNull> {
        let uuid = match value {
            Arg::Uuid(valuer) => valuer.uuid_value()?,
            value => *value
                .downcast_ref::<PgUuid>()
                .ok_or(TypeError::UnexpectedTarget("UuidValuer"))?,
        };

        if !uuid.valid {
            return Ok(IsNull::Yes);
        }

        match self.format {
            Format::Binary => buf.extend_from_slice(&uuid.bytes),
            Format::Text => encode_text(uuid.bytes, buf),
        }

        Ok(IsNull::No)
    }
}

struct ScanUuidPlan {
    format: Format,
}

impl ScanPlan for ScanUuidPlan {
    fn scan(&self, src: Option<&[u8]>, dst: &mut Dest<'_>) -> Result<()> {
        let uuid = match src {
            Some(src) => PgUuid::new(decode(self.format, src)?),
            None => PgUuid::null(),
        };

        match dst {
            Dest::Uuid(scanner) => scanner.scan_uuid(uuid),
            dst => dst
                .downcast_mut::<PgUuid>()
                .ok_or(TypeError::UnexpectedTarget("UuidScanner"))?
                .scan_uuid(uuid),
        }
    }
}

fn decode(format: Format, src: &[u8]) -> Result<[u8; 16]> {
    match format {
        Format::Binary => {
            src.try_into()
                .map_err(|_| TypeError::InvalidLength {
                    type_name: "uuid",
                    expected: UUID_LEN,
                    actual: src.len(),
                })
        }
        Format::Text => parse_text(src),
    }
}

fn invalid_text(src: &[u8]) -> TypeError {
    TypeError::InvalidText {
        type_name: "uuid",
        text: String::from_utf8_lossy(src).into_owned(),
    }
}

/// Parses the hyphenated and simple text forms, optionally wrapped in braces.
fn parse_text(src: &[u8]) -> Result<[u8; 16]> {
    let text = match src {
        [b'{', inner @ .., b'}'] => inner,
        src => src,
    };

    // try_parse_ascii also takes braced and urn forms, which must not nest here
    if !matches!(text.len(), Simple::LENGTH | Hyphenated::LENGTH) {
        return Err(invalid_text(src));
    }

    uuid::Uuid::try_parse_ascii(text)
        .map(uuid::Uuid::into_bytes)
        .map_err(|_| invalid_text(src))
}

fn encode_text(bytes: [u8; 16], buf: &mut Vec<u8>) {
    let mut text = uuid::Uuid::encode_buffer();
    let text = uuid::Uuid::from_bytes(bytes)
        .hyphenated()
        .encode_lower(&mut text);
    buf.extend_from_slice(text.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTES: [u8; 16] = [
        0x55, 0x0e, 0x84, 0x00, 0xe2, 0x9b, 0x41, 0xd4, 0xa7, 0x16, 0x44, 0x66, 0x55, 0x44, 0x00,
        0x00,
    ];

    #[test]
    fn text_forms() {
        let mut buf = Vec::new();
        encode_text(BYTES, &mut buf);
        assert_eq!(buf, b"550e8400-e29b-41d4-a716-446655440000".to_vec());
        assert_eq!(
            parse_text(b"550e8400-e29b-41d4-a716-446655440000").unwrap(),
            BYTES
        );
        assert_eq!(parse_text(b"550E8400E29B41D4A716446655440000").unwrap(), BYTES);
        assert_eq!(
            parse_text(b"{550e8400-e29b-41d4-a716-446655440000}").unwrap(),
            BYTES
        );
    }

    #[test]
    fn text_rejects_garbage() {
        assert!(parse_text(b"550e8400").is_err());
        assert!(parse_text(b"-550e8400e29b41d4a716446655440000").is_err());
        assert!(parse_text(b"550e8400-e29b-41d4-a716-44665544000g").is_err());
        assert!(parse_text(b"{{550e8400-e29b-41d4-a716-446655440000}}").is_err());
        assert!(parse_text(b"urn:uuid:550e8400-e29b-41d4-a716-446655440000").is_err());
    }

    #[test]
    fn text_rejects_misplaced_hyphens() {
        assert!(parse_text(b"5-5-0e8400e29b41d4a716446655440000").is_err());
        assert!(parse_text(b"550e8400--e29b41d4a716446655440000").is_err());
        assert!(parse_text(b"550e840-0e29b-41d4-a716-446655440000").is_err());
    }
}
