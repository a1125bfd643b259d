use std::{fmt, str::FromStr};

use pgtype::{PgUuid, UuidScanner, UuidValuer};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UuidError};

/// A `uuid::Uuid` in the shape the `uuid` codec scans and encodes.
///
/// Conversions in both directions copy the 16 bytes unchanged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "uuid::Uuid", into = "uuid::Uuid")]
pub struct Uuid(pub [u8; 16]);

/// An `Option<uuid::Uuid>` in the shape the `uuid` codec scans and encodes.
///
/// `valid == false` is SQL `NULL`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<uuid::Uuid>", into = "Option<uuid::Uuid>")]
pub struct NullUuid {
    pub uuid: [u8; 16],
    pub valid: bool,
}

impl UuidScanner for Uuid {
    fn scan_uuid(&mut self, value: PgUuid) -> pgtype::Result<()> {
        if !value.valid {
            return Err(UuidError::NullIntoNonNullable.into());
        }

        self.0 = value.bytes;
        Ok(())
    }
}

impl UuidValuer for Uuid {
    fn uuid_value(&self) -> pgtype::Result<PgUuid> {
        Ok(PgUuid::new(self.0))
    }
}

impl UuidScanner for NullUuid {
    fn scan_uuid(&mut self, value: PgUuid) -> pgtype::Result<()> {
        *self = NullUuid {
            uuid: value.bytes,
            valid: value.valid,
        };
        Ok(())
    }
}

impl UuidValuer for NullUuid {
    fn uuid_value(&self) -> pgtype::Result<PgUuid> {
        Ok(PgUuid {
            bytes: self.uuid,
            valid: self.valid,
        })
    }
}

impl From<uuid::Uuid> for Uuid {
    fn from(value: uuid::Uuid) -> Self {
        Self(value.into_bytes())
    }
}

impl From<Uuid> for uuid::Uuid {
    fn from(value: Uuid) -> Self {
        uuid::Uuid::from_bytes(value.0)
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(value: Uuid) -> Self {
        value.0
    }
}

impl From<Option<uuid::Uuid>> for NullUuid {
    fn from(value: Option<uuid::Uuid>) -> Self {
        match value {
            Some(uuid) => NullUuid {
                uuid: uuid.into_bytes(),
                valid: true,
            },
            None => NullUuid::default(),
        }
    }
}

impl From<NullUuid> for Option<uuid::Uuid> {
    fn from(value: NullUuid) -> Self {
        value.valid.then(|| uuid::Uuid::from_bytes(value.uuid))
    }
}

impl From<Uuid> for NullUuid {
    fn from(value: Uuid) -> Self {
        NullUuid {
            uuid: value.0,
            valid: true,
        }
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&uuid::Uuid::from(*self), f)
    }
}

impl FromStr for Uuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(uuid::Uuid::parse_str(s)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn wrapping_keeps_bytes() {
        let original = uuid::Uuid::parse_str(TEXT).unwrap();
        let wrapped = Uuid::from(original);

        assert_eq!(&wrapped.0, original.as_bytes());
        assert_eq!(uuid::Uuid::from(wrapped), original);
        assert_eq!(wrapped.to_string(), TEXT);
        assert_eq!(TEXT.parse::<Uuid>().unwrap(), wrapped);
        assert!(matches!(
            "not-a-uuid".parse::<Uuid>(),
            Err(UuidError::Parse(_))
        ));
    }

    #[test]
    fn wrapping_keeps_validity() {
        let original = uuid::Uuid::parse_str(TEXT).unwrap();

        let present = NullUuid::from(Some(original));
        assert!(present.valid);
        assert_eq!(Option::<uuid::Uuid>::from(present), Some(original));

        let absent = NullUuid::from(None);
        assert!(!absent.valid);
        assert_eq!(Option::<uuid::Uuid>::from(absent), None);

        let garbage = NullUuid {
            uuid: [0xff; 16],
            valid: false,
        };
        assert_eq!(Option::<uuid::Uuid>::from(garbage), None);
    }

    #[test]
    fn scan_rejects_null() {
        let mut wrapped = Uuid([1; 16]);
        let err = wrapped.scan_uuid(PgUuid::null()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<UuidError>(),
            Some(&UuidError::NullIntoNonNullable)
        );
        assert_eq!(wrapped, Uuid([1; 16]));

        wrapped.scan_uuid(PgUuid::new([2; 16])).unwrap();
        assert_eq!(wrapped.uuid_value().unwrap(), PgUuid::new([2; 16]));
    }

    #[test]
    fn nullable_scan_never_fails() {
        let mut wrapped = NullUuid::from(Uuid([1; 16]));

        wrapped.scan_uuid(PgUuid::null()).unwrap();
        assert!(!wrapped.valid);
        assert!(!wrapped.uuid_value().unwrap().valid);

        wrapped.scan_uuid(PgUuid::new([3; 16])).unwrap();
        assert_eq!(wrapped.uuid_value().unwrap(), PgUuid::new([3; 16]));
    }

    #[test]
    fn serde_matches_uuid() {
        let original = uuid::Uuid::parse_str(TEXT).unwrap();

        assert_eq!(
            serde_json::to_string(&Uuid::from(original)).unwrap(),
            serde_json::to_string(&original).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&NullUuid::from(None)).unwrap(),
            "null"
        );
        assert_eq!(
            serde_json::from_str::<NullUuid>(&format!("\"{TEXT}\"")).unwrap(),
            NullUuid::from(Some(original))
        );
    }
}
