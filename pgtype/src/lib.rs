//! PostgreSQL type map.
//!
//! A [`TypeMap`] maps type oids to [`Codec`]s and resolves, per call, the
//! [`EncodePlan`] or [`ScanPlan`] that converts one Rust value to or from the
//! wire format of a parameter or column. Types the built-in codecs do not know
//! plug in through the try-wrap chains: functions that claim a value, rewrap it
//! into something a codec understands and delegate to the plan resolved for the
//! rewrapped value.
//!
//! ```
//! use pgtype::{Arg, Dest, Format, PgUuid, TypeMap, UUID_OID};
//!
//! let map = TypeMap::new();
//! let value = PgUuid::new([7; 16]);
//! let encoded = map.encode(UUID_OID, Format::Binary, &Arg::value(&value))?;
//!
//! let mut decoded = PgUuid::default();
//! map.scan(UUID_OID, Format::Binary, encoded.as_deref(), &mut Dest::value(&mut decoded))?;
//! assert_eq!(decoded, value);
//! # Ok::<(), pgtype::TypeError>(())
//! ```
#![forbid(unsafe_code)]

mod array;
mod codec;
mod error;
mod map;
mod oid;
mod plan;
mod uuid;

pub use array::ArrayCodec;
pub use codec::{Codec, Type};
pub use error::{Result, TypeError};
pub use map::TypeMap;
pub use oid::{Format, Oid, UUID_ARRAY_OID, UUID_OID};
pub use plan::{
    Arg, ArraySink, ArraySource, Dest, EncodePlan, IsNull, ScanPlan, TryWrapEncodePlanFn,
    TryWrapScanPlanFn, Value, WrappedArg, WrappedDest, WrappedEncodePlan, WrappedScanPlan,
};
pub use self::uuid::{PgUuid, UuidCodec, UuidScanner, UuidValuer};
