//! `uuid::Uuid` support for the [`pgtype`] type map.
//!
//! [`register`] teaches a [`TypeMap`] to encode and scan `uuid::Uuid` and
//! `Option<uuid::Uuid>`, alone or as array elements, and makes the `uuid` type
//! decode to `uuid::Uuid` when no destination type is given.
//!
//! ```
//! use pgtype::{Arg, Dest, Format, TypeMap, UUID_OID};
//!
//! let mut map = TypeMap::new();
//! pgtype_uuid::register(&mut map);
//!
//! let id = uuid::Uuid::new_v4();
//! let encoded = map.encode(UUID_OID, Format::Binary, &Arg::value(&id))?;
//!
//! let mut scanned = uuid::Uuid::nil();
//! map.scan(UUID_OID, Format::Binary, encoded.as_deref(), &mut Dest::value(&mut scanned))?;
//! assert_eq!(scanned, id);
//! # Ok::<(), pgtype::TypeError>(())
//! ```
#![forbid(unsafe_code)]

mod codec;
mod encode;
mod error;
#[cfg(feature = "pg")]
mod pg;
mod scan;
mod value;

pub use codec::UuidCodec;
pub use encode::try_wrap_uuid_encode_plan;
pub use error::{Result, UuidError};
pub use scan::try_wrap_uuid_scan_plan;
pub use value::{NullUuid, Uuid};

use pgtype::{Type, TypeMap, UUID_OID};

/// Registers `uuid::Uuid` support on `map`.
///
/// Both try-wrap functions go to the front of their chains, ahead of anything
/// registered before. The `uuid` type is replaced by one backed by
/// [`UuidCodec`]; `_uuid` keeps working since array codecs resolve their
/// element type through the map.
pub fn register(map: &mut TypeMap) {
    map.try_wrap_encode_plan_fns.insert(0, try_wrap_uuid_encode_plan);
    map.try_wrap_scan_plan_fns.insert(0, try_wrap_uuid_scan_plan);

    map.register_type(Type::new("uuid", UUID_OID, UuidCodec::default()));

    tracing::debug!(oid = UUID_OID, "registered uuid::Uuid support");
}
