use std::{fmt, sync::Arc};

use crate::{
    error::Result,
    map::TypeMap,
    oid::{Format, Oid},
    plan::{Arg, Dest, EncodePlan, ScanPlan, Value},
};

/// Encode and decode behavior of one PostgreSQL type.
///
/// Every codec handles both text and binary formats. Plans are resolved per
/// call; `map` is passed in so that composite codecs (arrays) can resolve
/// their element plans through the same registry.
pub trait Codec: Send + Sync {
    fn preferred_format(&self) -> Format;

    /// Returns `None` when this codec cannot encode `value`.
    fn plan_encode(
        &self,
        map: &TypeMap,
        oid: Oid,
        format: Format,
        value: &Arg<'_>,
    ) -> Option<Box<dyn EncodePlan>>;

    /// Returns `None` when this codec cannot scan into `target`.
    fn plan_scan(
        &self,
        map: &TypeMap,
        oid: Oid,
        format: Format,
        target: &mut Dest<'_>,
    ) -> Option<Box<dyn ScanPlan>>;

    /// Decodes `src` without a destination type; `None` src is SQL `NULL`.
    fn decode_value(
        &self,
        map: &TypeMap,
        oid: Oid,
        format: Format,
        src: Option<&[u8]>,
    ) -> Result<Option<Value>>;
}

/// A named type registered in a [`TypeMap`].
#[derive(Clone)]
pub struct Type {
    pub name: String,
    pub oid: Oid,
    pub codec: Arc<dyn Codec>,
}

impl Type {
    pub fn new(name: impl Into<String>, oid: Oid, codec: impl Codec + 'static) -> Self {
        Self {
            name: name.into(),
            oid,
            codec: Arc::new(codec),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("oid", &self.oid)
            .finish_non_exhaustive()
    }
}
