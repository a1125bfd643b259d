use std::{collections::HashMap, fmt, sync::Arc};

use tracing::trace;

use crate::{
    array::ArrayCodec,
    codec::Type,
    error::{Result, TypeError},
    oid::{Format, Oid, UUID_ARRAY_OID, UUID_OID},
    plan::{
        Arg, Dest, EncodePlan, IsNull, ScanPlan, TryWrapEncodePlanFn, TryWrapScanPlanFn, Value,
        WrappedEncodePlan, WrappedScanPlan,
    },
    uuid::UuidCodec,
};

/// Registry of PostgreSQL types and the plans used to convert Rust values
/// to and from their wire formats.
///
/// A map is owned by its caller, typically one per connection. Mutation
/// (registering types, editing the try-wrap chains) happens through `&mut`
/// during setup; afterwards the map can be shared for concurrent planning.
///
/// Planning for an oid first asks the registered type's codec. When the codec
/// declines, each function in the matching try-wrap chain is offered the value
/// in order; the first one to claim it gets its next plan resolved for the
/// rewrapped value.
#[derive(Clone)]
pub struct TypeMap {
    oid_to_type: HashMap<Oid, Arc<Type>>,
    name_to_type: HashMap<String, Arc<Type>>,
    pub try_wrap_encode_plan_fns: Vec<TryWrapEncodePlanFn>,
    pub try_wrap_scan_plan_fns: Vec<TryWrapScanPlanFn>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.name_to_type.keys().collect::<Vec<_>>();
        names.sort();

        f.debug_struct("TypeMap")
            .field("types", &names)
            .field("try_wrap_encode_plan_fns", &self.try_wrap_encode_plan_fns.len())
            .field("try_wrap_scan_plan_fns", &self.try_wrap_scan_plan_fns.len())
            .finish()
    }
}

impl TypeMap {
    /// Creates a map with the built-in `uuid` and `_uuid` types.
    pub fn new() -> Self {
        let mut map = Self {
            oid_to_type: HashMap::new(),
            name_to_type: HashMap::new(),
            try_wrap_encode_plan_fns: Vec::new(),
            try_wrap_scan_plan_fns: Vec::new(),
        };

        map.register_type(Type::new("uuid", UUID_OID, UuidCodec));
        map.register_type(Type::new("_uuid", UUID_ARRAY_OID, ArrayCodec::new(UUID_OID)));

        map
    }

    /// Registers `ty`, replacing any type previously registered under the
    /// same oid or name.
    pub fn register_type(&mut self, ty: Type) {
        trace!(oid = ty.oid, name = %ty.name, "register type");

        let ty = Arc::new(ty);
        self.name_to_type.insert(ty.name.to_owned(), ty.clone());
        self.oid_to_type.insert(ty.oid, ty);
    }

    pub fn type_for_oid(&self, oid: Oid) -> Option<&Type> {
        self.oid_to_type.get(&oid).map(|ty| &**ty)
    }

    pub fn type_for_name(&self, name: &str) -> Option<&Type> {
        self.name_to_type.get(name).map(|ty| &**ty)
    }

    /// Format the codec registered for `oid` prefers, text for unknown oids.
    pub fn format_code_for_oid(&self, oid: Oid) -> Format {
        self.type_for_oid(oid)
            .map(|ty| ty.codec.preferred_format())
            .unwrap_or(Format::Text)
    }

    pub fn plan_encode(
        &self,
        oid: Oid,
        format: Format,
        value: &Arg<'_>,
    ) -> Option<Box<dyn EncodePlan>> {
        if let Some(plan) = self
            .type_for_oid(oid)
            .and_then(|ty| ty.codec.plan_encode(self, oid, format, value))
        {
            return Some(plan);
        }

        for try_wrap in &self.try_wrap_encode_plan_fns {
            let Some((mut plan, next_value)) = try_wrap(value) else {
                continue;
            };

            trace!(oid, ?format, value = value.type_name(), "wrap encode plan");

            if let Some(next) = self.plan_encode(oid, format, &next_value.as_arg()) {
                plan.set_next(next);
                return Some(Box::new(WrappedEncode(plan)));
            }
        }

        None
    }

    pub fn plan_scan(
        &self,
        oid: Oid,
        format: Format,
        target: &mut Dest<'_>,
    ) -> Option<Box<dyn ScanPlan>> {
        if let Some(plan) = self
            .type_for_oid(oid)
            .and_then(|ty| ty.codec.plan_scan(self, oid, format, target))
        {
            return Some(plan);
        }

        for try_wrap in &self.try_wrap_scan_plan_fns {
            let Some((mut plan, mut next_target)) = try_wrap(target) else {
                continue;
            };

            trace!(oid, ?format, target = target.type_name(), "wrap scan plan");

            if let Some(next) = self.plan_scan(oid, format, &mut next_target.as_dest()) {
                plan.set_next(next);
                return Some(Box::new(WrappedScan(plan)));
            }
        }

        None
    }

    /// Encodes `value` for a parameter of type `oid`; `None` is SQL `NULL`.
    pub fn encode(&self, oid: Oid, format: Format, value: &Arg<'_>) -> Result<Option<Vec<u8>>> {
        if let Arg::Null = value {
            return Ok(None);
        }

        let plan = self
            .plan_encode(oid, format, value)
            .ok_or(TypeError::NoEncodePlan {
                oid,
                format,
                type_name: value.type_name(),
            })?;

        let mut buf = Vec::new();
        match plan.encode(value, &mut buf)? {
            IsNull::Yes => Ok(None),
            IsNull::No => Ok(Some(buf)),
        }
    }

    /// Scans a column of type `oid` into `target`.
    pub fn scan(
        &self,
        oid: Oid,
        format: Format,
        src: Option<&[u8]>,
        target: &mut Dest<'_>,
    ) -> Result<()> {
        let plan = self
            .plan_scan(oid, format, target)
            .ok_or(TypeError::NoScanPlan {
                oid,
                format,
                type_name: target.type_name(),
            })?;

        plan.scan(src, target)
    }

    /// Decodes a column of type `oid` without a destination type.
    pub fn decode_value(
        &self,
        oid: Oid,
        format: Format,
        src: Option<&[u8]>,
    ) -> Result<Option<Value>> {
        let ty = self.type_for_oid(oid).ok_or(TypeError::UnknownOid(oid))?;

        ty.codec.decode_value(self, oid, format, src)
    }
}

struct WrappedEncode(Box<dyn WrappedEncodePlan>);

impl EncodePlan for WrappedEncode {
    fn encode(&self, value: &Arg<'_>, buf: &mut Vec<u8>) -> Result<IsNull> {
        self.0.encode(value, buf)
    }
}

struct WrappedScan(Box<dyn WrappedScanPlan>);

impl ScanPlan for WrappedScan {
    fn scan(&self, src: Option<&[u8]>, dst: &mut Dest<'_>) -> Result<()> {
        self.0.scan(src, dst)
    }
}
