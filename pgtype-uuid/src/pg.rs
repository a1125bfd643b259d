//! sqlx `Postgres` support for [`Uuid`] and [`NullUuid`], delegating to the
//! `uuid` feature of sqlx.

use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type, ValueRef,
};

use crate::{
    error::UuidError,
    value::{NullUuid, Uuid},
};

impl Type<Postgres> for Uuid {
    fn type_info() -> PgTypeInfo {
        <uuid::Uuid as Type<Postgres>>::type_info()
    }
}

impl PgHasArrayType for Uuid {
    fn array_type_info() -> PgTypeInfo {
        <uuid::Uuid as PgHasArrayType>::array_type_info()
    }
}

impl Encode<'_, Postgres> for Uuid {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <uuid::Uuid as Encode<'_, Postgres>>::encode_by_ref(&uuid::Uuid::from(*self), buf)
    }
}

impl<'r> Decode<'r, Postgres> for Uuid {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Err(Box::new(UuidError::NullIntoNonNullable));
        }

        Ok(<uuid::Uuid as Decode<'r, Postgres>>::decode(value)?.into())
    }
}

impl Type<Postgres> for NullUuid {
    fn type_info() -> PgTypeInfo {
        <uuid::Uuid as Type<Postgres>>::type_info()
    }
}

impl PgHasArrayType for NullUuid {
    fn array_type_info() -> PgTypeInfo {
        <uuid::Uuid as PgHasArrayType>::array_type_info()
    }
}

impl Encode<'_, Postgres> for NullUuid {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        match Option::<uuid::Uuid>::from(*self) {
            Some(uuid) => <uuid::Uuid as Encode<'_, Postgres>>::encode_by_ref(&uuid, buf),
            None => Ok(IsNull::Yes),
        }
    }
}

impl<'r> Decode<'r, Postgres> for NullUuid {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(NullUuid::default());
        }

        Ok(Some(<uuid::Uuid as Decode<'r, Postgres>>::decode(value)?).into())
    }
}
