use pgtype::{Format, Oid, TypeError};

/// Errors raised by the `uuid::Uuid` integration itself.
///
/// They travel through the type map as [`TypeError::Custom`]; use
/// [`TypeError::downcast_ref`] to get them back.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum UuidError {
    #[error("cannot scan NULL into non-nullable uuid::Uuid")]
    NullIntoNonNullable,

    #[error("no scan plan found for oid {oid} in {format:?} format")]
    NoPlanFound { oid: Oid, format: Format },

    #[error("uuid `{0}`")]
    Parse(#[from] uuid::Error),
}

impl From<UuidError> for TypeError {
    fn from(err: UuidError) -> Self {
        TypeError::custom(err)
    }
}

pub type Result<T> = std::result::Result<T, UuidError>;
