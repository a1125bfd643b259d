use crate::{Format, Oid};

/// Errors produced while planning, encoding or scanning values through a [`TypeMap`].
///
/// Codecs registered by other crates report their own failures through
/// [`TypeError::Custom`]; callers can recover the concrete error with
/// [`TypeError::downcast_ref`].
///
/// [`TypeMap`]: crate::TypeMap
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    #[error("invalid length for {type_name}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid text for {type_name}: {text:?}")]
    InvalidText {
        type_name: &'static str,
        text: String,
    },

    #[error("invalid array: {0}")]
    InvalidArray(String),

    #[error("unknown oid {0}")]
    UnknownOid(Oid),

    #[error("unable to encode {type_name} into {format:?} format for oid {oid}")]
    NoEncodePlan {
        oid: Oid,
        format: Format,
        type_name: &'static str,
    },

    #[error("unable to scan oid {oid} in {format:?} format into {type_name}")]
    NoScanPlan {
        oid: Oid,
        format: Format,
        type_name: &'static str,
    },

    #[error("plan expected {0}")]
    UnexpectedTarget(&'static str),

    #[error("wrapped plan used before its next plan was set")]
    NextPlanUnset,

    #[error("{0}")]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TypeError {
    /// Wraps an error raised by a codec or scanner defined outside this crate.
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Custom(Box::new(err))
    }

    /// Returns the wrapped custom error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Custom(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TypeError>;
