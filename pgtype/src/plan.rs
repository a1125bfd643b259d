use std::any::{type_name, Any};

use crate::{
    error::Result,
    uuid::{UuidScanner, UuidValuer},
};

/// A decoded value whose Rust type is chosen by the codec.
pub type Value = Box<dyn Any + Send + Sync>;

/// Whether an encode plan produced a value or SQL `NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsNull {
    Yes,
    No,
}

/// An outgoing parameter as seen by encode plans.
///
/// `Any` carries arbitrary Rust values that plans recognize by downcasting.
/// The other variants carry capabilities that codecs understand without
/// knowing the concrete type behind them.
pub enum Arg<'a> {
    Null,
    Any {
        value: &'a dyn Any,
        type_name: &'static str,
    },
    Uuid(&'a dyn UuidValuer),
    Array(&'a dyn ArraySource),
}

impl<'a> Arg<'a> {
    pub fn value<T: Any>(value: &'a T) -> Self {
        Arg::Any {
            value,
            type_name: type_name::<T>(),
        }
    }

    pub fn array<T: Any>(values: &'a Vec<T>) -> Self {
        Arg::Array(values)
    }

    pub fn is<T: Any>(&self) -> bool {
        matches!(*self, Arg::Any { value, .. } if value.is::<T>())
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match *self {
            Arg::Any { value, .. } => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Any { type_name, .. } => *type_name,
            Arg::Uuid(_) => "dyn UuidValuer",
            Arg::Array(_) => "dyn ArraySource",
        }
    }
}

/// A scan destination as seen by scan plans.
pub enum Dest<'a> {
    Any {
        target: &'a mut dyn Any,
        type_name: &'static str,
    },
    Uuid(&'a mut dyn UuidScanner),
    Array(&'a mut dyn ArraySink),
}

impl<'a> Dest<'a> {
    pub fn value<T: Any>(target: &'a mut T) -> Self {
        Dest::Any {
            target,
            type_name: type_name::<T>(),
        }
    }

    pub fn array<T: Any + Default>(target: &'a mut Vec<T>) -> Self {
        Dest::Array(target)
    }

    pub fn is<T: Any>(&self) -> bool {
        match self {
            Dest::Any { target, .. } => target.is::<T>(),
            _ => false,
        }
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Dest::Any { target, .. } => target.downcast_mut::<T>(),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Dest::Any { type_name, .. } => *type_name,
            Dest::Uuid(_) => "dyn UuidScanner",
            Dest::Array(_) => "dyn ArraySink",
        }
    }
}

/// Elements of an outgoing one-dimensional array.
pub trait ArraySource {
    fn len(&self) -> usize;

    fn element(&self, index: usize) -> Arg<'_>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Any> ArraySource for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Arg<'_> {
        Arg::value(&self[index])
    }
}

/// Destination of a one-dimensional array, filled element by element.
pub trait ArraySink {
    fn clear(&mut self);

    /// Appends a default element and returns it as the next scan destination.
    fn push_default(&mut self) -> Dest<'_>;

    /// A detached default element, used to plan element scans without
    /// touching the sink.
    fn probe(&self) -> WrappedDest;
}

impl<T: Any + Default> ArraySink for Vec<T> {
    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn push_default(&mut self) -> Dest<'_> {
        let index = self.len();
        self.push(T::default());
        Dest::value(&mut self[index])
    }

    fn probe(&self) -> WrappedDest {
        WrappedDest::value(T::default())
    }
}

pub trait EncodePlan: Send + Sync {
    /// Appends the encoded value to `buf`.
    fn encode(&self, value: &Arg<'_>, buf: &mut Vec<u8>) -> Result<IsNull>;
}

pub trait ScanPlan: Send + Sync {
    /// Scans `src` (`None` is SQL `NULL`) into `dst`.
    fn scan(&self, src: Option<&[u8]>, dst: &mut Dest<'_>) -> Result<()>;
}

/// An encode plan that rewraps its value and hands it to the next plan.
pub trait WrappedEncodePlan: EncodePlan {
    fn set_next(&mut self, next: Box<dyn EncodePlan>);
}

/// A scan plan that rewraps its destination and hands it to the next plan.
pub trait WrappedScanPlan: ScanPlan {
    fn set_next(&mut self, next: Box<dyn ScanPlan>);
}

/// Claims a value by returning a wrapping plan and the rewrapped value the
/// next plan is resolved for, or declines with `None`.
pub type TryWrapEncodePlanFn = fn(&Arg<'_>) -> Option<(Box<dyn WrappedEncodePlan>, WrappedArg)>;

/// Claims a destination by returning a wrapping plan and a probe of the
/// rewrapped destination the next plan is resolved for, or declines with `None`.
pub type TryWrapScanPlanFn = fn(&Dest<'_>) -> Option<(Box<dyn WrappedScanPlan>, WrappedDest)>;

/// Owned rewrapped value returned by a [`TryWrapEncodePlanFn`].
pub enum WrappedArg {
    Any {
        value: Box<dyn Any>,
        type_name: &'static str,
    },
    Uuid(Box<dyn UuidValuer>),
}

impl WrappedArg {
    pub fn value<T: Any>(value: T) -> Self {
        WrappedArg::Any {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub fn uuid<T: UuidValuer + 'static>(value: T) -> Self {
        WrappedArg::Uuid(Box::new(value))
    }

    pub fn as_arg(&self) -> Arg<'_> {
        match self {
            WrappedArg::Any { value, type_name } => Arg::Any {
                value: &**value,
                type_name: *type_name,
            },
            WrappedArg::Uuid(value) => Arg::Uuid(&**value),
        }
    }
}

/// Owned destination probe returned by a [`TryWrapScanPlanFn`].
pub enum WrappedDest {
    Any {
        target: Box<dyn Any>,
        type_name: &'static str,
    },
    Uuid(Box<dyn UuidScanner>),
}

impl WrappedDest {
    pub fn value<T: Any>(target: T) -> Self {
        WrappedDest::Any {
            target: Box::new(target),
            type_name: type_name::<T>(),
        }
    }

    pub fn uuid<T: UuidScanner + 'static>(target: T) -> Self {
        WrappedDest::Uuid(Box::new(target))
    }

    pub fn as_dest(&mut self) -> Dest<'_> {
        match self {
            WrappedDest::Any { target, type_name } => Dest::Any {
                target: &mut **target,
                type_name: *type_name,
            },
            WrappedDest::Uuid(target) => Dest::Uuid(&mut **target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_downcast() {
        let value = 42i32;
        let arg = Arg::value(&value);

        assert!(arg.is::<i32>());
        assert!(!arg.is::<i64>());
        assert_eq!(arg.downcast_ref::<i32>(), Some(&42));
        assert_eq!(arg.type_name(), "i32");
        assert!(!Arg::Null.is::<i32>());
    }

    #[test]
    fn sink_push_default() {
        let mut values: Vec<i32> = vec![1, 2];
        ArraySink::clear(&mut values);

        {
            let mut dest = values.push_default();
            *dest.downcast_mut::<i32>().unwrap() = 7;
        }

        assert_eq!(values, vec![7]);
    }

    #[test]
    fn sink_probe_is_detached() {
        let values: Vec<i32> = vec![1, 2];
        let mut probe = values.probe();

        assert!(probe.as_dest().is::<i32>());
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn wrapped_dest_exposes_target() {
        let mut wrapped = WrappedDest::value(String::new());
        let dest = wrapped.as_dest();

        assert!(dest.is::<String>());
        assert!(dest.type_name().ends_with("String"));
    }
}
