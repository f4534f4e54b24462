use crate::{CellValue, Kind, Options};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

type ConvertFn = dyn Fn(&dyn Any, &str, &str) -> Option<Box<dyn Any>> + Send + Sync;

/// A user supplied decoder with its output type erased
#[derive(Clone)]
pub(crate) struct Converter {
    f: Arc<ConvertFn>,
    output: &'static str,
}

impl Converter {
    pub(crate) fn new<T, F>(f: F) -> Self
    where
        T: Any,
        F: Fn(&dyn Any, &str, &str) -> Option<T> + Send + Sync + 'static,
    {
        Converter {
            f: Arc::new(move |owner, column, cell| {
                f(owner, column, cell).map(|x| Box::new(x) as Box<dyn Any>)
            }),
            output: type_name::<T>(),
        }
    }

    pub(crate) fn convert(&self, owner: &dyn Any, column: &str, cell: &str) -> Option<Box<dyn Any>> {
        (self.f)(owner, column, cell)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter {{ {} }}", self.output)
    }
}

/// A converter chosen for a slot and how its output is assigned
#[derive(Debug, Clone, Copy)]
pub(crate) enum Resolved<'a> {
    /// The output is the slot's type
    Exact(&'a Converter),

    /// The output is `Box<T>` for a slot of record type `T`
    Unbox(&'a Converter),
}

impl<'a> Resolved<'a> {
    /// Runs the converter and fits its output to `T`, logging any failure
    pub(crate) fn convert<T: CellValue>(&self, owner: &dyn Any, column: &str, cell: &str) -> Option<T> {
        let (converter, unbox) = match *self {
            Resolved::Exact(converter) => (converter, false),
            Resolved::Unbox(converter) => (converter, true),
        };

        let value = match converter.convert(owner, column, cell) {
            Some(value) => value,
            None => {
                tracing::debug!(column, cell, "field parse error");
                return None;
            }
        };

        let fitted = if unbox {
            value.downcast::<Box<T>>().map(|x| **x)
        } else {
            T::from_converted(value)
        };

        match fitted {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::error!(
                    column,
                    cell,
                    output = converter.output,
                    expected = type_name::<T>(),
                    "converter output does not match the field type"
                );
                None
            }
        }
    }
}

/// The converter registered for a column, if any
pub(crate) fn resolve_column<'a>(options: &'a Options, column: &str) -> Option<Resolved<'a>> {
    options.column_converter(column).map(Resolved::Exact)
}

/// The converter registered for `T`, falling back to one registered for
/// `Box<T>` when `T` is a record
pub(crate) fn resolve_type<T: CellValue>(options: &Options) -> Option<Resolved<'_>> {
    if let Some(converter) = options.type_converter(TypeId::of::<T>()) {
        return Some(Resolved::Exact(converter));
    }

    if T::KIND == Kind::Record {
        options
            .type_converter(TypeId::of::<Box<T>>())
            .map(Resolved::Unbox)
    } else {
        None
    }
}
