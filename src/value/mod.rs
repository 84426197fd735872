//! Argument values passed to a template

mod numeric;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::error::RenderError;
use crate::provider::FormatProvider;

/// A user value with its own conversion rules
///
/// Implement this for types that are not plain data: their conversions may
/// fail, and the failure is reported inline instead of aborting the format.
pub trait Formattable: Send + Sync {
    /// Default string conversion, used by `{$x}` and by holes without a format
    fn to_display(&self) -> Result<String, RenderError>;

    /// Format-aware conversion; `None` when the value has none
    fn to_formatted(
        &self,
        _format: &str,
        _provider: &dyn FormatProvider,
    ) -> Option<Result<String, RenderError>> {
        None
    }

    /// Public fields exposed to serializers under `{@x}`
    fn fields(&self) -> Option<serde_json::Value> {
        None
    }
}

/// A single template argument
#[derive(Clone)]
pub enum Argument {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    DateTime(OffsetDateTime),
    /// Sequence; flattened into the argument list when passed at top level
    List(Vec<Argument>),
    /// Structured value captured through serde
    Record(serde_json::Value),
    Custom(Arc<dyn Formattable>),
}

impl Argument {
    /// Capture any serializable value as a structured record
    pub fn record<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Argument::Record)
    }

    /// Wrap a custom value
    pub fn custom(value: impl Formattable + 'static) -> Self {
        Argument::Custom(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Argument::Null)
    }

    /// Built-in data as opposed to user-defined structures
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Argument::Record(_) | Argument::Custom(_))
    }

    /// Default string conversion
    pub fn display(&self) -> Result<String, RenderError> {
        Ok(match self {
            Argument::Null => String::new(),
            Argument::Bool(b) => b.to_string(),
            Argument::Char(c) => c.to_string(),
            Argument::Int(n) => n.to_string(),
            Argument::UInt(n) => n.to_string(),
            Argument::Float(x) => x.to_string(),
            Argument::Str(s) => s.clone(),
            Argument::DateTime(dt) => dt.to_string(),
            Argument::List(items) => {
                let items = items
                    .iter()
                    .map(Argument::display)
                    .collect::<Result<Vec<_>, _>>()?;
                format!("[{}]", items.join(", "))
            }
            Argument::Record(value) => value.to_string(),
            Argument::Custom(custom) => return custom.to_display(),
        })
    }

    /// Format-aware conversion, `None` when the value has no such capability
    pub fn format_with(
        &self,
        format: &str,
        provider: &dyn FormatProvider,
    ) -> Option<Result<String, RenderError>> {
        let numbers = provider.number_format();
        match self {
            Argument::Int(n) => Some(numeric::format_integer(i128::from(*n), format, &numbers)),
            Argument::UInt(n) => Some(numeric::format_integer(i128::from(*n), format, &numbers)),
            Argument::Float(x) => Some(numeric::format_float(*x, format, &numbers)),
            Argument::DateTime(dt) => Some(format_datetime(dt, format)),
            Argument::Custom(custom) => custom.to_formatted(format, provider),
            _ => None,
        }
    }
}

fn format_datetime(dt: &OffsetDateTime, format: &str) -> Result<String, RenderError> {
    let items = time::format_description::parse_owned::<2>(format)
        .map_err(|e| RenderError::invalid_format(format, e.to_string()))?;
    dt.format(&items)
        .map_err(|e| RenderError::invalid_format(format, e.to_string()))
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Null => write!(f, "Null"),
            Argument::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Argument::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Argument::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Argument::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Argument::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Argument::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Argument::DateTime(dt) => f.debug_tuple("DateTime").field(dt).finish(),
            Argument::List(items) => f.debug_tuple("List").field(items).finish(),
            Argument::Record(value) => f.debug_tuple("Record").field(value).finish(),
            Argument::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Argument::Null, Argument::Null) => true,
            (Argument::Bool(a), Argument::Bool(b)) => a == b,
            (Argument::Char(a), Argument::Char(b)) => a == b,
            (Argument::Int(a), Argument::Int(b)) => a == b,
            (Argument::UInt(a), Argument::UInt(b)) => a == b,
            (Argument::Float(a), Argument::Float(b)) => a == b,
            (Argument::Str(a), Argument::Str(b)) => a == b,
            (Argument::DateTime(a), Argument::DateTime(b)) => a == b,
            (Argument::List(a), Argument::List(b)) => a == b,
            (Argument::Record(a), Argument::Record(b)) => a == b,
            (Argument::Custom(a), Argument::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Argument {
            fn from(value: $t) -> Self {
                Argument::Int(i64::from(value))
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Argument {
            fn from(value: $t) -> Self {
                Argument::UInt(u64::from(value))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Argument {
    fn from(value: isize) -> Self {
        Argument::Int(value as i64)
    }
}

impl From<usize> for Argument {
    fn from(value: usize) -> Self {
        Argument::UInt(value as u64)
    }
}

impl From<f32> for Argument {
    fn from(value: f32) -> Self {
        Argument::Float(f64::from(value))
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Float(value)
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Bool(value)
    }
}

impl From<char> for Argument {
    fn from(value: char) -> Self {
        Argument::Char(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Str(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Str(value)
    }
}

impl From<OffsetDateTime> for Argument {
    fn from(value: OffsetDateTime) -> Self {
        Argument::DateTime(value)
    }
}

impl<T: Into<Argument>> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        value.map_or(Argument::Null, Into::into)
    }
}

impl<T: Into<Argument>> From<Vec<T>> for Argument {
    fn from(value: Vec<T>) -> Self {
        Argument::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Argument {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Argument::Null,
            Value::Bool(b) => Argument::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Argument::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Argument::UInt(u)
                } else {
                    Argument::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Argument::Str(s),
            Value::Array(items) => Argument::List(items.into_iter().map(Argument::from).collect()),
            object @ Value::Object(_) => Argument::Record(object),
        }
    }
}

/// Flatten top-level lists into the argument list
///
/// Only one level is flattened: a list nested inside a list stays a single
/// argument. Strings are never split.
pub fn expand_arguments(arguments: &[Argument]) -> Vec<Argument> {
    let mut result = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            Argument::List(items) => result.extend(items.iter().cloned()),
            other => result.push(other.clone()),
        }
    }
    result
}

/// Build an argument vector from heterogeneous expressions
///
/// ```
/// use tmplweave::{args, Argument};
///
/// let arguments = args![1, "two", 3.5];
/// assert_eq!(arguments[1], Argument::Str("two".to_string()));
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Argument::from($value)),*]
    };
}
