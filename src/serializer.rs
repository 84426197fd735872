//! Serializers for structured arguments under the `@` modifier

use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::provider::{FormatProvider, NumberFormat};
use crate::value::Argument;

/// Turns a non-primitive argument into text
///
/// Only called for `{@...}` holes whose argument is a `Record` or a `Custom`
/// value. `format` and `lining` are the raw parts of the hole.
pub trait ArgumentSerializer: Send + Sync {
    fn serialize(
        &self,
        provider: &dyn FormatProvider,
        format: &str,
        lining: &str,
        value: &Argument,
    ) -> Result<String, RenderError>;
}

/// Flattens the fields of a value into `[Name: value; ...]`
///
/// Strings are quoted, nested objects are bracketed, arrays are left out.
/// Objects nested deeper than `max_depth` are left out as well. Fractional
/// numbers use the provider's decimal separator.
#[derive(Debug, Clone)]
pub struct DefaultSerializer {
    pub max_depth: usize,
}

impl Default for DefaultSerializer {
    fn default() -> Self {
        Self { max_depth: 1 }
    }
}

impl DefaultSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    fn object(&self, fields: &Map<String, Value>, depth: usize, numbers: &NumberFormat) -> String {
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(name, value)| {
                self.field(value, depth, numbers)
                    .map(|text| format!("{}: {}", name, text))
            })
            .collect();
        format!("[{}]", parts.join("; "))
    }

    fn field(&self, value: &Value, depth: usize, numbers: &NumberFormat) -> Option<String> {
        match value {
            Value::Null => Some("null".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) if n.is_f64() => Some(
                n.to_string()
                    .replace('.', &numbers.decimal_separator.to_string()),
            ),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(format!("\"{}\"", escape_control(s))),
            Value::Array(_) => None,
            Value::Object(fields) if depth < self.max_depth => {
                Some(self.object(fields, depth + 1, numbers))
            }
            Value::Object(_) => None,
        }
    }
}

impl ArgumentSerializer for DefaultSerializer {
    fn serialize(
        &self,
        provider: &dyn FormatProvider,
        _format: &str,
        _lining: &str,
        value: &Argument,
    ) -> Result<String, RenderError> {
        let numbers = provider.number_format();
        let fields = match value {
            Argument::Record(record) => Some(record.clone()),
            Argument::Custom(custom) => custom.fields(),
            Argument::Null => return Ok(String::new()),
            other => Some(serde_json::Value::String(other.display()?)),
        };

        Ok(match fields {
            Some(Value::Object(map)) => self.object(&map, 0, &numbers),
            Some(Value::Null) | None => "[]".to_string(),
            Some(other) => self.field(&other, 0, &numbers).unwrap_or_default(),
        })
    }
}

fn escape_control(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            result.push_str(&format!("\\u{:04x}", c as u32));
        } else {
            result.push(c);
        }
    }
    result
}
