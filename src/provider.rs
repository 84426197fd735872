//! Format providers: culture data and the custom formatter capability

use serde::Deserialize;

use crate::error::RenderError;
use crate::value::Argument;

/// Separators used by the built-in numeric formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NumberFormat {
    #[serde(default = "default_decimal")]
    pub decimal_separator: char,
    #[serde(default = "default_group")]
    pub group_separator: char,
}

fn default_decimal() -> char {
    '.'
}

fn default_group() -> char {
    ','
}

impl NumberFormat {
    pub const INVARIANT: NumberFormat = NumberFormat {
        decimal_separator: '.',
        group_separator: ',',
    };
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::INVARIANT
    }
}

/// Renders a value in place of the value's own format-aware conversion
pub trait CustomFormatter: Send + Sync {
    fn format(
        &self,
        format: &str,
        value: &Argument,
        provider: &dyn FormatProvider,
    ) -> Result<String, RenderError>;
}

/// Source of culture data and optional formatting capabilities
pub trait FormatProvider: Send + Sync {
    fn number_format(&self) -> NumberFormat {
        NumberFormat::INVARIANT
    }

    /// When present, every hole with a format specifier is rendered by it
    fn custom_formatter(&self) -> Option<&dyn CustomFormatter> {
        None
    }
}

/// Built-in provider carrying a name and number separators
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Culture {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub numbers: NumberFormat,
}

impl Culture {
    /// Culture-neutral provider: `.` decimal point, `,` digit groups
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            numbers: NumberFormat::INVARIANT,
        }
    }

    pub fn new(name: impl Into<String>, decimal_separator: char, group_separator: char) -> Self {
        Self {
            name: name.into(),
            numbers: NumberFormat {
                decimal_separator,
                group_separator,
            },
        }
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl FormatProvider for Culture {
    fn number_format(&self) -> NumberFormat {
        self.numbers
    }
}

pub(crate) static INVARIANT: Culture = Culture {
    name: String::new(),
    numbers: NumberFormat::INVARIANT,
};
