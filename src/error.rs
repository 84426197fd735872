//! Error types for rendering and configuration

use thiserror::Error;

/// Failure raised while converting a single argument to text.
///
/// These never escape [`crate::weave`]: the weaver turns them into an inline
/// diagnostic of the form `[{marker} => {kind}: "{message}"]`.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The value refused its own string conversion
    #[error("{message}")]
    Conversion { message: String },

    /// The format specifier is not applicable to the value
    #[error("{message}")]
    InvalidFormat { spec: String, message: String },

    /// Structured value could not be captured or walked by a serializer
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Failure raised by user code (custom values, formatters, serializers)
    #[error("{message}")]
    Custom { kind: String, message: String },
}

impl RenderError {
    /// Create a conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Create an error carrying its own type name
    pub fn custom(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Type name shown in inline diagnostics
    pub fn kind(&self) -> &str {
        match self {
            Self::Conversion { .. } => "ConversionError",
            Self::InvalidFormat { .. } => "FormatError",
            Self::Serialization(_) => "SerializationError",
            Self::Custom { kind, .. } => kind,
        }
    }
}

impl From<std::fmt::Error> for RenderError {
    fn from(_: std::fmt::Error) -> Self {
        Self::conversion("value formatting failed")
    }
}

/// Errors that can occur when loading options
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse options TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(RenderError::conversion("x").kind(), "ConversionError");
        assert_eq!(RenderError::invalid_format("Q", "x").kind(), "FormatError");
        assert_eq!(
            RenderError::custom("ArgumentException", "x").kind(),
            "ArgumentException"
        );
    }

    #[test]
    fn test_display_is_message_only() {
        let err = RenderError::custom("ArgumentException", "value is broken");
        assert_eq!(err.to_string(), "value is broken");

        let err = RenderError::invalid_format("Z", "format specifier 'Z' is not supported");
        assert_eq!(err.to_string(), "format specifier 'Z' is not supported");
    }

    #[test]
    fn test_serialization_kind() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RenderError::from(json_err);
        assert_eq!(err.kind(), "SerializationError");
    }
}
