//! Formatting options and their TOML representation

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::OptionsError;
use crate::provider::{Culture, FormatProvider, INVARIANT};
use crate::serializer::{ArgumentSerializer, DefaultSerializer};

const ELLIPSIS: &str = "...";

static DEFAULT_SERIALIZER: DefaultSerializer = DefaultSerializer { max_depth: 1 };

/// Options for a formatting call
#[derive(Clone, Default)]
pub struct Options {
    /// Culture data and custom formatter; invariant culture when unset
    pub provider: Option<Arc<dyn FormatProvider>>,
    /// Serializer for `{@...}` holes; [`DefaultSerializer`] when unset
    pub serializer: Option<Arc<dyn ArgumentSerializer>>,
    /// Output limit in characters; `None` or `0` means unbounded
    pub max_length: Option<usize>,
    /// Text substituted for holes without a value; the raw hole when unset
    pub fallback: Option<String>,
}

/// TOML structure for deserializing options
#[derive(Deserialize)]
struct TomlOptions {
    fallback: Option<String>,
    max_length: Option<usize>,
    culture: Option<Culture>,
}

impl Options {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load options from a TOML string
    pub fn from_str(content: &str) -> Result<Self, OptionsError> {
        let parsed: TomlOptions = toml::from_str(content)?;

        let mut options = Options::new();
        options.fallback = parsed.fallback;
        options.max_length = parsed.max_length;
        if let Some(culture) = parsed.culture {
            options = options.with_provider(culture);
        }
        Ok(options)
    }

    /// Set the format provider
    pub fn with_provider(mut self, provider: impl FormatProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set the argument serializer
    pub fn with_serializer(mut self, serializer: impl ArgumentSerializer + 'static) -> Self {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Set the output limit
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the fallback text for unresolved holes
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn is_limited(&self) -> bool {
        matches!(self.max_length, Some(limit) if limit > 0)
    }

    pub fn provider(&self) -> &dyn FormatProvider {
        match &self.provider {
            Some(provider) => provider.as_ref(),
            None => &INVARIANT,
        }
    }

    pub fn serializer(&self) -> &dyn ArgumentSerializer {
        match &self.serializer {
            Some(serializer) => serializer.as_ref(),
            None => &DEFAULT_SERIALIZER,
        }
    }

    /// Cut output down to `max_length` characters
    ///
    /// When both the output and the limit are longer than the ellipsis, the
    /// last kept characters are replaced by `...`.
    pub fn truncate(&self, output: String) -> String {
        let limit = match self.max_length {
            Some(limit) if limit > 0 => limit,
            _ => return output,
        };

        let count = output.chars().count();
        if count <= limit {
            return output;
        }

        let ellipsis = ELLIPSIS.len();
        if limit <= ellipsis {
            return output.chars().take(limit).collect();
        }

        let mut result: String = output.chars().take(limit - ellipsis).collect();
        result.push_str(ELLIPSIS);
        result
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("provider", &self.provider.as_ref().map(|_| ".."))
            .field("serializer", &self.serializer.as_ref().map(|_| ".."))
            .field("max_length", &self.max_length)
            .field("fallback", &self.fallback)
            .finish()
    }
}
