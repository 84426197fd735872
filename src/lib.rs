//! tmplweave - message template formatting
//!
//! Templates mix literal text with holes such as `{0}`, `{name,-10}` or
//! `{@user}`. A template is tokenized once, then woven against an argument
//! list. Formatting never fails: malformed holes stay as text, holes without
//! a value keep their marker (or the configured fallback), and a value that
//! cannot be rendered is replaced by an inline diagnostic.
//!
//! # Example
//!
//! ```rust
//! use tmplweave::{args, format};
//!
//! let text = format("{0} has {1,4} items {{total}}", &args!["cart", 12]);
//! assert_eq!(text, "cart has   12 items {total}");
//! ```

pub mod error;
pub mod lint;
pub mod options;
pub mod parser;
pub mod provider;
pub mod relations;
pub mod serializer;
pub mod value;
pub mod weaver;

pub use error::{OptionsError, RenderError};
pub use options::Options;
pub use parser::{tokenize, Token, Tokenizer};
pub use provider::{Culture, CustomFormatter, FormatProvider, NumberFormat};
pub use relations::{build_relations, Relation, Relations};
pub use serializer::{ArgumentSerializer, DefaultSerializer};
pub use value::{expand_arguments, Argument, Formattable};
pub use weaver::weave;

/// Format a template with default options
///
/// # Example
///
/// ```rust
/// use tmplweave::{args, format};
///
/// assert_eq!(format("text {0} text {1}", &args!["A"]), "text A text {1}");
/// ```
pub fn format(template: &str, arguments: &[Argument]) -> String {
    format_with(&Options::default(), template, arguments)
}

/// Format a template with custom options
///
/// # Example
///
/// ```rust
/// use tmplweave::{format_with, Options};
///
/// let options = Options::new().with_fallback("unused");
/// assert_eq!(format_with(&options, "a {x} b", &[]), "a unused b");
/// ```
pub fn format_with(options: &Options, template: &str, arguments: &[Argument]) -> String {
    if template.is_empty() {
        return String::new();
    }

    let tokens = tokenize(template);
    let arguments = expand_arguments(arguments);
    options.truncate(weave(options, &tokens, &arguments))
}

/// Format a template and trace how its holes were bound
///
/// # Example
///
/// ```rust
/// use tmplweave::{args, format_with_relations, Argument, Options};
///
/// let options = Options::default();
/// let (text, relations) = format_with_relations(&options, "{user} logged in", &args!["ada"]);
/// assert_eq!(text, "ada logged in");
/// assert_eq!(relations.by_label("user").unwrap().value, Some(Argument::from("ada")));
/// ```
pub fn format_with_relations(
    options: &Options,
    template: &str,
    arguments: &[Argument],
) -> (String, Relations) {
    if template.is_empty() {
        return (String::new(), Relations::new());
    }

    let tokens = tokenize(template);
    let arguments = expand_arguments(arguments);
    let output = weave(options, &tokens, &arguments);
    let relations = build_relations(&tokens, &arguments);
    (options.truncate(output), relations)
}
