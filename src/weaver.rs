//! Weaver: renders a token sequence against an argument list
//!
//! The binding mode is decided once per call (see [`Binding`]). Each hole is
//! rendered independently: a failing conversion becomes an inline diagnostic
//! and never aborts the rest of the template.

use log::{debug, trace};

use crate::error::RenderError;
use crate::options::Options;
use crate::parser::{Binding, Placeholder, Token};
use crate::value::Argument;

/// Render tokens into the output string
pub fn weave(options: &Options, tokens: &[Token<'_>], arguments: &[Argument]) -> String {
    let binding = Binding::of(tokens);
    trace!("weaving {} tokens in {:?} mode", tokens.len(), binding);

    let mut output = String::new();
    for token in tokens {
        match token {
            Token::Literal(lit) => output.push_str(&lit.text),
            Token::Placeholder(hole) => {
                render_hole(&mut output, options, binding, hole, arguments);
            }
        }
    }
    output
}

fn render_hole(
    output: &mut String,
    options: &Options,
    binding: Binding,
    hole: &Placeholder<'_>,
    arguments: &[Argument],
) {
    let value = match arguments.get(binding.index(hole)) {
        Some(value) if !value.is_null() => value,
        _ => {
            output.push_str(options.fallback.as_deref().unwrap_or(hole.marker));
            return;
        }
    };

    let rendered = render_value(options, hole, value).unwrap_or_else(|err| {
        debug!("{} failed to render: {}", Token::Placeholder(hole.clone()), err);
        diagnostic(hole, &err)
    });

    let padding = hole
        .width()
        .map_or(0, |width| width.saturating_sub(rendered.chars().count()));

    if hole.is_right_justified() {
        pad(output, padding);
        output.push_str(&rendered);
    } else {
        output.push_str(&rendered);
        if hole.is_left_justified() {
            pad(output, padding);
        }
    }
}

fn render_value(
    options: &Options,
    hole: &Placeholder<'_>,
    value: &Argument,
) -> Result<String, RenderError> {
    if hole.is_stringify() {
        return value.display();
    }

    if hole.is_spreading() && !value.is_primitive() {
        return options
            .serializer()
            .serialize(options.provider(), hole.format, hole.lining, value);
    }

    if hole.format.is_empty() {
        return value.display();
    }

    let provider = options.provider();
    if let Some(formatter) = provider.custom_formatter() {
        return formatter.format(hole.format, value, provider);
    }

    match value.format_with(hole.format, provider) {
        Some(result) => result,
        None => value.display(),
    }
}

fn diagnostic(hole: &Placeholder<'_>, err: &RenderError) -> String {
    format!("[{} => {}: \"{}\"]", hole.marker, err.kind(), err)
}

fn pad(output: &mut String, count: usize) {
    output.extend(std::iter::repeat(' ').take(count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::parser::tokenize;
    use crate::provider::{Culture, CustomFormatter, FormatProvider};
    use crate::serializer::ArgumentSerializer;
    use crate::value::Formattable;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(options: &Options, template: &str, arguments: &[Argument]) -> String {
        weave(options, &tokenize(template), arguments)
    }

    struct Failing;

    impl Formattable for Failing {
        fn to_display(&self) -> Result<String, RenderError> {
            Err(RenderError::conversion("value is poisoned"))
        }
    }

    struct Upper;

    impl CustomFormatter for Upper {
        fn format(
            &self,
            format: &str,
            value: &Argument,
            _provider: &dyn FormatProvider,
        ) -> Result<String, RenderError> {
            Ok(format!("{}:{}", format, value.display()?.to_uppercase()))
        }
    }

    struct Shouting;

    impl FormatProvider for Shouting {
        fn custom_formatter(&self) -> Option<&dyn CustomFormatter> {
            Some(&Upper)
        }
    }

    struct Tagging;

    impl ArgumentSerializer for Tagging {
        fn serialize(
            &self,
            _provider: &dyn FormatProvider,
            format: &str,
            lining: &str,
            _value: &Argument,
        ) -> Result<String, RenderError> {
            Ok(format!("<{}|{}>", lining, format))
        }
    }

    #[test]
    fn test_literals_only() {
        let options = Options::default();
        assert_eq!(render(&options, "a{{b}}c", &[]), "a{b}c");
        assert_eq!(render(&options, "{} and {", &args![1]), "{} and {");
    }

    #[test]
    fn test_index_mode_ignores_order() {
        let options = Options::default();
        assert_eq!(render(&options, "{1} {0} {1}", &args!["a", "b"]), "b a b");
    }

    #[test]
    fn test_rank_mode_binds_left_to_right() {
        let options = Options::default();
        assert_eq!(
            render(&options, "{1} {name} {0}", &args!["a", "b", "c"]),
            "a b c"
        );
    }

    #[test]
    fn test_missing_argument_keeps_marker() {
        let options = Options::default();
        assert_eq!(
            render(&options, "text {0} text {1,5:N2}", &args!["A"]),
            "text A text {1,5:N2}"
        );
    }

    #[test]
    fn test_null_argument_uses_fallback_without_padding() {
        let options = Options::new().with_fallback("unused");
        assert_eq!(render(&options, "[{0,8}]", &[Argument::Null]), "[unused]");
        assert_eq!(render(&options, "a {x} b", &[]), "a unused b");
    }

    #[rstest]
    #[case("[{0,-5}]", "[ab   ]")]
    #[case("[{0,5}]", "[   ab]")]
    #[case("[{0,1}]", "[ab]")]
    #[case("[{0,-}]", "[ab]")]
    #[case("[{0,0}]", "[ab]")]
    fn test_alignment(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(&Options::default(), template, &args!["ab"]), expected);
    }

    #[test]
    fn test_alignment_counts_characters() {
        assert_eq!(render(&Options::default(), "[{0,4}]", &args!["äö"]), "[  äö]");
    }

    #[test]
    fn test_numeric_format() {
        let options = Options::default();
        assert_eq!(render(&options, "{0:N2}", &args![1234.5]), "1,234.50");
        assert_eq!(render(&options, "{0,8:X}", &args![255]), "      FF");
    }

    #[test]
    fn test_culture_format() {
        let options = Options::new().with_provider(Culture::new("de-DE", ',', '.'));
        assert_eq!(render(&options, "{0:N2}", &args![1234.5]), "1.234,50");
    }

    #[test]
    fn test_stringify_ignores_format() {
        let options = Options::default();
        assert_eq!(render(&options, "{$0:N2}", &args![1234.5]), "1234.5");
    }

    #[test]
    fn test_format_without_capability_uses_display() {
        let options = Options::default();
        assert_eq!(render(&options, "{0:N2}", &args!["text"]), "text");
    }

    #[test]
    fn test_custom_formatter_takes_precedence() {
        let options = Options::new().with_provider(Shouting);
        assert_eq!(render(&options, "{0:loud}", &args!["hey"]), "loud:HEY");
        assert_eq!(render(&options, "{0}", &args!["hey"]), "hey");
    }

    #[test]
    fn test_spread_serializes_records() {
        let options = Options::default();
        let record = Argument::Record(serde_json::json!({"Name": "Ada"}));
        assert_eq!(render(&options, "{@0}", &[record]), r#"[Name: "Ada"]"#);
    }

    #[test]
    fn test_spread_primitive_is_formatted() {
        let options = Options::new().with_serializer(Tagging);
        assert_eq!(render(&options, "{@0:D4}", &args![7]), "0007");
    }

    #[test]
    fn test_spread_passes_lining_and_format() {
        let options = Options::new().with_serializer(Tagging);
        let record = Argument::Record(serde_json::json!({}));
        assert_eq!(render(&options, "{@0,-9:f}", &[record]), "<-9|f>   ");
    }

    #[test]
    fn test_failure_is_contained() {
        let options = Options::default();
        let output = render(
            &options,
            "{0} then {1}",
            &[Argument::custom(Failing), Argument::from("ok")],
        );
        assert_eq!(
            output,
            r#"[{0} => ConversionError: "value is poisoned"] then ok"#
        );
    }

    #[test]
    fn test_invalid_format_is_contained() {
        let output = render(&Options::default(), "{0:Q}", &args![1]);
        assert_eq!(
            output,
            r#"[{0:Q} => FormatError: "format specifier 'Q' is not supported"]"#
        );
    }

    #[test]
    fn test_diagnostic_is_padded() {
        let diagnostic = r#"[{0,-60} => ConversionError: "value is poisoned"]"#;
        let output = render(&Options::default(), "{0,-60}|", &[Argument::custom(Failing)]);
        assert_eq!(output, format!("{}{}|", diagnostic, " ".repeat(11)));
        assert_eq!(output.chars().count(), 61);

        let diagnostic = r#"[{0,55} => ConversionError: "value is poisoned"]"#;
        let output = render(&Options::default(), "|{0,55}", &[Argument::custom(Failing)]);
        assert_eq!(output, format!("|{}{}", " ".repeat(7), diagnostic));
    }

    #[rstest]
    #[case("[{0,3000000000}]")]
    #[case("[{0,-3000000000}]")]
    #[case("[{0,9223372036854775807}]")]
    fn test_oversized_width_is_ignored(#[case] template: &str) {
        assert_eq!(render(&Options::default(), template, &args!["ab"]), "[ab]");
    }
}
