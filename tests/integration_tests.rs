//! Integration tests for template formatting

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use time::macros::datetime;

use tmplweave::{
    args, format, format_with, format_with_relations, tokenize, Argument, ArgumentSerializer,
    Culture, CustomFormatter, FormatProvider, Formattable, Options, RenderError,
};

fn smoke_arguments() -> Vec<Argument> {
    args![123456, "argument", 2.5]
}

#[rstest]
#[case("text {1} text {2} text {0}", "text argument text 2.5 text 123456")]
#[case("text {val1} text {val2} text {val3}", "text 123456 text argument text 2.5")]
#[case("text {$1} text {$2} text {$0}", "text argument text 2.5 text 123456")]
#[case("text {$val1} text {$val2} text {$val3}", "text 123456 text argument text 2.5")]
#[case("text {@1} text {@2} text {@0}", "text argument text 2.5 text 123456")]
#[case("text {@val1} text {@val2} text {@val3}", "text 123456 text argument text 2.5")]
fn test_smoke_format(#[case] template: &str, #[case] expected: &str) {
    assert_eq!(format(template, &smoke_arguments()), expected);
}

#[rstest]
#[case("text {1} text {2} text {0}", "text broken text argument text 1...")]
#[case("text {val1} text {val2} text {val3}", "text 123456 text broken text arg...")]
#[case("text {$1} text {$2} text {$0}", "text broken text argument text 1...")]
#[case("text {$val1} text {$val2} text {$val3}", "text 123456 text broken text arg...")]
#[case("text {@1} text {@2} text {@0}", "text broken text argument text 1...")]
#[case("text {@val1} text {@val2} text {@val3}", "text 123456 text broken text arg...")]
fn test_fallback_and_truncation(#[case] template: &str, #[case] expected: &str) {
    let options = Options::new().with_fallback("broken").with_max_length(35);
    let arguments = vec![Argument::from(123456), Argument::Null, Argument::from("argument")];

    let (output, relations) = format_with_relations(&options, template, &arguments);
    assert_eq!(output, expected);
    assert_eq!(relations.len(), 3);
}

#[test]
fn test_round_trip_of_literals() {
    let templates = [
        "a{{b}}c",
        "plain text",
        "{} {,5} {$} {@:x} {a b}",
        "unterminated {0",
        "}} stray } braces {{",
    ];
    for template in templates {
        let collapsed = template.replace("{{", "{").replace("}}", "}");
        assert_eq!(format(template, &args![1, 2, 3]), collapsed, "{}", template);
    }
}

#[test]
fn test_escaping() {
    assert_eq!(format("text {{escaped}} text", &args!["x"]), "text {escaped} text");
    assert_eq!(format("{{{0}}}", &args!["x"]), "{x}");
}

#[test]
fn test_missing_argument_passthrough() {
    assert_eq!(format("text {0} text {1}", &args!["A"]), "text A text {1}");
}

#[test]
fn test_fallback_substitution() {
    let options = Options::new().with_fallback("unused");
    assert_eq!(format_with(&options, "a {x} b", &[]), "a unused b");
}

#[rstest]
#[case("[{0,-5}]", "[ab   ]")]
#[case("[{0,5}]", "[   ab]")]
fn test_alignment(#[case] template: &str, #[case] expected: &str) {
    assert_eq!(format(template, &args!["ab"]), expected);
}

#[test]
fn test_binding_mode_purity() {
    let arguments = args!["zero", "one", "two"];
    assert_eq!(format("{2} {0} {1}", &arguments), "two zero one");
    // One named hole makes every hole bind left to right.
    assert_eq!(format("{2} {0} {name}", &arguments), "zero one two");
}

#[test]
fn test_exception_containment() {
    struct Exploding;

    impl Formattable for Exploding {
        fn to_display(&self) -> Result<String, RenderError> {
            Err(RenderError::custom("InvalidOperation", "boom"))
        }
    }

    let output = format(
        "before {0,-3} middle {1} after",
        &[Argument::custom(Exploding), Argument::from(7)],
    );
    assert_eq!(
        output,
        r#"before [{0,-3} => InvalidOperation: "boom"] middle 7 after"#
    );
}

#[test]
fn test_custom_formatter_called_for_formatted_holes_only() {
    struct Counting(AtomicUsize);

    impl CustomFormatter for Counting {
        fn format(
            &self,
            format: &str,
            _value: &Argument,
            _provider: &dyn FormatProvider,
        ) -> Result<String, RenderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format.to_lowercase())
        }
    }

    struct Provider(Arc<Counting>);

    impl FormatProvider for Provider {
        fn custom_formatter(&self) -> Option<&dyn CustomFormatter> {
            Some(self.0.as_ref())
        }
    }

    let cases = [
        ("text {1} text {2} text {0}", 0),
        ("text {1:XX} text {2:XX} text {0:XX}", 3),
        ("text {val1:XX} text {val2:XX} text {val3:XX}", 3),
        ("text {$1:XX} text {$2:XX} text {$0:XX}", 0),
        ("text {@val1:XX} text {@val2:XX} text {@val3:XX}", 3),
    ];

    for (template, expected) in cases {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let options = Options::new().with_provider(Provider(counting.clone()));
        format_with(&options, template, &smoke_arguments());
        assert_eq!(counting.0.load(Ordering::SeqCst), expected, "{}", template);
    }
}

#[test]
fn test_serializer_receives_raw_parts() {
    #[derive(Default)]
    struct Recording(std::sync::Mutex<Vec<(String, String)>>);

    impl ArgumentSerializer for Recording {
        fn serialize(
            &self,
            _provider: &dyn FormatProvider,
            format: &str,
            lining: &str,
            _value: &Argument,
        ) -> Result<String, RenderError> {
            if let Ok(mut calls) = self.0.lock() {
                calls.push((format.to_string(), lining.to_string()));
            }
            Ok("serialized".to_string())
        }
    }

    struct Shared(Arc<Recording>);

    impl ArgumentSerializer for Shared {
        fn serialize(
            &self,
            provider: &dyn FormatProvider,
            format: &str,
            lining: &str,
            value: &Argument,
        ) -> Result<String, RenderError> {
            self.0.serialize(provider, format, lining, value)
        }
    }

    let recording = Arc::new(Recording::default());
    let options = Options::new().with_serializer(Shared(recording.clone()));
    let record = Argument::Record(serde_json::json!({"id": 1}));

    let (output, relations) =
        format_with_relations(&options, "text {@val1,-20:XYZ} text", &[record]);

    assert_eq!(output, "text serialized           text");
    assert_eq!(relations.len(), 1);
    let calls = recording.0.lock().unwrap();
    assert_eq!(*calls, vec![("XYZ".to_string(), "-20".to_string())]);
}

#[test]
fn test_default_serializer_for_records() {
    #[derive(serde::Serialize)]
    struct Order {
        #[serde(rename = "Id")]
        id: u32,
        #[serde(rename = "Customer")]
        customer: String,
        #[serde(rename = "Lines")]
        lines: Vec<u32>,
    }

    let order = Argument::record(&Order {
        id: 17,
        customer: "Ada".to_string(),
        lines: vec![1, 2],
    })
    .unwrap();

    assert_eq!(
        format("order {@order}", &[order.clone()]),
        r#"order [Id: 17; Customer: "Ada"]"#
    );
    assert_eq!(
        format("order {order}", &[order]),
        r#"order {"Id":17,"Customer":"Ada","Lines":[1,2]}"#
    );
}

#[test]
fn test_culture_from_options_file_format() {
    let options = Options::from_str(
        r#"
[culture]
name = "de-DE"
decimal_separator = ","
group_separator = "."
"#,
    )
    .expect("Should parse");

    assert_eq!(
        format_with(&options, "{0:N2} / {1:P1}", &args![1234567.891, 0.256]),
        "1.234.567,89 / 25,6 %"
    );
    assert_eq!(
        format_with(
            &Options::new().with_provider(Culture::invariant()),
            "{0:N2}",
            &args![1234567.891]
        ),
        "1,234,567.89"
    );
}

#[test]
fn test_datetime_format_description() {
    let when = datetime!(2020-10-29 23:17:05 UTC);
    assert_eq!(
        format("{0:[day].[month].[year]}", &args![when]),
        "29.10.2020"
    );
}

#[test]
fn test_tokenize_is_idempotent() {
    let template = "a {0,-3:x} {{b}} {name} {bad";
    assert_eq!(tokenize(template), tokenize(template));
}

#[test]
fn test_token_diagnostics() {
    let template = "Hi {0,-5:N2}{{x}} {$name}{@user";
    let lines: Vec<String> = tokenize(template).iter().map(ToString::to_string).collect();

    insta::assert_snapshot!(lines.join("\n"), @r"
    Type: Literal, Offset: [0], Rank: [-], Symbol: [], Lining: [], Format: [], Marker: [Hi ]
    Type: Placeholder, Offset: [3], Rank: [0], Symbol: [0], Lining: [-5], Format: [N2], Marker: [{0,-5:N2}]
    Type: Literal, Offset: [12], Rank: [-], Symbol: [], Lining: [], Format: [], Marker: [{x} ]
    Type: Placeholder, Offset: [18], Rank: [1], Symbol: [$name], Lining: [], Format: [], Marker: [{$name}]
    Type: Literal, Offset: [25], Rank: [-], Symbol: [], Lining: [], Format: [], Marker: [{@user]
    ");
}
