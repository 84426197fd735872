//! Lint checks for templates.
//!
//! Formatting never fails on a bad template: malformed holes are copied
//! through as text and unresolved holes keep their marker. These checks
//! surface such cases before a template ships.

use std::collections::BTreeSet;
use std::fmt;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::parser::{tokenize, Binding, Span, Token};

/// A lint warning about a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
    pub span: Span,
}

/// Category of template defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    /// `{...}` that failed validation and renders as text
    Malformed,
    /// Numeric hole in a template that binds by rank
    Binding,
    /// Hole with no argument to bind
    Unresolved,
    /// Argument that no hole reads
    Unused,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Malformed => write!(f, "malformed"),
            LintCategory::Binding => write!(f, "binding"),
            LintCategory::Unresolved => write!(f, "unresolved"),
            LintCategory::Unused => write!(f, "unused"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl LintWarning {
    fn new(category: LintCategory, message: String, span: Span) -> Self {
        Self {
            category,
            message,
            span,
        }
    }

    /// Format the warning with source context using ariadne, without colour
    pub fn report(&self, template: &str, name: &str) -> String {
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, name, self.span.start)
            .with_config(Config::default().with_color(false))
            .with_message(format!("{} placeholder", self.category))
            .with_label(
                Label::new((name, self.span.clone()))
                    .with_message(&self.message)
                    .with_color(Color::Yellow),
            )
            .finish()
            .write((name, Source::from(template)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Run all lint checks on a template.
///
/// `argument_count` enables the unresolved and unused checks; pass the count
/// after list arguments have been flattened.
pub fn check(template: &str, argument_count: Option<usize>) -> Vec<LintWarning> {
    let tokens = tokenize(template);
    let binding = Binding::of(&tokens);

    let mut warnings = Vec::new();
    check_malformed(template, &tokens, &mut warnings);
    if binding == Binding::Rank {
        check_binding(&tokens, &mut warnings);
    }
    if let Some(count) = argument_count {
        check_unresolved(&tokens, binding, count, &mut warnings);
        if binding == Binding::Index {
            check_unused(template, &tokens, count, &mut warnings);
        }
    }
    warnings
}

fn check_malformed(template: &str, tokens: &[Token<'_>], warnings: &mut Vec<LintWarning>) {
    for token in tokens {
        let Token::Literal(lit) = token else {
            continue;
        };
        if let Some(rejection) = &lit.malformed {
            let raw = &template[lit.span.clone()];
            warnings.push(LintWarning::new(
                LintCategory::Malformed,
                format!("'{}' is rendered as text: {}", raw, rejection.reason),
                rejection.span.clone(),
            ));
        }
    }
}

fn check_binding(tokens: &[Token<'_>], warnings: &mut Vec<LintWarning>) {
    for hole in tokens.iter().filter_map(Token::as_placeholder) {
        if hole.is_numbering() {
            warnings.push(LintWarning::new(
                LintCategory::Binding,
                format!(
                    "'{}' binds to argument {} by position because the template has named holes",
                    hole.marker, hole.rank
                ),
                hole.span.clone(),
            ));
        }
    }
}

fn check_unresolved(
    tokens: &[Token<'_>],
    binding: Binding,
    count: usize,
    warnings: &mut Vec<LintWarning>,
) {
    for hole in tokens.iter().filter_map(Token::as_placeholder) {
        let index = binding.index(hole);
        if index >= count {
            warnings.push(LintWarning::new(
                LintCategory::Unresolved,
                format!(
                    "'{}' reads argument {} but only {} given",
                    hole.marker, index, count
                ),
                hole.span.clone(),
            ));
        }
    }
}

fn check_unused(
    template: &str,
    tokens: &[Token<'_>],
    count: usize,
    warnings: &mut Vec<LintWarning>,
) {
    let used: BTreeSet<usize> = tokens
        .iter()
        .filter_map(Token::as_placeholder)
        .map(|hole| hole.effective_index())
        .collect();

    for index in (0..count).filter(|i| !used.contains(i)) {
        warnings.push(LintWarning::new(
            LintCategory::Unused,
            format!("argument {} is never referenced", index),
            template.len()..template.len(),
        ));
    }
}
