//! Outer scanner for message templates using logos
//!
//! The scanner only finds segment boundaries. It does not decide whether a
//! placeholder candidate is well formed; that is left to the grammar.

use logos::Logos;

use super::token::Span;

/// A raw segment of a template
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// `{{`, renders as a single `{`
    #[token("{{")]
    EscapedOpen,

    /// `}}`, renders as a single `}`
    #[token("}}")]
    EscapedClose,

    /// A `}` without a partner, kept as text
    #[token("}")]
    LoneClose,

    /// `{...}` hole candidate; never starts with `{{`, inner `{` is content
    #[regex(r"\{([^{}][^}]*)?\}")]
    Candidate,

    /// `{` that runs to the end of input without a closing brace
    #[regex(r"\{([^{}][^}]*)?")]
    Unterminated,

    #[regex(r"[^{}]+")]
    Text,
}

impl Segment {
    /// Literal text contributed by a text-like segment
    pub fn literal<'a>(&self, slice: &'a str) -> &'a str {
        match self {
            Segment::EscapedOpen => "{",
            Segment::EscapedClose | Segment::LoneClose => "}",
            _ => slice,
        }
    }

    /// Whether this segment belongs to a literal run
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Segment::Text | Segment::EscapedOpen | Segment::EscapedClose | Segment::LoneClose
        )
    }
}

/// Lex a template into segments with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Segment, Span)> + '_ {
    Segment::lexer(input)
        .spanned()
        .map(|(seg, span)| (seg.unwrap_or(Segment::Text), span))
}
