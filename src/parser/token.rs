//! Token model shared by the weaver, the relation builder and the linter

use std::borrow::Cow;
use std::fmt;

use super::grammar::Rejection;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// Prefix character of a placeholder declaration
pub const STRINGIFY: char = '$';
pub const SPREAD: char = '@';

/// One piece of a tokenized template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text copied to the output unchanged
    Literal(Literal<'a>),
    /// A hole that receives an argument
    Placeholder(Placeholder<'a>),
}

impl<'a> Token<'a> {
    /// Byte offset of the token in the template
    pub fn offset(&self) -> usize {
        self.span().start
    }

    /// Source range covered by the token
    pub fn span(&self) -> &Span {
        match self {
            Token::Literal(lit) => &lit.span,
            Token::Placeholder(hole) => &hole.span,
        }
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder<'a>> {
        match self {
            Token::Placeholder(hole) => Some(hole),
            Token::Literal(_) => None,
        }
    }
}

/// A verbatim run of text
///
/// `text` has double braces collapsed. For a rejected placeholder candidate
/// the text is the raw candidate, braces included, and `malformed` says why
/// it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal<'a> {
    pub span: Span,
    pub text: Cow<'a, str>,
    pub malformed: Option<Rejection>,
}

impl<'a> Literal<'a> {
    pub fn new(span: Span, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            span,
            text: text.into(),
            malformed: None,
        }
    }
}

/// Rendering mode requested by a declaration prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `$`: always use the default string conversion
    Stringify,
    /// `@`: hand structured values to the serializer
    Spread,
}

/// A recognized `{...}` hole
///
/// All text fields borrow from the template. `marker` is the complete hole
/// including its braces; `symbol`, `lining` and `format` are the raw
/// declaration, alignment and format parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub span: Span,
    pub rank: usize,
    pub marker: &'a str,
    pub symbol: &'a str,
    pub lining: &'a str,
    pub format: &'a str,
}

impl<'a> Placeholder<'a> {
    /// Declaration prefix, if any
    pub fn modifier(&self) -> Option<Modifier> {
        match self.symbol.chars().next() {
            Some(STRINGIFY) => Some(Modifier::Stringify),
            Some(SPREAD) => Some(Modifier::Spread),
            _ => None,
        }
    }

    /// Declaration with any modifier prefix removed
    pub fn name(&self) -> &'a str {
        match self.modifier() {
            Some(_) => &self.symbol[1..],
            None => self.symbol,
        }
    }

    fn number(&self) -> Option<usize> {
        self.name()
            .parse::<i32>()
            .ok()
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Whether the declaration is an explicit argument index
    pub fn is_numbering(&self) -> bool {
        self.number().is_some()
    }

    pub fn is_stringify(&self) -> bool {
        self.modifier() == Some(Modifier::Stringify)
    }

    pub fn is_spreading(&self) -> bool {
        self.modifier() == Some(Modifier::Spread)
    }

    pub fn is_left_justified(&self) -> bool {
        self.lining.starts_with('-')
    }

    pub fn is_right_justified(&self) -> bool {
        !self.lining.is_empty() && !self.is_left_justified()
    }

    /// Requested field width, or `None` when the alignment does not parse
    /// as a 32-bit integer
    pub fn width(&self) -> Option<usize> {
        self.lining
            .parse::<i32>()
            .ok()
            .and_then(|w| usize::try_from(w.unsigned_abs()).ok())
    }

    /// The parsed index for numeric holes, otherwise the rank
    pub fn effective_index(&self) -> usize {
        self.number().unwrap_or(self.rank)
    }

    /// The name for named holes, empty for numeric ones
    pub fn effective_label(&self) -> &'a str {
        if self.is_numbering() {
            ""
        } else {
            self.name()
        }
    }
}

/// How a template binds its holes to arguments
///
/// Decided once for the whole template: only a template whose holes are all
/// numeric binds by index. One named hole anywhere switches every hole to
/// left-to-right binding by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Index,
    Rank,
}

impl Binding {
    pub fn of(tokens: &[Token<'_>]) -> Self {
        let all_numeric = tokens
            .iter()
            .filter_map(Token::as_placeholder)
            .all(Placeholder::is_numbering);

        if all_numeric {
            Binding::Index
        } else {
            Binding::Rank
        }
    }

    /// Argument position a hole reads from under this binding
    pub fn index(self, hole: &Placeholder<'_>) -> usize {
        match self {
            Binding::Index => hole.effective_index(),
            Binding::Rank => hole.rank,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(lit) => write!(
                f,
                "Type: Literal, Offset: [{}], Rank: [-], Symbol: [], Lining: [], Format: [], Marker: [{}]",
                lit.span.start, lit.text
            ),
            Token::Placeholder(hole) => write!(
                f,
                "Type: Placeholder, Offset: [{}], Rank: [{}], Symbol: [{}], Lining: [{}], Format: [{}], Marker: [{}]",
                hole.span.start, hole.rank, hole.symbol, hole.lining, hole.format, hole.marker
            ),
        }
    }
}
