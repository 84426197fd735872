//! Placeholder grammar and the tokenizer
//!
//! ```text
//! hole        := '{' declaration (',' alignment)? (':' format)? '}'
//! declaration := ('@' | '$')? [letters digits '_']+
//! alignment   := '-'? [0-9]*
//! format      := any character except braces
//! ```
//!
//! A candidate is checked with a three-stage cursor (declaration, alignment,
//! format). The first top-level `,` in the declaration stage opens the
//! alignment, the first `:` outside the format stage opens the format.
//! Candidates that fail the check become literal text and do not consume a
//! rank.

use std::borrow::Cow;
use std::iter::Peekable;

use thiserror::Error;

use super::lexer::{lex, Segment};
use super::token::{Literal, Placeholder, Span, Token, SPREAD, STRINGIFY};

/// Why a placeholder candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("placeholder is never closed")]
    Unterminated,

    #[error("placeholder is empty")]
    Empty,

    #[error("braces cannot appear inside a placeholder")]
    StrayBrace,

    #[error("'{0}' is only allowed as the first character of a declaration")]
    MisplacedModifier(char),

    #[error("'{0}' is not allowed in a declaration")]
    InvalidName(char),

    #[error("'-' is only allowed at the start of an alignment")]
    MisplacedHyphen,

    #[error("'{0}' is not allowed in an alignment")]
    InvalidAlignment(char),

    #[error("placeholder has no name or index")]
    MissingName,
}

/// A rejected candidate with the location of the offending text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectReason,
    pub span: Span,
}

/// Raw parts of a valid placeholder body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields<'a> {
    pub symbol: &'a str,
    pub lining: &'a str,
    pub format: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Declaration,
    Alignment,
    Format,
}

/// Check the text between the braces of a candidate and split it into fields.
///
/// Errors carry byte ranges relative to `body`.
pub fn validate(body: &str) -> Result<Fields<'_>, (RejectReason, Span)> {
    if body.is_empty() {
        return Err((RejectReason::Empty, 0..0));
    }

    let mut stage = Stage::Declaration;
    let mut named = false;
    let mut symbol_end = body.len();
    let mut lining_start = None;
    let mut lining_end = body.len();
    let mut format_start = None;

    for (at, c) in body.char_indices() {
        let here = at..at + c.len_utf8();

        if c == '{' || c == '}' {
            return Err((RejectReason::StrayBrace, here));
        }

        if stage == Stage::Declaration && c == ',' {
            symbol_end = at;
            lining_start = Some(at + 1);
            stage = Stage::Alignment;
            continue;
        }

        if stage != Stage::Format && c == ':' {
            match stage {
                Stage::Declaration => symbol_end = at,
                _ => lining_end = at,
            }
            format_start = Some(at + 1);
            stage = Stage::Format;
            continue;
        }

        match stage {
            Stage::Declaration => {
                if c == STRINGIFY || c == SPREAD {
                    if at > 0 {
                        return Err((RejectReason::MisplacedModifier(c), here));
                    }
                } else if c == '_' || c.is_alphanumeric() {
                    named = true;
                } else {
                    return Err((RejectReason::InvalidName(c), here));
                }
            }
            Stage::Alignment => {
                if c == '-' {
                    if Some(at) != lining_start {
                        return Err((RejectReason::MisplacedHyphen, here));
                    }
                } else if !c.is_ascii_digit() {
                    return Err((RejectReason::InvalidAlignment(c), here));
                }
            }
            Stage::Format => {}
        }
    }

    if !named {
        return Err((RejectReason::MissingName, 0..symbol_end));
    }

    Ok(Fields {
        symbol: &body[..symbol_end],
        lining: lining_start.map_or("", |start| &body[start..lining_end]),
        format: format_start.map_or("", |start| &body[start..]),
    })
}

/// Lazy tokenizer over a template
///
/// Adjacent text, escapes and stray closing braces are merged into one
/// literal. Each candidate becomes its own token.
pub struct Tokenizer<'a> {
    source: &'a str,
    segments: Peekable<Box<dyn Iterator<Item = (Segment, Span)> + 'a>>,
    rank: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        let segments: Box<dyn Iterator<Item = (Segment, Span)> + 'a> = Box::new(lex(source));
        Self {
            source,
            segments: segments.peekable(),
            rank: 0,
        }
    }

    fn literal_run(&mut self) -> Option<Token<'a>> {
        let (_, first) = self.segments.peek()?.clone();
        let mut span = first.start..first.start;
        let mut text: Cow<'a, str> = Cow::Borrowed("");

        while let Some((segment, next)) = self.segments.next_if(|(s, _)| s.is_text()) {
            let piece = segment.literal(&self.source[next.clone()]);
            if text.is_empty() {
                text = Cow::Borrowed(piece);
            } else {
                text.to_mut().push_str(piece);
            }
            span.end = next.end;
        }

        Some(Token::Literal(Literal::new(span, text)))
    }

    fn candidate(&mut self, segment: Segment, span: Span) -> Token<'a> {
        let marker = &self.source[span.clone()];

        if segment == Segment::Unterminated {
            let whole = span.clone();
            return malformed(span, marker, RejectReason::Unterminated, whole);
        }

        let body = &marker[1..marker.len() - 1];
        match validate(body) {
            Ok(fields) => {
                let rank = self.rank;
                self.rank += 1;
                Token::Placeholder(Placeholder {
                    span,
                    rank,
                    marker,
                    symbol: fields.symbol,
                    lining: fields.lining,
                    format: fields.format,
                })
            }
            Err((reason @ (RejectReason::Empty | RejectReason::MissingName), _)) => {
                let whole = span.clone();
                malformed(span, marker, reason, whole)
            }
            Err((reason, at)) => {
                let base = span.start + 1;
                malformed(span, marker, reason, base + at.start..base + at.end)
            }
        }
    }
}

fn malformed(span: Span, marker: &str, reason: RejectReason, at: Span) -> Token<'_> {
    Token::Literal(Literal {
        span,
        text: Cow::Borrowed(marker),
        malformed: Some(Rejection { reason, span: at }),
    })
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (segment, span) = self.segments.peek()?.clone();
        if segment.is_text() {
            return self.literal_run();
        }
        self.segments.next();
        Some(self.candidate(segment, span))
    }
}

/// Tokenize a template into a reusable token list
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    Tokenizer::new(template).collect()
}
