//! Tokenizer for message templates

mod grammar;
pub mod lexer;
pub mod token;

pub use grammar::{tokenize, validate, Fields, RejectReason, Rejection, Tokenizer};
pub use token::*;
