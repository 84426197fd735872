//! Relation trace: which label each hole was bound to, and with what value

use std::fmt;

use crate::parser::{Binding, Token};
use crate::value::Argument;

/// A label paired with the argument it resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub label: String,
    /// `None` when the hole had no argument
    pub value: Option<Argument>,
}

impl Relation {
    pub fn new(label: impl Into<String>, value: Option<Argument>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Ordered relation set; labels may repeat in rank mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relations(Vec<Relation>);

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Relation> {
        self.0.get(index)
    }

    /// First relation carrying `label`
    pub fn by_label(&self, label: &str) -> Option<&Relation> {
        self.0.iter().find(|relation| relation.label == label)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|relation| relation.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relation> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Relation> {
        self.0.clone()
    }

    fn push(&mut self, relation: Relation) {
        self.0.push(relation);
    }
}

impl IntoIterator for Relations {
    type Item = Relation;
    type IntoIter = std::vec::IntoIter<Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Relations {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Relations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Count: {}", self.0.len())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {:?}", self.label, value),
            None => write!(f, "{}: <null>", self.label),
        }
    }
}

/// Trace the binding of every hole in `tokens`
///
/// Uses the same binding decision as the weaver. In index mode a repeated
/// index is recorded once; in rank mode every hole gets its own relation.
pub fn build_relations(tokens: &[Token<'_>], arguments: &[Argument]) -> Relations {
    let binding = Binding::of(tokens);
    let mut relations = Relations::new();

    for hole in tokens.iter().filter_map(Token::as_placeholder) {
        let index = binding.index(hole);
        let label = match binding {
            Binding::Index => format!("Value{}", index),
            Binding::Rank if hole.is_numbering() => format!("Value{}", hole.rank),
            Binding::Rank => hole.effective_label().to_string(),
        };

        if binding == Binding::Index && relations.contains(&label) {
            continue;
        }

        let value = arguments.get(index).filter(|v| !v.is_null()).cloned();
        relations.push(Relation::new(label, value));
    }

    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::parser::tokenize;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_index_mode_dedup() {
        let relations = build_relations(&tokenize("{0}{1}{0}"), &args!["a", "b"]);
        assert_eq!(relations.len(), 2);
        assert_eq!(relations.get(0).unwrap().label, "Value0");
        assert_eq!(relations.get(1).unwrap().label, "Value1");
        assert_eq!(relations.to_string(), "Count: 2");
    }

    #[test]
    fn test_index_mode_uses_parsed_index() {
        let relations = build_relations(&tokenize("{2} {0}"), &args!["a", "b", "c"]);
        assert_eq!(
            relations.to_vec(),
            vec![
                Relation::new("Value2", Some(Argument::from("c"))),
                Relation::new("Value0", Some(Argument::from("a"))),
            ]
        );
    }

    #[test]
    fn test_rank_mode_labels() {
        let relations = build_relations(
            &tokenize("{user} did {5} to {@user}"),
            &args!["ada", "x"],
        );
        let labels: Vec<&str> = relations.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["user", "Value1", "user"]);
        assert_eq!(relations.get(1).unwrap().value, Some(Argument::from("x")));
        assert_eq!(relations.get(2).unwrap().value, None);
    }

    #[test]
    fn test_lookup_by_label() {
        let relations = build_relations(&tokenize("{a} {b} {a}"), &args![1, 2, 3]);
        assert_eq!(relations.by_label("a").unwrap().value, Some(Argument::Int(1)));
        assert_eq!(relations.index_of("b"), Some(1));
        assert!(!relations.contains("c"));
    }

    #[test]
    fn test_literals_and_empty_arguments() {
        assert!(build_relations(&tokenize("no holes {{here}}"), &[]).is_empty());

        let relations = build_relations(&tokenize("{0} {name}"), &[]);
        assert_eq!(relations.len(), 2);
        assert!(relations.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_null_argument_is_none() {
        let relations = build_relations(&tokenize("{0}"), &[Argument::Null]);
        assert_eq!(relations.get(0).unwrap().value, None);
        assert_eq!(relations.get(0).unwrap().to_string(), "Value0: <null>");
    }
}
