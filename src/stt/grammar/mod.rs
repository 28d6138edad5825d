use std::borrow::Cow;

mod builder;
mod slot;

pub use builder::GrammarBuilder;
pub use slot::{ChoiceEntry, Slot};

/// An immutable pattern of slots that defines exactly which utterances can be recognized during
/// one listening turn.
///
/// The slots are matched in order, so a grammar made of the literal "color" followed by a choice
/// of colors will recognize "color red", but not "red" on its own. Use [`GrammarBuilder`] to
/// compose one.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar<'a> {
    name: Cow<'a, str>,
    nodes: Vec<Node<'a>>,
}

impl<'a> Grammar<'a> {
    /// The name the grammar was built with. Used to identify it in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slots of the grammar, in the order they must be spoken.
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    /// The semantic keys of all the named slots, in grammar order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(Node::key)
    }

    /// Returns the slot with the given semantic key.
    pub fn slot(&self, key: &str) -> Option<&Slot<'a>> {
        self.nodes.iter().find(|node| node.key() == Some(key)).map(Node::slot)
    }
}

/// A slot in a grammar, optionally marked with a semantic key.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    key: Option<Cow<'a, str>>,
    slot: Slot<'a>,
}

impl<'a> Node<'a> {
    /// The semantic key under which the value of this slot is reported.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[allow(missing_docs)]
    pub fn slot(&self) -> &Slot<'a> {
        &self.slot
    }
}

/// Lowercases the text and collapses all whitespace runs into single spaces.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}
