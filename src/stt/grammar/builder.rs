use std::borrow::Cow;
use std::mem;

use crate::error::DefinitionError;
use crate::Result;

use super::{Grammar, Node, Slot};

/// Helper type that composes a [`Grammar`] by appending slots in the order they must be spoken.
///
/// ```
/// # use voice_dialog::stt::{GrammarBuilder, Slot};
/// let grammar = GrammarBuilder::new("favorite color")
///     .append(Slot::literal("color"))?
///     .append_named("color", Slot::choice(vec![("red", 1).into(), ("blue", 3).into()])?)?
///     .build()?;
/// assert_eq!(vec!["color"], grammar.keys().collect::<Vec<_>>());
/// # Ok::<(), voice_dialog::Error>(())
/// ```
///
/// Every mistake is reported while composing, never when the grammar is later used for
/// recognition.
pub struct GrammarBuilder<'a> {
    name: Cow<'a, str>,
    nodes: Vec<Node<'a>>,
}

impl<'a> GrammarBuilder<'a> {
    /// Starts a new grammar with the given name.
    pub fn new<S: Into<Cow<'a, str>>>(name: S) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Appends a slot whose value, if any, is not reported.
    pub fn append(&mut self, slot: Slot<'a>) -> Result<&mut Self> {
        slot.validate()?;
        self.nodes.push(Node {
            key: None,
            slot,
        });
        Ok(self)
    }

    /// Appends a slot whose value will be reported under the given key. Keys must be unique
    /// within the grammar.
    pub fn append_named<S: Into<Cow<'a, str>>>(
        &mut self,
        key: S,
        slot: Slot<'a>,
    ) -> Result<&mut Self> {
        let key = key.into();
        if self.nodes.iter().any(|node| node.key() == Some(key.as_ref())) {
            return Err(DefinitionError::DuplicateKey {
                grammar: self.name.to_string(),
                key: key.into_owned(),
            }
            .into());
        }
        slot.validate()?;
        self.nodes.push(Node {
            key: Some(key),
            slot,
        });
        Ok(self)
    }

    /// Builds the grammar from the slots appended so far. Clears the contents of the builder.
    pub fn build(&mut self) -> Result<Grammar<'a>> {
        if self.nodes.is_empty() {
            return Err(DefinitionError::EmptyGrammar(self.name.to_string()).into());
        }
        Ok(Grammar {
            name: self.name.clone(),
            nodes: mem::take(&mut self.nodes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn duplicate_key_fails_at_composition() {
        let mut builder = GrammarBuilder::new("names");
        builder.append_named("name", Slot::wildcard()).unwrap();
        let err = builder.append_named("name", Slot::dictation()).err().unwrap();
        assert!(matches!(
            err,
            Error::GrammarDefinition(DefinitionError::DuplicateKey { ref grammar, ref key })
                if grammar == "names" && key == "name"
        ));
    }

    #[test]
    fn empty_grammar_is_rejected() {
        let err = GrammarBuilder::new("nothing").build().err().unwrap();
        assert!(matches!(err, Error::GrammarDefinition(DefinitionError::EmptyGrammar(_))));
    }

    #[test]
    fn build_keeps_order_and_clears_builder() {
        let mut builder = GrammarBuilder::new("greeting");
        builder.append(Slot::literal("my name is")).unwrap();
        builder.append_named("name", Slot::dictation()).unwrap();
        let grammar = builder.build().unwrap();

        assert_eq!("greeting", grammar.name());
        assert_eq!(2, grammar.nodes().len());
        assert_eq!(None, grammar.nodes()[0].key());
        assert_eq!(Some(&Slot::Dictation), grammar.slot("name"));
        assert!(builder.build().is_err());
    }
}
