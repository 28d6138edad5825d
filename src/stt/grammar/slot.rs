use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::DefinitionError;
use crate::stt::SemanticValue;

use super::normalize;

/// An atomic unit of a recognition grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<'a> {
    /// A fixed sequence of words
    Literal(Cow<'a, str>),
    /// Exactly one of a fixed set of phrases, each mapped to a semantic value
    ChoiceSet(Vec<ChoiceEntry<'a>>),
    /// Any span of speech, which is recognized but not decoded
    Wildcard,
    /// Any span of speech, transcribed as free-form text
    Dictation,
}

impl<'a> Slot<'a> {
    /// Creates a slot that matches the given sequence of words.
    pub fn literal<T: Into<Cow<'a, str>>>(text: T) -> Self {
        Self::Literal(text.into())
    }

    /// Creates a slot that matches exactly one of the given entries.
    ///
    /// Fails if there are no entries, or if two entries have the same spoken form. Spoken forms
    /// are compared case-insensitively.
    pub fn choice<I: IntoIterator<Item = ChoiceEntry<'a>>>(
        entries: I,
    ) -> Result<Self, DefinitionError> {
        let entries: Vec<_> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(DefinitionError::EmptyChoice);
        }
        let mut seen = HashSet::new();
        for entry in entries.iter() {
            let spoken = normalize(&entry.spoken);
            if spoken.is_empty() {
                return Err(DefinitionError::EmptyLiteral);
            }
            if !seen.insert(spoken) {
                return Err(DefinitionError::DuplicateSpokenForm(entry.spoken.to_string()));
            }
        }
        Ok(Self::ChoiceSet(entries))
    }

    /// Creates a choice set whose entries resolve to their own spoken form.
    pub fn words<I, T>(words: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'a, str>>,
    {
        Self::choice(words.into_iter().map(|word| {
            let spoken = word.into();
            ChoiceEntry {
                value: SemanticValue::String(spoken.to_string()),
                spoken,
            }
        }))
    }

    /// Creates a slot that accepts any speech without decoding it.
    pub fn wildcard() -> Self {
        Self::Wildcard
    }

    /// Creates a slot that accepts any speech and transcribes it.
    pub fn dictation() -> Self {
        Self::Dictation
    }

    pub(super) fn validate(&self) -> Result<(), DefinitionError> {
        match self {
            Self::Literal(text) if normalize(text).is_empty() => Err(DefinitionError::EmptyLiteral),
            _ => Ok(()),
        }
    }
}

/// One alternative of a [`Slot::ChoiceSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceEntry<'a> {
    /// The phrase the user says.
    pub spoken: Cow<'a, str>,
    /// The value the phrase resolves to.
    pub value: SemanticValue,
}

impl<'a> ChoiceEntry<'a> {
    /// Constructs an entry mapping a spoken phrase to a value.
    pub fn new<T: Into<Cow<'a, str>>, V: Into<SemanticValue>>(spoken: T, value: V) -> Self {
        Self {
            spoken: spoken.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if `text` is this entry's spoken form, ignoring case and extra whitespace.
    pub fn matches(&self, text: &str) -> bool {
        normalize(&self.spoken) == normalize(text)
    }
}

impl<'a, V: Into<SemanticValue>> From<(&'a str, V)> for ChoiceEntry<'a> {
    fn from((spoken, value): (&'a str, V)) -> Self {
        Self::new(spoken, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_rejects_duplicates_ignoring_case() {
        let result = Slot::choice(vec![("Red", 1).into(), ("green", 2).into(), ("red", 3).into()]);
        assert_eq!(Err(DefinitionError::DuplicateSpokenForm("red".to_string())), result);
    }

    #[test]
    fn choice_requires_entries() {
        assert_eq!(Err(DefinitionError::EmptyChoice), Slot::choice(Vec::new()));
        assert_eq!(Err(DefinitionError::EmptyChoice), Slot::words(Vec::<&str>::new()));
    }

    #[test]
    fn words_map_to_themselves() {
        let slot = Slot::words(["red", "green"]).unwrap();
        assert_eq!(
            Slot::ChoiceSet(vec![ChoiceEntry::new("red", "red"), ChoiceEntry::new("green", "green")]),
            slot
        );
    }

    #[test]
    fn blank_literal_is_invalid() {
        assert_eq!(Err(DefinitionError::EmptyLiteral), Slot::literal("  ").validate());
        assert_eq!(Ok(()), Slot::literal("hello computer").validate());
    }
}
