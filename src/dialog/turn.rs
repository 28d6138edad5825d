use strum_macros::{Display, EnumIter};

use crate::stt::{Grammar, GrammarBuilder, Slot};
use crate::Result;

use super::Color;

/// Semantic key of the favorite color.
pub const COLOR_KEY: &str = "color";
/// Semantic key of the user's name.
pub const NAME_KEY: &str = "name";

/// One prompt-listen-respond step of the dialog. The turns run once each, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Turn {
    /// Confirms a fixed phrase.
    Greeting,
    /// Picks a color from a fixed vocabulary, without resolving a value.
    FreeChoice,
    /// Picks a color after the word "color", resolving it to a [`Color`] code.
    FavoriteColor,
    /// Captures a name with a wildcard, which never resolves to a value.
    WildcardName,
    /// Captures a name with dictation, which resolves to the transcribed text.
    DictatedName,
}

impl Turn {
    /// The line spoken before listening.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Greeting => "Say 'Hello Computer'",
            Self::FreeChoice | Self::FavoriteColor => {
                "What is your favorite Red, Blue, or Green color?"
            }
            Self::WildcardName | Self::DictatedName => "What is your name?",
        }
    }

    /// Composes the grammar this turn listens with.
    ///
    /// The favorite color grammar requires the word "color" before the color itself, so the user
    /// has to say e.g. "color red".
    pub fn grammar(self) -> Result<Grammar<'static>> {
        let mut builder = GrammarBuilder::new(self.to_string());
        match self {
            Self::Greeting => builder.append(Slot::literal("Hello Computer"))?,
            Self::FreeChoice => builder.append(Slot::words(["red", "green", "blue"])?)?,
            Self::FavoriteColor => builder
                .append(Slot::literal("color"))?
                .append_named(COLOR_KEY, Color::choice_slot()?)?,
            Self::WildcardName => builder
                .append(Slot::literal("My name is"))?
                .append_named(NAME_KEY, Slot::wildcard())?,
            Self::DictatedName => builder
                .append(Slot::literal("My name is"))?
                .append_named(NAME_KEY, Slot::dictation())?,
        };
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_turn_has_a_grammar() {
        for turn in Turn::iter() {
            let grammar = turn.grammar().unwrap();
            assert_eq!(turn.to_string(), grammar.name());
        }
    }

    #[test]
    fn turns_run_in_declaration_order() {
        assert_eq!(
            vec![
                Turn::Greeting,
                Turn::FreeChoice,
                Turn::FavoriteColor,
                Turn::WildcardName,
                Turn::DictatedName
            ],
            Turn::iter().collect::<Vec<_>>()
        );
        assert_eq!("favorite_color", Turn::FavoriteColor.to_string());
    }

    #[test]
    fn keyed_turns_expose_their_keys() {
        let keys = |turn: Turn| turn.grammar().unwrap().keys().map(str::to_string).collect::<Vec<_>>();
        assert!(keys(Turn::Greeting).is_empty());
        assert!(keys(Turn::FreeChoice).is_empty());
        assert_eq!(vec![COLOR_KEY], keys(Turn::FavoriteColor));
        assert_eq!(vec![NAME_KEY], keys(Turn::WildcardName));
        assert_eq!(vec![NAME_KEY], keys(Turn::DictatedName));
    }
}
