use tracing::{debug, warn};

use crate::stt::{ChoiceEntry, Grammar, Slot, SlotMatch};

use super::{SemanticValue, Semantics};

/// Resolves the named slots of `grammar` to values, using the per-slot match data the recognition
/// engine reported for a phrase.
///
/// Literal and wildcard slots never produce a value. Choice sets produce the value of the entry
/// that was spoken, and dictation slots produce the transcribed text of their span.
pub fn extract(grammar: &Grammar<'_>, matches: &[SlotMatch]) -> Semantics {
    let mut semantics = Semantics::new();
    for (index, node) in grammar.nodes().iter().enumerate() {
        let key = match node.key() {
            Some(key) => key,
            None => continue,
        };
        let span = matches.iter().find(|span| span.node == index);
        let value = match node.slot() {
            Slot::Literal(_) | Slot::Wildcard => None,
            Slot::ChoiceSet(entries) => match span {
                Some(span) => resolve_choice(entries, span),
                None => {
                    warn!(grammar = grammar.name(), key, "engine reported no span for choice slot");
                    None
                }
            },
            Slot::Dictation => {
                let text = span.map(|span| span.text.trim().to_string()).unwrap_or_else(|| {
                    debug!(grammar = grammar.name(), key, "no span for dictation slot");
                    String::new()
                });
                Some(SemanticValue::String(text))
            }
        };
        if let Some(value) = value {
            semantics.insert(key, value);
        }
    }
    semantics
}

fn resolve_choice(entries: &[ChoiceEntry<'_>], span: &SlotMatch) -> Option<SemanticValue> {
    if let Some(entry) = span.choice.and_then(|choice| entries.get(choice)) {
        return Some(entry.value.clone());
    }
    let spoken = entries.iter().find(|entry| entry.matches(&span.text));
    if spoken.is_none() {
        warn!(text = span.text.as_str(), choice = ?span.choice, "choice span matches no entry");
    }
    spoken.map(|entry| entry.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::GrammarBuilder;

    fn span(node: usize, text: &str, choice: Option<usize>) -> SlotMatch {
        SlotMatch {
            node,
            text: text.to_string(),
            choice,
        }
    }

    fn color_grammar() -> Grammar<'static> {
        GrammarBuilder::new("color")
            .append(Slot::literal("color"))
            .unwrap()
            .append_named(
                "color",
                Slot::choice(vec![("red", 1).into(), ("green", 2).into(), ("blue", 3).into()])
                    .unwrap(),
            )
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn choice_uses_reported_entry() {
        let semantics = extract(&color_grammar(), &[span(0, "color", None), span(1, "blue", Some(2))]);
        assert_eq!(3, semantics["color"]);
        assert_eq!(1, semantics.len());
    }

    #[test]
    fn choice_falls_back_to_spoken_form() {
        let semantics = extract(&color_grammar(), &[span(1, " Green ", None)]);
        assert_eq!(Some(&SemanticValue::Int(2)), semantics.get("color"));

        let semantics = extract(&color_grammar(), &[span(1, "Green", Some(7))]);
        assert_eq!(2, semantics["color"]);
    }

    #[test]
    fn unknown_choice_text_is_absent() {
        let semantics = extract(&color_grammar(), &[span(1, "purple", None)]);
        assert!(semantics.is_empty());
    }

    #[test]
    fn wildcard_and_literal_produce_nothing() {
        let grammar = GrammarBuilder::new("name")
            .append_named("greeting", Slot::literal("my name is"))
            .unwrap()
            .append_named("name", Slot::wildcard())
            .unwrap()
            .build()
            .unwrap();
        let semantics =
            extract(&grammar, &[span(0, "my name is", None), span(1, "anything at all", None)]);
        assert!(!semantics.contains_key("name"));
        assert!(!semantics.contains_key("greeting"));
    }

    #[test]
    fn dictation_always_produces_a_string() {
        let grammar = GrammarBuilder::new("name")
            .append(Slot::literal("my name is"))
            .unwrap()
            .append_named("name", Slot::dictation())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!("Jordan", extract(&grammar, &[span(1, "Jordan", None)])["name"]);
        assert_eq!("", extract(&grammar, &[])["name"]);
    }
}
