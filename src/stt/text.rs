use std::io::BufRead;
use std::time::Duration;

use tracing::debug;

use super::grammar::normalize;
use super::{EngineError, Grammar, RawRecognition, RecognitionEngine, Slot, SlotMatch};

/// Share of confidence lost for every word that fell into a wildcard or dictation span.
const FREE_WORD_PENALTY: f32 = 0.5;

/// A recognition engine that reads utterances as lines of text and matches them against the
/// loaded grammar.
///
/// Each call to [`attempt_recognize`](RecognitionEngine::attempt_recognize) consumes one line.
/// Blank lines and lines the grammar does not accept count as "nothing recognized". The end of the
/// input is reported as [`EngineError::InputClosed`].
///
/// Words are compared ignoring case. Like a speech engine, the transcript spells constrained
/// words the way the grammar does, and free spans the way they were typed.
pub struct TextEngine<R: BufRead> {
    input: R,
    loaded: Option<Compiled>,
}

impl<R: BufRead> TextEngine<R> {
    /// Creates an engine that reads utterances from the given input.
    pub fn new(input: R) -> Self {
        Self {
            input,
            loaded: None,
        }
    }
}

impl<R: BufRead> RecognitionEngine for TextEngine<R> {
    fn load_grammar(&mut self, grammar: &Grammar<'_>) -> Result<(), EngineError> {
        if let Some(loaded) = &self.loaded {
            return Err(EngineError::Rejected(format!(
                "grammar \"{}\" is still loaded",
                loaded.name
            )));
        }
        self.loaded = Some(Compiled::new(grammar));
        Ok(())
    }

    fn attempt_recognize(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<RawRecognition>, EngineError> {
        let compiled = match &self.loaded {
            Some(compiled) => compiled,
            None => return Err(EngineError::Rejected("no grammar loaded".to_string())),
        };
        let line = read_utterance(&mut self.input)?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        let result = compiled.recognize(&words);
        if result.is_none() {
            debug!(grammar = compiled.name.as_str(), utterance = line.trim(), "out of grammar");
        }
        Ok(result)
    }

    fn unload_all_grammars(&mut self) -> Result<(), EngineError> {
        self.loaded = None;
        Ok(())
    }
}

/// Reads the next line of input. Bytes that are not valid UTF-8 are replaced rather than
/// rejected, so garbled input is heard as speech that fits no grammar.
fn read_utterance<R: BufRead>(input: &mut R) -> Result<String, EngineError> {
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Err(EngineError::InputClosed);
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

struct Words {
    tokens: Vec<String>,
    spelling: String,
}

impl Words {
    fn new(text: &str) -> Self {
        Self {
            tokens: normalize(text).split(' ').map(str::to_string).collect(),
            spelling: text.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }

    fn prefix_of(&self, words: &[String]) -> bool {
        words.len() >= self.tokens.len()
            && words.iter().zip(self.tokens.iter()).all(|(word, token)| word == token)
    }
}

enum Pattern {
    Words(Words),
    Choice(Vec<Words>),
    Free,
}

struct Compiled {
    name: String,
    patterns: Vec<Pattern>,
}

struct Span {
    start: usize,
    end: usize,
    choice: Option<usize>,
}

impl Compiled {
    fn new(grammar: &Grammar<'_>) -> Self {
        let patterns = grammar
            .nodes()
            .iter()
            .map(|node| match node.slot() {
                Slot::Literal(text) => Pattern::Words(Words::new(text)),
                Slot::ChoiceSet(entries) => {
                    Pattern::Choice(entries.iter().map(|entry| Words::new(&entry.spoken)).collect())
                }
                Slot::Wildcard | Slot::Dictation => Pattern::Free,
            })
            .collect();
        Self {
            name: grammar.name().to_string(),
            patterns,
        }
    }

    fn recognize(&self, words: &[&str]) -> Option<RawRecognition> {
        let lowered: Vec<String> = words.iter().map(|word| word.to_lowercase()).collect();
        let spans = self.match_from(0, &lowered, 0)?;

        let mut transcript = Vec::new();
        let mut slots = Vec::new();
        let mut free_words = 0;
        for (node, span) in spans.iter().enumerate() {
            let text = match &self.patterns[node] {
                Pattern::Words(expected) => expected.spelling.clone(),
                Pattern::Choice(options) => match span.choice.and_then(|index| options.get(index)) {
                    Some(option) => option.spelling.clone(),
                    None => words[span.start..span.end].join(" "),
                },
                Pattern::Free => {
                    free_words += span.end - span.start;
                    words[span.start..span.end].join(" ")
                }
            };
            transcript.push(text.clone());
            slots.push(SlotMatch {
                node,
                text,
                choice: span.choice,
            });
        }

        let confidence = 1.0 - FREE_WORD_PENALTY * free_words as f32 / words.len() as f32;
        Some(RawRecognition {
            text: transcript.join(" "),
            confidence,
            slots,
        })
    }

    fn match_from(&self, node: usize, words: &[String], pos: usize) -> Option<Vec<Span>> {
        let pattern = match self.patterns.get(node) {
            Some(pattern) => pattern,
            None => return if pos == words.len() { Some(Vec::new()) } else { None },
        };
        let candidates: Vec<(usize, Option<usize>)> = match pattern {
            Pattern::Words(expected) => expected
                .prefix_of(&words[pos..])
                .then(|| (pos + expected.tokens.len(), None))
                .into_iter()
                .collect(),
            Pattern::Choice(options) => options
                .iter()
                .enumerate()
                .filter(|(_, expected)| expected.prefix_of(&words[pos..]))
                .map(|(index, expected)| (pos + expected.tokens.len(), Some(index)))
                .collect(),
            Pattern::Free => (pos + 1..=words.len()).map(|end| (end, None)).collect(),
        };
        for (end, choice) in candidates {
            if let Some(mut rest) = self.match_from(node + 1, words, end) {
                rest.insert(
                    0,
                    Span {
                        start: pos,
                        end,
                        choice,
                    },
                );
                return Some(rest);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::GrammarBuilder;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn name_grammar(slot: Slot<'static>) -> Grammar<'static> {
        GrammarBuilder::new("name")
            .append(Slot::literal("My name is"))
            .unwrap()
            .append_named("name", slot)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn literal_is_spelled_like_the_grammar() {
        let grammar = GrammarBuilder::new("hello")
            .append(Slot::literal("Hello Computer"))
            .unwrap()
            .build()
            .unwrap();
        let mut engine = TextEngine::new("  hello   COMPUTER \n".as_bytes());
        engine.load_grammar(&grammar).unwrap();

        let phrase = engine.attempt_recognize(TIMEOUT).unwrap().unwrap();
        assert_eq!("Hello Computer", phrase.text);
        assert_eq!(1.0, phrase.confidence);
        assert_eq!(1, phrase.slots.len());
    }

    #[test]
    fn choice_reports_entry_index() {
        let grammar = GrammarBuilder::new("color")
            .append(Slot::literal("color"))
            .unwrap()
            .append_named("color", Slot::words(["red", "light green", "blue"]).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let mut engine = TextEngine::new("color light green\n".as_bytes());
        engine.load_grammar(&grammar).unwrap();

        let phrase = engine.attempt_recognize(TIMEOUT).unwrap().unwrap();
        assert_eq!("color light green", phrase.text);
        assert_eq!(
            SlotMatch {
                node: 1,
                text: "light green".to_string(),
                choice: Some(1),
            },
            phrase.slots[1]
        );
    }

    #[test]
    fn free_span_keeps_typed_words_and_lowers_confidence() {
        let mut engine = TextEngine::new("my name is Jordan Lee\n".as_bytes());
        engine.load_grammar(&name_grammar(Slot::dictation())).unwrap();

        let phrase = engine.attempt_recognize(TIMEOUT).unwrap().unwrap();
        assert_eq!("My name is Jordan Lee", phrase.text);
        assert_eq!("Jordan Lee", phrase.slots[1].text);
        assert!(phrase.confidence > 0.0 && phrase.confidence < 1.0);
    }

    #[test]
    fn free_span_needs_at_least_one_word() {
        let mut engine = TextEngine::new("my name is\n".as_bytes());
        engine.load_grammar(&name_grammar(Slot::wildcard())).unwrap();
        assert_eq!(None, engine.attempt_recognize(TIMEOUT).unwrap());
    }

    #[test]
    fn blank_and_unknown_lines_are_no_match() {
        let mut engine = TextEngine::new("\n   \ngoodbye computer\n".as_bytes());
        engine.load_grammar(&name_grammar(Slot::wildcard())).unwrap();
        for _ in 0..3 {
            assert_eq!(None, engine.attempt_recognize(TIMEOUT).unwrap());
        }
        assert!(matches!(engine.attempt_recognize(TIMEOUT), Err(EngineError::InputClosed)));
    }

    #[test]
    fn one_grammar_at_a_time() {
        let mut engine = TextEngine::new("".as_bytes());
        engine.load_grammar(&name_grammar(Slot::wildcard())).unwrap();
        assert!(matches!(
            engine.load_grammar(&name_grammar(Slot::dictation())),
            Err(EngineError::Rejected(_))
        ));
        engine.unload_all_grammars().unwrap();
        engine.load_grammar(&name_grammar(Slot::dictation())).unwrap();
    }

    #[test]
    fn recognizing_without_grammar_is_rejected() {
        let mut engine = TextEngine::new("my name is Kai\n".as_bytes());
        assert!(matches!(engine.attempt_recognize(TIMEOUT), Err(EngineError::Rejected(_))));

        engine.load_grammar(&name_grammar(Slot::dictation())).unwrap();
        let phrase = engine.attempt_recognize(TIMEOUT).unwrap().unwrap();
        assert_eq!("My name is Kai", phrase.text);
    }

    #[test]
    fn invalid_utf8_is_no_match() {
        let mut engine = TextEngine::new(&b"my name \xff\xfe\nmy name is Kai\n"[..]);
        engine.load_grammar(&name_grammar(Slot::dictation())).unwrap();

        assert_eq!(None, engine.attempt_recognize(TIMEOUT).unwrap());
        let phrase = engine.attempt_recognize(TIMEOUT).unwrap().unwrap();
        assert_eq!("Kai", phrase.slots[1].text);
    }
}
