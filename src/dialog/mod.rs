//! The fixed sequence of voice turns.
//!
//! Every turn speaks a prompt, listens with a grammar built just for that turn, reports what it
//! heard, and may react to the semantic values of the phrase. Speaking and listening never
//! overlap: the synthesizer blocks until playback is done before the recognizer is started.

use std::io::Write;

use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::stt::{Phrase, RecognitionEngine, Session};
use crate::tts::{Speech, SpeechBuilder, SpeechSynthesizer};
use crate::{Error, Result};

mod color;
mod turn;

pub use color::Color;
pub use turn::{Turn, COLOR_KEY, NAME_KEY};

/// Runs the dialog turns against a recognition session and a synthesizer, mirroring every spoken
/// line to a console.
pub struct Dialog<'d, E: RecognitionEngine, S: SpeechSynthesizer, W: Write> {
    session: &'d mut Session<E>,
    voice: &'d S,
    console: Console<W>,
}

impl<'d, E: RecognitionEngine, S: SpeechSynthesizer, W: Write> Dialog<'d, E, S, W> {
    #[allow(missing_docs)]
    pub fn new(session: &'d mut Session<E>, voice: &'d S, console: Console<W>) -> Self {
        Self {
            session,
            voice,
            console,
        }
    }

    /// Runs every turn once, in order, between an opening and a closing line.
    ///
    /// The first failing turn aborts the dialog; its error is wrapped with the turn it came from.
    pub fn run(&mut self) -> Result<()> {
        self.say("I'm listening...")?;
        for turn in Turn::iter() {
            self.run_turn(turn).map_err(|err| err.in_turn(turn))?;
        }
        self.say("Done listening")
    }

    /// Runs a single turn: prompt, listen, report, and react.
    pub fn run_turn(&mut self, turn: Turn) -> Result<Phrase> {
        info!(%turn, "turn started");
        self.say(turn.prompt())?;
        let grammar = turn.grammar()?;
        let phrase = self.session.listen(&grammar)?;
        self.say(format!(
            "I'm {:.0}% sure you just said {}",
            phrase.confidence * 100.0,
            phrase.text
        ))?;
        match turn {
            Turn::FavoriteColor => self.acknowledge_color(&phrase)?,
            Turn::WildcardName | Turn::DictatedName => self.greet(&phrase)?,
            Turn::Greeting | Turn::FreeChoice => {}
        }
        Ok(phrase)
    }

    /// Consumes the dialog and returns its console.
    pub fn into_console(self) -> Console<W> {
        self.console
    }

    fn acknowledge_color(&mut self, phrase: &Phrase) -> Result<()> {
        let value = match phrase.semantics.get(COLOR_KEY) {
            Some(value) => value,
            None => {
                warn!(text = phrase.text.as_str(), "color phrase recognized without a color value");
                return Ok(());
            }
        };
        let color = match value.as_int().copied().and_then(Color::from_code) {
            Some(color) => color,
            None => {
                warn!(%value, "unknown color code");
                return Ok(());
            }
        };
        self.console.set_highlight(Some(color.style()));
        let speech = SpeechBuilder::new()
            .start_emphasis()
            .say(color.label())
            .end_emphasis()
            .say(" is my favorite too!")
            .build()?;
        self.say(speech)
    }

    fn greet(&mut self, phrase: &Phrase) -> Result<()> {
        match phrase.semantics.get(NAME_KEY) {
            Some(name) => self.say(format!("Hi {}!", name)),
            None => {
                debug!(text = phrase.text.as_str(), "no name value in phrase");
                Ok(())
            }
        }
    }

    fn say<'s, T: Into<Speech<'s>>>(&mut self, speech: T) -> Result<()> {
        let speech = speech.into();
        self.console.write_line(speech.transcript())?;
        self.voice.speak(&speech).map_err(Error::Synthesis)
    }
}
