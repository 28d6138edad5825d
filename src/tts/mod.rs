//! Speech synthesis.
//!
//! The dialog speaks through a [`SpeechSynthesizer`]. The synthesizer must block until the
//! speech has been played completely, so that the recognizer never hears its own prompts.

use tracing::debug;

use crate::stt::EngineError;

mod speech;

pub use self::speech::{Speech, SpeechBuilder};

/// An engine that renders speech to an audio device.
pub trait SpeechSynthesizer {
    /// Renders the speech, blocking until playback has finished.
    fn speak(&self, speech: &Speech<'_>) -> Result<(), EngineError>;
}

impl<S: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Box<S> {
    fn speak(&self, speech: &Speech<'_>) -> Result<(), EngineError> {
        (**self).speak(speech)
    }
}

/// A synthesizer that renders nothing, for hosts without a speech engine. The console mirror
/// still shows every line.
#[derive(Debug, Default)]
pub struct MuteSynthesizer;

impl SpeechSynthesizer for MuteSynthesizer {
    fn speak(&self, speech: &Speech<'_>) -> Result<(), EngineError> {
        debug!(text = speech.transcript(), "speech muted");
        Ok(())
    }
}
