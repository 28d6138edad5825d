use std::time::Duration;

use thiserror::Error;

use super::Grammar;

/// Failure reported by a recognition or synthesis engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine is not installed or could not be started.
    #[error("engine unavailable: {0}")]
    Unavailable(String),
    /// The engine refused the request, e.g. because it cannot compile the grammar.
    #[error("engine rejected the request: {0}")]
    Rejected(String),
    /// The audio device the engine was using went away.
    #[error("audio device lost: {0}")]
    DeviceLost(String),
    /// The engine's input ended and no more speech will arrive.
    #[error("input closed")]
    InputClosed,
    #[allow(missing_docs)]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(all(windows, feature = "sapi"))]
    #[allow(missing_docs)]
    #[error(transparent)]
    Com(#[from] windows::core::Error),
}

/// What the engine matched for one slot of the active grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMatch {
    /// Position of the slot in [`Grammar::nodes`].
    pub node: usize,
    /// The engine's transcription of the speech that matched the slot.
    pub text: String,
    /// For choice sets, the index of the entry that was spoken.
    pub choice: Option<usize>,
}

/// A phrase as reported by the engine, before its semantic values are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecognition {
    /// The full transcript of the phrase.
    pub text: String,
    /// How sure the engine is of the transcript, between 0.0 and 1.0.
    pub confidence: f32,
    /// Per-slot match data.
    pub slots: Vec<SlotMatch>,
}

/// An engine that recognizes speech constrained by a grammar.
///
/// The engine holds process-global state, so a [`Session`](super::Session) makes sure that at
/// most one grammar is loaded into it at any time.
pub trait RecognitionEngine {
    /// Compiles the grammar and loads it, so that its phrases can be recognized.
    fn load_grammar(&mut self, grammar: &Grammar<'_>) -> Result<(), EngineError>;

    /// Waits up to `timeout` for a phrase from the loaded grammar. Returns `None` if nothing that
    /// fits the grammar was heard in that time.
    fn attempt_recognize(&mut self, timeout: Duration)
        -> Result<Option<RawRecognition>, EngineError>;

    /// Unloads every grammar previously loaded.
    fn unload_all_grammars(&mut self) -> Result<(), EngineError>;
}

impl<E: RecognitionEngine + ?Sized> RecognitionEngine for Box<E> {
    fn load_grammar(&mut self, grammar: &Grammar<'_>) -> Result<(), EngineError> {
        (**self).load_grammar(grammar)
    }

    fn attempt_recognize(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<RawRecognition>, EngineError> {
        (**self).attempt_recognize(timeout)
    }

    fn unload_all_grammars(&mut self) -> Result<(), EngineError> {
        (**self).unload_all_grammars()
    }
}
