use thiserror::Error;

use crate::dialog::Turn;
use crate::stt::EngineError;

/// Reasons a grammar cannot be composed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A literal slot with no words in it.
    #[error("literal phrase is empty")]
    EmptyLiteral,
    /// A choice set with no entries to choose from.
    #[error("choice set has no entries")]
    EmptyChoice,
    /// Two entries of one choice set share a spoken form (compared case-insensitively).
    #[error("spoken form \"{0}\" appears more than once in the choice set")]
    DuplicateSpokenForm(String),
    /// Two named slots of one grammar share a key.
    #[error("semantic key \"{key}\" is already used in grammar \"{grammar}\"")]
    DuplicateKey {
        /// Name of the grammar under construction.
        grammar: String,
        /// The repeated key.
        key: String,
    },
    /// A grammar with no slots.
    #[error("grammar \"{0}\" has no slots")]
    EmptyGrammar(String),
}

/// The error type returned by the functions and methods of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The grammar could not be composed. In practice this is a programming error.
    #[error("invalid grammar: {0}")]
    GrammarDefinition(#[from] DefinitionError),
    /// The recognition engine refused to load the grammar.
    #[error("recognition engine rejected grammar \"{grammar}\"")]
    GrammarLoad {
        /// Name of the rejected grammar.
        grammar: String,
        /// Engine-specific cause.
        #[source]
        source: EngineError,
    },
    /// A grammar was loaded while another one was still active.
    #[error("cannot load grammar \"{requested}\" while grammar \"{active}\" is still loaded")]
    GrammarAlreadyLoaded {
        /// Name of the grammar that is currently loaded.
        active: String,
        /// Name of the grammar whose loading was refused.
        requested: String,
    },
    /// The recognition engine failed in a way that cannot be retried.
    #[error("recognition engine failed")]
    RecognitionEngine(#[source] EngineError),
    /// The synthesizer failed to render a prompt.
    #[error("speech synthesis failed")]
    Synthesis(#[source] EngineError),
    /// A default audio device required at startup is missing.
    #[error("audio device unavailable")]
    AudioDevice(#[source] EngineError),
    /// The rendering instructions of a speech could not be encoded.
    #[error("speech markup could not be written")]
    Markup(#[from] xml::writer::Error),
    /// Writing to the console mirror failed.
    #[error("console output failed")]
    Console(#[from] std::io::Error),
    /// A dialog turn was aborted.
    #[error("turn {turn} failed")]
    Turn {
        /// The turn that was running.
        turn: Turn,
        /// Why it was aborted.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps this error with the dialog turn it occurred in.
    pub fn in_turn(self, turn: Turn) -> Self {
        Self::Turn {
            turn,
            source: Box::new(self),
        }
    }
}
