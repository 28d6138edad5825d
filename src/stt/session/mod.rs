use tracing::{debug, info, warn};

use crate::{Error, Result};

use super::{extract, Grammar, Phrase, RawRecognition, RecognitionEngine};

mod config;

pub use config::SessionConfig;

/// Drives a recognition engine one grammar at a time.
///
/// The session owns the engine, and guarantees that at most one grammar is loaded into it at any
/// instant. [`listen`](Session::listen) loads a grammar, blocks until the engine recognizes a
/// phrase from it, unloads it, and resolves the phrase's semantic values.
pub struct Session<E: RecognitionEngine> {
    engine: E,
    config: SessionConfig,
    active: Option<String>,
}

impl<E: RecognitionEngine> Session<E> {
    /// Creates a session with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, SessionConfig::default())
    }

    #[allow(missing_docs)]
    pub fn with_config(engine: E, config: SessionConfig) -> Self {
        Self {
            engine,
            config,
            active: None,
        }
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The name of the grammar that is currently loaded, if any.
    pub fn active_grammar(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Borrows the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Borrows the underlying engine mutably.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Consumes the session and returns the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Loads the grammar into the engine. Fails if another grammar is still loaded.
    pub fn load(&mut self, grammar: &Grammar<'_>) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(Error::GrammarAlreadyLoaded {
                active: active.clone(),
                requested: grammar.name().to_string(),
            });
        }
        self.engine.load_grammar(grammar).map_err(|source| Error::GrammarLoad {
            grammar: grammar.name().to_string(),
            source,
        })?;
        debug!(grammar = grammar.name(), "grammar loaded");
        self.active = Some(grammar.name().to_string());
        Ok(())
    }

    /// Unloads whatever grammar is loaded, returning the engine to its unloaded state.
    ///
    /// The grammar is forgotten even if the engine fails to unload it.
    pub fn unload(&mut self) -> Result<()> {
        let result = self.engine.unload_all_grammars().map_err(Error::RecognitionEngine);
        if let Some(name) = self.active.take() {
            debug!(grammar = name.as_str(), ok = result.is_ok(), "grammar unloaded");
        }
        result
    }

    /// Loads the grammar and blocks until the engine recognizes a phrase from it.
    ///
    /// Attempts that recognize nothing (silence, speech that doesn't fit the grammar) are retried
    /// without limit; the only ways out are a recognized phrase or an engine failure. There is no
    /// cancellation.
    pub fn listen(&mut self, grammar: &Grammar<'_>) -> Result<Phrase> {
        self.load(grammar)?;
        let mut retries = 0usize;
        let outcome = loop {
            match self.attempt() {
                Ok(Some(raw)) => break Ok(raw),
                Ok(None) => {
                    retries += 1;
                    debug!(grammar = grammar.name(), retries, "nothing recognized, listening again");
                }
                Err(err) => break Err(err),
            }
        };
        self.finish(grammar, outcome)
    }

    pub(crate) fn attempt(&mut self) -> Result<Option<RawRecognition>> {
        self.engine
            .attempt_recognize(self.config.attempt_timeout)
            .map_err(Error::RecognitionEngine)
    }

    pub(crate) fn finish(
        &mut self,
        grammar: &Grammar<'_>,
        outcome: Result<RawRecognition>,
    ) -> Result<Phrase> {
        let raw = match outcome {
            Ok(raw) => raw,
            Err(err) => {
                if let Err(unload_err) = self.unload() {
                    warn!(grammar = grammar.name(), error = %unload_err, "failed to unload grammar");
                }
                return Err(err);
            }
        };
        self.unload()?;
        info!(
            grammar = grammar.name(),
            text = raw.text.as_str(),
            confidence = raw.confidence,
            "phrase recognized"
        );
        Ok(Phrase {
            semantics: extract(grammar, &raw.slots),
            text: raw.text,
            confidence: raw.confidence,
        })
    }
}
