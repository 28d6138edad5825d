use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tracing::{debug, warn};

use crate::stt::{Grammar, Phrase, RecognitionEngine, Session, SessionConfig};
use crate::Result;

#[cfg_attr(docsrs, doc(cfg(feature = "tokio-stt")))]
/// A recognition session that can be awaited.
///
/// Instead of letting the engine block until speech arrives, every attempt is made with a zero
/// timeout, and the task sleeps for [`SessionConfig::poll_interval`] between attempts that
/// recognized nothing. The contract is the same as [`Session::listen`]: the future completes
/// only with a recognized phrase or an engine failure. Unlike the blocking session, listening can
/// be cancelled by dropping the future.
pub struct AsyncSession<E: RecognitionEngine> {
    base: Session<E>,
}

impl<E: RecognitionEngine> AsyncSession<E> {
    /// Creates an async session for the given engine.
    pub fn new(engine: E, config: SessionConfig) -> Self {
        Self {
            base: Session::with_config(engine, config.with_attempt_timeout(Duration::ZERO)),
        }
    }

    /// Completes when the engine recognizes a phrase from the given grammar.
    ///
    /// If the future is dropped before it completes, e.g. by `tokio::time::timeout`, the grammar
    /// is unloaded and the session can listen again.
    pub async fn listen(&mut self, grammar: &Grammar<'_>) -> Result<Phrase> {
        self.base.load(grammar)?;
        let interval = self.base.config().poll_interval;
        let mut loaded = UnloadOnDrop(&mut self.base);
        let outcome = loop {
            match loaded.0.attempt() {
                Ok(Some(raw)) => break Ok(raw),
                Ok(None) => {
                    debug!(grammar = grammar.name(), "nothing recognized, yielding");
                    tokio::time::sleep(interval).await;
                }
                Err(err) => break Err(err),
            }
        };
        loaded.0.finish(grammar, outcome)
    }
}

/// Unloads the active grammar of the session, unless it was already unloaded.
struct UnloadOnDrop<'s, E: RecognitionEngine>(&'s mut Session<E>);

impl<'s, E: RecognitionEngine> Drop for UnloadOnDrop<'s, E> {
    fn drop(&mut self) {
        if let Some(grammar) = self.0.active_grammar().map(str::to_string) {
            debug!(grammar = grammar.as_str(), "listening abandoned");
            if let Err(err) = self.0.unload() {
                warn!(grammar = grammar.as_str(), error = %err, "failed to unload grammar");
            }
        }
    }
}

impl<E: RecognitionEngine> Deref for AsyncSession<E> {
    type Target = Session<E>;
    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<E: RecognitionEngine> DerefMut for AsyncSession<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
