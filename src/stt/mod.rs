//! Grammar-constrained speech recognition.
//!
//! A [`Grammar`] is composed from [`Slot`]s with a [`GrammarBuilder`]. A [`Session`] loads it
//! into a [`RecognitionEngine`], waits for a [`Phrase`], and resolves the semantic values of its
//! named slots into [`Semantics`].

mod engine;
mod grammar;
mod phrase;
mod semantics;
mod session;
mod text;

pub use engine::{EngineError, RawRecognition, RecognitionEngine, SlotMatch};
pub use grammar::{ChoiceEntry, Grammar, GrammarBuilder, Node, Slot};
pub use phrase::Phrase;
pub use semantics::{extract, SemanticValue, Semantics};
pub use session::{Session, SessionConfig};
pub use text::TextEngine;
