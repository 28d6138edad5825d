#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Voice dialogs driven by recognition grammars.
//!
//! # Features
//!
//! The goal of this crate is to run a spoken conversation in which every answer is constrained by
//! a grammar: the program speaks a prompt, tells the recognizer exactly which phrases it may
//! expect, waits until one of them is heard, and pulls typed values out of what was said.
//!
//! ## Speech recognition
//!
//! The [stt] module provides the grammar model and the listening protocol.
//!
//! A grammar is an ordered pattern of slots: literal phrases, choice sets that map each spoken
//! form to a value, wildcards that accept any speech without decoding it, and dictation spans
//! that are transcribed as free text. Slots can be given a semantic key, under which their value
//! is reported when a phrase is recognized.
//!
//! A [`Session`](stt::Session) owns the recognition engine and keeps at most one grammar loaded
//! at a time. Listening blocks until the engine recognizes a phrase; attempts that hear nothing
//! are retried transparently.
//!
//! ## Text-to-speech
//!
//! The [tts] module describes the speech to render, as plain text or as XML with emphasis and
//! pauses, and the synthesizer interface the dialog speaks through.
//!
//! ## Dialog
//!
//! The [dialog] module runs a fixed sequence of turns that exercises every kind of slot, echoing
//! each spoken line to the [console].
//!
//! # Engines
//!
//! The recognizer and synthesizer are external engines, described by the
//! [`RecognitionEngine`](stt::RecognitionEngine) and [`SpeechSynthesizer`](tts::SpeechSynthesizer)
//! traits. [`TextEngine`](stt::TextEngine) matches typed utterances against the loaded grammar.
//! On Windows, the `sapi` feature provides both engines on top of Microsoft's Speech API.

pub mod console;
pub mod dialog;
mod error;
pub mod stt;
pub mod tts;

#[cfg(all(windows, feature = "sapi"))]
pub mod sapi;

#[cfg(feature = "tokio-stt")]
pub mod tokio;

pub use error::{DefinitionError, Error};

/// The type returned by the functions and methods of this crate.
pub type Result<T> = std::result::Result<T, Error>;
