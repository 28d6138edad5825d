use std::borrow::{Borrow, Cow};

mod builder;

pub use builder::SpeechBuilder;

/// A speech to be rendered by a synthesizer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Speech<'s> {
    /// Plain text
    Text(Cow<'s, str>),
    /// XML-encoded speech, along with the plain text it pronounces
    Xml {
        /// The rendering instructions.
        markup: Cow<'s, str>,
        /// The words spoken, without markup.
        transcript: Cow<'s, str>,
    },
}

impl<'s> Speech<'s> {
    /// The text or markup handed to the synthesizer.
    pub fn contents(&self) -> &str {
        match self {
            Self::Text(cow) => cow.borrow(),
            Self::Xml {
                markup,
                ..
            } => markup.borrow(),
        }
    }

    /// The words that will be spoken, without any markup.
    pub fn transcript(&self) -> &str {
        match self {
            Self::Text(cow) => cow.borrow(),
            Self::Xml {
                transcript,
                ..
            } => transcript.borrow(),
        }
    }

    /// Returns `true` if [`contents`](Speech::contents) is XML markup.
    pub fn is_xml(&self) -> bool {
        matches!(self, Self::Xml { .. })
    }
}

impl<'s> From<&'s str> for Speech<'s> {
    fn from(s: &'s str) -> Self {
        Self::Text(s.into())
    }
}

impl<'s> From<String> for Speech<'s> {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}
