use super::Semantics;

/// A phrase recognized during one listening turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    /// The full transcript of the phrase. May be empty.
    pub text: String,
    /// How sure the engine is of the transcript, between 0.0 and 1.0.
    pub confidence: f32,
    /// The values resolved from the named slots of the grammar.
    pub semantics: Semantics,
}
