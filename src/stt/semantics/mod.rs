use std::ops::Index;

mod extract;
mod value;

pub use extract::extract;
pub use value::SemanticValue;

/// The semantic values resolved from a recognized phrase, keyed by the names of the slots that
/// produced them.
///
/// A key that is missing simply means its slot did not resolve to a value. This is the normal
/// outcome for wildcard slots and must not be treated as a failure.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Semantics {
    entries: Vec<(String, SemanticValue)>,
}

impl Semantics {
    /// Constructs an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value resolved for the given key, if any.
    pub fn get(&self, key: &str) -> Option<&SemanticValue> {
        self.entries.iter().find(|(name, _)| name == key).map(|(_, value)| value)
    }

    /// Returns `true` if a value was resolved for the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the resolved values in grammar order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SemanticValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub(crate) fn insert(&mut self, key: &str, value: SemanticValue) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }
}

impl Index<&str> for Semantics {
    type Output = SemanticValue;

    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no semantic value for key \"{}\"", key),
        }
    }
}
