use std::fmt;

/// A typed value extracted from a recognized phrase through a named slot.
#[derive(Debug, PartialEq, Eq, Clone)]
#[allow(missing_docs)]
pub enum SemanticValue {
    Int(i32),
    String(String),
}

impl SemanticValue {
    /// Borrows the underlying value, if this is a `SemanticValue::Int`.
    pub fn as_int(&self) -> Option<&i32> {
        if let Self::Int(i) = self {
            Some(i)
        } else {
            None
        }
    }

    /// Borrows the underlying value, if this is a `SemanticValue::String`.
    pub fn as_string(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl fmt::Display for SemanticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i32> for SemanticValue {
    fn from(source: i32) -> Self {
        Self::Int(source)
    }
}

impl From<&str> for SemanticValue {
    fn from(source: &str) -> Self {
        Self::String(source.to_string())
    }
}

impl From<String> for SemanticValue {
    fn from(source: String) -> Self {
        Self::String(source)
    }
}

impl PartialEq<i32> for SemanticValue {
    fn eq(&self, other: &i32) -> bool {
        self.as_int().map(|value| value == other).unwrap_or(false)
    }
}

impl PartialEq<SemanticValue> for i32 {
    fn eq(&self, other: &SemanticValue) -> bool {
        other.as_int().map(|value| value == self).unwrap_or(false)
    }
}

impl PartialEq<&str> for SemanticValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_string().map(|value| value == *other).unwrap_or(false)
    }
}

impl PartialEq<SemanticValue> for &str {
    fn eq(&self, other: &SemanticValue) -> bool {
        other.as_string().map(|value| value == *self).unwrap_or(false)
    }
}
