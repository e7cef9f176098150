use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Textual identifier of a book, unique across the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Wrap a raw ISBN string
    #[must_use]
    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }

    /// The ISBN text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Isbn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Isbn {
    fn from(isbn: &str) -> Self {
        Self::new(isbn)
    }
}

impl From<String> for Isbn {
    fn from(isbn: String) -> Self {
        Self(isbn)
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Integer identifier of a library member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    /// Wrap a raw member number
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
