//! Qualifications.
//!
//! A qualification is an opaque capability tag ("can operate a Flux
//! Capacitor 9000"). Items require a set of them; resources possess a set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque capability identifier. Compared by equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qualification(String);

impl Qualification {
    /// Creates a qualification from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, unique qualification (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Qualification {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Whether `held` contains every qualification in `required`.
///
/// An empty requirement is covered by any resource.
pub fn covers(held: &[Qualification], required: &[Qualification]) -> bool {
    required.iter().all(|q| held.contains(q))
}

/// Required qualifications missing from `held`.
pub fn missing<'a>(held: &[Qualification], required: &'a [Qualification]) -> Vec<&'a Qualification> {
    required.iter().filter(|q| !held.contains(q)).collect()
}
