//! Identifier newtypes.
//!
//! Every entity that crosses the request boundary carries an opaque string
//! identifier. Callers keep hold of them to map the planning back onto
//! their own structures.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a new unique identifier (UUID v4).
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id!(
    /// Unique identifier of a resource. Ordering defines the tie-break
    /// between equally early candidates.
    ResourceId
);

string_id!(
    /// Unique identifier of a plan item.
    PlanItemId
);

string_id!(
    /// Identifier of a planning task.
    TaskId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ResourceId::generate();
        let b = ResourceId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_ordering_and_display() {
        let a = ResourceId::from("R1");
        let b = ResourceId::new("R2");
        assert!(a < b);
        assert_eq!(a.to_string(), "R1");
    }

    #[test]
    fn test_transparent_serde() {
        let id = PlanItemId::from("item-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"item-1\"");
    }
}
