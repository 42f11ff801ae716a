use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an activity (or, inside biosphere exchanges, of an elementary flow).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityKey(String);

impl ActivityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActivityKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActivityKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A resolved activity handle as returned by an `ActivityStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub key: ActivityKey,
    pub name: String,
    pub location: String,
}

impl Activity {
    /// The label used for diagram nodes: `"{name}, {location}"`.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.location)
    }
}

/// A directed input/output relation between two activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub input: ActivityKey,
    pub output: ActivityKey,
    pub amount: f64,
}

impl Exchange {
    /// True when the exchange feeds an activity with its own product.
    pub fn is_self_loop(&self) -> bool {
        self.input == self.output
    }
}
