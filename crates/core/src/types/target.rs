use serde::{Deserialize, Serialize};

/// A named build target declared in `.yourbase.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub name: String,
}

impl BuildTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
