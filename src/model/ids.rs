use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by every entity kind in an encounter.
///
/// Ids are formatted `<prefix>-<n>` by the store. Loaded files may carry any
/// string; only the numeric suffix is inspected when resuming allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix after the last `-`, if any.
    pub fn sequence(&self) -> Option<u64> {
        self.0
            .rsplit_once('-')
            .and_then(|(_, n)| n.parse().ok())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum IdKind {
    Player,
    Individual,
    Mob,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Player => "pc",
            IdKind::Individual => "ind",
            IdKind::Mob => "mob",
        }
    }
}
