use serde::{Deserialize, Serialize};

use crate::model::ids::EntityId;

/// Result of applying one encounter command to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Created { ids: Vec<EntityId> },
    /// The target id does not exist; nothing changed.
    Ignored { reason: String },
    /// A precondition failed; nothing changed.
    Rejected { reason: String },
}

impl CommandOutcome {
    pub fn created(id: EntityId) -> Self {
        CommandOutcome::Created { ids: vec![id] }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Applied | CommandOutcome::Created { .. })
    }

    /// First created id, if any.
    pub fn created_id(&self) -> Option<&EntityId> {
        match self {
            CommandOutcome::Created { ids } => ids.first(),
            _ => None,
        }
    }
}
