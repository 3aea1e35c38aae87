use serde::{Deserialize, Serialize};

use crate::model::ids::EntityId;

/// A user-entered player character. No catalog reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCharacter {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<u32>,
    #[serde(default)]
    pub notes: String,
}
