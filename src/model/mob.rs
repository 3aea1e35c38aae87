use serde::{Deserialize, Serialize};

use crate::model::ids::EntityId;

/// A named group of same-threat individuals acting on one initiative.
/// Health stays on the members; the mob only does bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mob {
    pub id: EntityId,
    pub threat_id: String,
    pub name: String,
    pub(crate) member_ids: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

impl Mob {
    pub fn member_ids(&self) -> &[EntityId] {
        &self.member_ids
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.member_ids.contains(id)
    }
}

/// Derived attack bonus for a mob: living count, bonus dice and the cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackBonus {
    pub count: usize,
    pub bonus: u32,
    pub max: u32,
}
