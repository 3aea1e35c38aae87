use serde::{Deserialize, Serialize};

use crate::model::ids::EntityId;
use crate::model::individual::Bonus;
use crate::model::mob::AttackBonus;

/// Read-only row of the encounter list, projected from the store on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncounterListItem {
    Player {
        id: EntityId,
        name: String,
        initiative: Option<u32>,
    },

    Individual {
        id: EntityId,
        threat_id: String,
        name: String,
        initiative: Option<u32>,
        bonus: Bonus,
        current_wounds: u32,
        max_wounds: u32,
        current_shock: u32,
        max_shock: u32,
        is_dead: bool,
    },

    Mob {
        id: EntityId,
        threat_id: String,
        name: String,
        initiative: Option<u32>,
        member_count: usize,
        living_count: usize,
        attack_bonus: AttackBonus,
        is_dead: bool,
    },
}

impl EncounterListItem {
    pub fn id(&self) -> &EntityId {
        match self {
            EncounterListItem::Player { id, .. }
            | EncounterListItem::Individual { id, .. }
            | EncounterListItem::Mob { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EncounterListItem::Player { name, .. }
            | EncounterListItem::Individual { name, .. }
            | EncounterListItem::Mob { name, .. } => name,
        }
    }

    pub fn initiative(&self) -> Option<u32> {
        match self {
            EncounterListItem::Player { initiative, .. }
            | EncounterListItem::Individual { initiative, .. }
            | EncounterListItem::Mob { initiative, .. } => *initiative,
        }
    }

    /// Players never report dead; a mob is dead once no member is alive.
    pub fn is_dead(&self) -> bool {
        match self {
            EncounterListItem::Player { .. } => false,
            EncounterListItem::Individual { is_dead, .. }
            | EncounterListItem::Mob { is_dead, .. } => *is_dead,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EncounterListItem::Player { .. } => "player",
            EncounterListItem::Individual { .. } => "individual",
            EncounterListItem::Mob { .. } => "mob",
        }
    }
}
