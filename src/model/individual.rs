use serde::{Deserialize, Serialize};

use crate::model::ids::EntityId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bonus {
    #[default]
    None,
    Elite,
    Adversary,
}

/// A single combatant instantiated from a catalog threat.
///
/// `max_wounds` / `max_shock` are a snapshot taken at creation; later catalog
/// edits never reach an encounter in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: EntityId,
    pub threat_id: String,

    pub current_wounds: u32,
    pub max_wounds: u32,
    pub current_shock: u32,
    pub max_shock: u32,

    #[serde(default)]
    pub bonus: Bonus,

    /// Cached back-reference. `Mob::member_ids` is authoritative and only the
    /// mob engine writes this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) mob_id: Option<EntityId>,

    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub manually_dead: bool,

    /// Only meaningful while standalone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<u32>,
}

impl Individual {
    pub(crate) fn fresh(id: EntityId, threat_id: String, max_wounds: u32, max_shock: u32) -> Self {
        Self {
            id,
            threat_id,
            current_wounds: 0,
            max_wounds,
            current_shock: 0,
            max_shock,
            bonus: Bonus::None,
            mob_id: None,
            notes: String::new(),
            manually_dead: false,
            initiative: None,
        }
    }

    pub fn mob_id(&self) -> Option<&EntityId> {
        self.mob_id.as_ref()
    }

    pub fn is_standalone(&self) -> bool {
        self.mob_id.is_none()
    }

    pub fn is_dead(&self) -> bool {
        self.manually_dead
            || self.current_wounds >= self.max_wounds
            || self.current_shock >= self.max_shock
    }

    pub fn is_dead_from_wounds(&self) -> bool {
        self.current_wounds >= self.max_wounds
    }

    pub fn is_dead_from_shock(&self) -> bool {
        self.current_shock >= self.max_shock
    }

    /// Re-establish `0 <= current <= max` after deserialization.
    pub(crate) fn clamp_counters(&mut self) -> bool {
        let wounds = self.current_wounds.min(self.max_wounds);
        let shock = self.current_shock.min(self.max_shock);
        let changed = wounds != self.current_wounds || shock != self.current_shock;
        self.current_wounds = wounds;
        self.current_shock = shock;
        changed
    }
}
