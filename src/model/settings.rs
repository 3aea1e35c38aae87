use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSettings {
    pub tier: u32,
    pub player_count: u32,
    pub name: String,
}

impl Default for EncounterSettings {
    fn default() -> Self {
        Self {
            tier: 1,
            player_count: 0,
            name: String::new(),
        }
    }
}

/// Partial settings update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub tier: Option<u32>,
    pub player_count: Option<u32>,
    pub name: Option<String>,
}

impl EncounterSettings {
    /// Merge a patch, returning whether anything changed.
    pub fn apply(&mut self, patch: SettingsPatch) -> bool {
        let before = self.clone();

        if let Some(tier) = patch.tier {
            self.tier = tier;
        }
        if let Some(count) = patch.player_count {
            self.player_count = count;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }

        *self != before
    }
}
