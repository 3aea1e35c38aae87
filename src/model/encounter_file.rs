use serde::{Deserialize, Serialize};

use crate::model::individual::Individual;
use crate::model::mob::Mob;
use crate::model::player::PlayerCharacter;
use crate::model::settings::EncounterSettings;

pub const ENCOUNTER_FILE_VERSION: u32 = 1;
pub const ENCOUNTER_EXTENSION: &str = "encounter";
pub const PLAYERS_EXTENSION: &str = "players";

/// On-disk `.encounter` document: settings plus a verbatim store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub settings: EncounterSettings,
    #[serde(default)]
    pub player_characters: Vec<PlayerCharacter>,
    #[serde(default)]
    pub individuals: Vec<Individual>,
    #[serde(default)]
    pub mobs: Vec<Mob>,
}

/// On-disk `.players` document: the party roster without encounter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerListFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

fn default_version() -> u32 {
    ENCOUNTER_FILE_VERSION
}
