use serde::Serialize;

use crate::io::persistence::{CloseDecision, LoadResult, SaveResult};
use crate::model::command_outcome::CommandOutcome;
use crate::model::ids::EntityId;
use crate::model::individual::Bonus;
use crate::model::list_item::EncounterListItem;
use crate::model::settings::{EncounterSettings, SettingsPatch};

/// State edits. Applied synchronously by `apply_command`.
#[derive(Debug, Clone)]
pub enum EncounterCommand {
    UpdateSettings(SettingsPatch),
    ClearEncounter,

    AddPlayerCharacter { name: String },
    RemovePlayerCharacter { id: EntityId },
    RenamePlayerCharacter { id: EntityId, name: String },
    SetPlayerInitiative { id: EntityId, initiative: Option<u32> },
    UpdatePlayerNotes { id: EntityId, notes: String },

    AddIndividuals { threat_id: String, count: usize, bonus: Bonus },
    RemoveIndividual { id: EntityId },
    DuplicateIndividual { id: EntityId },
    UpdateBonus { id: EntityId, bonus: Bonus },
    SetInitiative { id: EntityId, initiative: Option<u32> },
    UpdateIndividualNotes { id: EntityId, notes: String },

    UpdateWounds { id: EntityId, delta: i32 },
    UpdateShock { id: EntityId, delta: i32 },
    MarkAsDead { id: EntityId },
    Revive { id: EntityId },

    CreateMob { threat_id: String, individual_ids: Vec<EntityId> },
    AddToMob { mob_id: EntityId, individual_ids: Vec<EntityId> },
    RemoveFromMob { id: EntityId },
    SplitMob { mob_id: EntityId, count: usize },
    DisbandMob { mob_id: EntityId },
    RemoveMob { mob_id: EntityId },
    SetMobInitiative { mob_id: EntityId, initiative: Option<u32> },
    UpdateMobNotes { mob_id: EntityId, notes: String },
    RenameMob { mob_id: EntityId, name: String },
}

pub enum EngineCommand {
    Edit(EncounterCommand),
    SaveEncounter,
    LoadEncounter,
    SavePlayers,
    LoadPlayers,
    RequestClose,
    Refresh,
}

/// What the presentation layer re-renders after every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterView {
    pub settings: EncounterSettings,
    pub items: Vec<EncounterListItem>,
    pub unsaved_changes: bool,
}

#[derive(Debug, Clone)]
pub enum EngineResponse {
    Updated {
        outcome: CommandOutcome,
        view: EncounterView,
    },

    Saved {
        result: SaveResult,
        view: EncounterView,
    },

    Loaded {
        result: LoadResult,
        view: EncounterView,
    },

    Close(CloseDecision),
}
