use crate::engine::protocol::EncounterCommand;
use crate::engine::store::EncounterState;
use crate::model::command_outcome::CommandOutcome;
use crate::model::ids::EntityId;
use crate::model::threat::Catalog;

fn missing(kind: &str, id: &EntityId) -> CommandOutcome {
    CommandOutcome::Ignored {
        reason: format!("{} '{}' not found", kind, id),
    }
}

/// Apply an EncounterCommand to the EncounterState, returning the outcome
pub fn apply_command(
    state: &mut EncounterState,
    catalog: &dyn Catalog,
    command: EncounterCommand,
) -> CommandOutcome {
    match command {
        EncounterCommand::UpdateSettings(patch) => {
            state.update_settings(patch);
            CommandOutcome::Applied
        }

        EncounterCommand::ClearEncounter => {
            state.clear_encounter();
            CommandOutcome::Applied
        }

        /* ---------- players ---------- */

        EncounterCommand::AddPlayerCharacter { name } => match state.add_player_character(&name) {
            Some(id) => CommandOutcome::created(id),
            None => CommandOutcome::Rejected {
                reason: "Player character name is blank".to_string(),
            },
        },

        EncounterCommand::RemovePlayerCharacter { id } => {
            if state.player_character(&id).is_none() {
                return missing("Player character", &id);
            }
            state.remove_player_character(&id);
            CommandOutcome::Applied
        }

        EncounterCommand::RenamePlayerCharacter { id, name } => {
            if state.player_character(&id).is_none() {
                return missing("Player character", &id);
            }
            if name.trim().is_empty() {
                return CommandOutcome::Rejected {
                    reason: "Player character name is blank".to_string(),
                };
            }
            state.update_player_character_name(&id, &name);
            CommandOutcome::Applied
        }

        EncounterCommand::SetPlayerInitiative { id, initiative } => {
            if state.player_character(&id).is_none() {
                return missing("Player character", &id);
            }
            state.set_player_character_initiative(&id, initiative);
            CommandOutcome::Applied
        }

        EncounterCommand::UpdatePlayerNotes { id, notes } => {
            if state.player_character(&id).is_none() {
                return missing("Player character", &id);
            }
            state.update_player_character_notes(&id, &notes);
            CommandOutcome::Applied
        }

        /* ---------- individuals ---------- */

        EncounterCommand::AddIndividuals { threat_id, count, bonus } => {
            let ids = state.add_individuals(catalog, &threat_id, count, bonus);
            if ids.is_empty() {
                return CommandOutcome::Rejected {
                    reason: format!("Threat '{}' is unknown or count is zero", threat_id),
                };
            }
            CommandOutcome::Created { ids }
        }

        EncounterCommand::RemoveIndividual { id } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.remove_individual(&id);
            CommandOutcome::Applied
        }

        EncounterCommand::DuplicateIndividual { id } => match state.duplicate_individual(&id) {
            Some(new_id) => CommandOutcome::created(new_id),
            None => missing("Individual", &id),
        },

        EncounterCommand::UpdateBonus { id, bonus } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.update_bonus(&id, bonus);
            CommandOutcome::Applied
        }

        EncounterCommand::SetInitiative { id, initiative } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.set_initiative(&id, initiative);
            CommandOutcome::Applied
        }

        EncounterCommand::UpdateIndividualNotes { id, notes } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.update_individual_notes(&id, &notes);
            CommandOutcome::Applied
        }

        /* ---------- damage ---------- */

        EncounterCommand::UpdateWounds { id, delta } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.update_wounds(&id, delta);
            CommandOutcome::Applied
        }

        EncounterCommand::UpdateShock { id, delta } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.update_shock(&id, delta);
            CommandOutcome::Applied
        }

        EncounterCommand::MarkAsDead { id } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.mark_as_dead(&id);
            CommandOutcome::Applied
        }

        EncounterCommand::Revive { id } => {
            if state.individual(&id).is_none() {
                return missing("Individual", &id);
            }
            state.revive_individual(&id);
            CommandOutcome::Applied
        }

        /* ---------- mobs ---------- */

        EncounterCommand::CreateMob { threat_id, individual_ids } => {
            match state.create_mob(catalog, &threat_id, &individual_ids) {
                Some(mob_id) => CommandOutcome::created(mob_id),
                None => CommandOutcome::Rejected {
                    reason: format!(
                        "A mob needs two or more standalone '{}' individuals",
                        threat_id
                    ),
                },
            }
        }

        EncounterCommand::AddToMob { mob_id, individual_ids } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            match state.add_to_mob(&mob_id, &individual_ids) {
                0 => CommandOutcome::Rejected {
                    reason: format!("No eligible individuals for mob '{}'", mob_id),
                },
                _ => CommandOutcome::Applied,
            }
        }

        EncounterCommand::RemoveFromMob { id } => {
            match state.individual(&id) {
                None => return missing("Individual", &id),
                Some(i) if i.is_standalone() => {
                    return CommandOutcome::Ignored {
                        reason: format!("Individual '{}' is not in a mob", id),
                    };
                }
                Some(_) => {}
            }
            state.remove_from_mob(&id);
            CommandOutcome::Applied
        }

        EncounterCommand::SplitMob { mob_id, count } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            match state.split_off_from_mob(catalog, &mob_id, count) {
                Some(new_id) => CommandOutcome::created(new_id),
                None => CommandOutcome::Rejected {
                    reason: format!(
                        "Cannot split {} from mob '{}' with {} living members",
                        count,
                        mob_id,
                        state.mob_living_members(&mob_id).len()
                    ),
                },
            }
        }

        EncounterCommand::DisbandMob { mob_id } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            state.disband_mob(&mob_id);
            CommandOutcome::Applied
        }

        EncounterCommand::RemoveMob { mob_id } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            state.remove_mob(&mob_id);
            CommandOutcome::Applied
        }

        EncounterCommand::SetMobInitiative { mob_id, initiative } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            state.set_mob_initiative(&mob_id, initiative);
            CommandOutcome::Applied
        }

        EncounterCommand::UpdateMobNotes { mob_id, notes } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            state.update_mob_notes(&mob_id, &notes);
            CommandOutcome::Applied
        }

        EncounterCommand::RenameMob { mob_id, name } => {
            if state.mob(&mob_id).is_none() {
                return missing("Mob", &mob_id);
            }
            if name.trim().is_empty() {
                return CommandOutcome::Rejected {
                    reason: "Mob name is blank".to_string(),
                };
            }
            state.rename_mob(&mob_id, &name);
            CommandOutcome::Applied
        }
    }
}
