use std::collections::HashSet;

use crate::model::encounter_file::{EncounterFile, PlayerEntry, ENCOUNTER_FILE_VERSION};
use crate::model::ids::{EntityId, IdKind};
use crate::model::individual::{Bonus, Individual};
use crate::model::mob::Mob;
use crate::model::player::PlayerCharacter;
use crate::model::settings::{EncounterSettings, SettingsPatch};
use crate::model::threat::Catalog;

/// Authoritative encounter state. Owns every entity; the mob and damage
/// engines are `impl` blocks on this type working through ids.
///
/// Collections are kept in insertion order, which is also the order the list
/// view projects them in.
#[derive(Debug, Clone, Default)]
pub struct EncounterState {
    pub(crate) settings: EncounterSettings,
    pub(crate) player_characters: Vec<PlayerCharacter>,
    pub(crate) individuals: Vec<Individual>,
    pub(crate) mobs: Vec<Mob>,
    next_id: u64,
    dirty: bool,
}

/// Zero means "unset" for every initiative input.
pub(crate) fn normalize_initiative(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

impl EncounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /* =========================
       Lookup
       ========================= */

    pub fn settings(&self) -> &EncounterSettings {
        &self.settings
    }

    pub fn player_characters(&self) -> &[PlayerCharacter] {
        &self.player_characters
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn mobs(&self) -> &[Mob] {
        &self.mobs
    }

    pub fn player_character(&self, id: &EntityId) -> Option<&PlayerCharacter> {
        self.player_characters.iter().find(|p| &p.id == id)
    }

    pub fn individual(&self, id: &EntityId) -> Option<&Individual> {
        self.individuals.iter().find(|i| &i.id == id)
    }

    pub fn mob(&self, id: &EntityId) -> Option<&Mob> {
        self.mobs.iter().find(|m| &m.id == id)
    }

    pub(crate) fn player_character_mut(&mut self, id: &EntityId) -> Option<&mut PlayerCharacter> {
        self.player_characters.iter_mut().find(|p| &p.id == id)
    }

    pub(crate) fn individual_mut(&mut self, id: &EntityId) -> Option<&mut Individual> {
        self.individuals.iter_mut().find(|i| &i.id == id)
    }

    pub(crate) fn mob_mut(&mut self, id: &EntityId) -> Option<&mut Mob> {
        self.mobs.iter_mut().find(|m| &m.id == id)
    }

    /// Next free id. The counter wraps instead of overflowing when a loaded
    /// file carries a huge suffix, and ids already in use are skipped.
    pub(crate) fn allocate_id(&mut self, kind: IdKind) -> EntityId {
        loop {
            self.next_id = match self.next_id.checked_add(1) {
                Some(next) => next,
                None => {
                    tracing::warn!("Id counter exhausted, scanning for a free id");
                    1
                }
            };
            let id = EntityId::new(format!("{}-{}", kind.prefix(), self.next_id));
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    fn contains_id(&self, id: &EntityId) -> bool {
        self.player_character(id).is_some() || self.individual(id).is_some() || self.mob(id).is_some()
    }

    /* =========================
       Dirty tracking
       ========================= */

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /* =========================
       Settings
       ========================= */

    /// Merge `patch` into the settings. Lowering the player count drops the
    /// trailing player characters past the new count; other edits never
    /// touch the roster.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> bool {
        let lowered_to = patch
            .player_count
            .filter(|count| *count < self.settings.player_count);
        if !self.settings.apply(patch) {
            return false;
        }
        self.mark_dirty();

        let Some(keep) = lowered_to else {
            return true;
        };
        let keep = keep as usize;
        while self.player_characters.len() > keep {
            let Some(last) = self.player_characters.last().map(|p| p.id.clone()) else {
                break;
            };
            self.remove_player_character(&last);
        }
        true
    }

    /// Drop every entity and reset settings. Irreversible.
    pub fn clear_encounter(&mut self) {
        let had_content = !self.player_characters.is_empty()
            || !self.individuals.is_empty()
            || !self.mobs.is_empty()
            || self.settings != EncounterSettings::default();

        self.settings = EncounterSettings::default();
        self.player_characters.clear();
        self.individuals.clear();
        self.mobs.clear();
        self.next_id = 0;

        if had_content {
            self.mark_dirty();
        }
        tracing::debug!("Encounter cleared");
    }

    /* =========================
       Player characters
       ========================= */

    pub fn add_player_character(&mut self, name: &str) -> Option<EntityId> {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("Rejected player character with blank name");
            return None;
        }

        let id = self.allocate_id(IdKind::Player);
        self.player_characters.push(PlayerCharacter {
            id: id.clone(),
            name: name.to_string(),
            initiative: None,
            notes: String::new(),
        });
        let stored = self.player_characters.len() as u32;
        if stored > self.settings.player_count {
            self.settings.player_count = stored;
        }
        self.mark_dirty();
        tracing::debug!(id = %id, name, "Added player character");
        Some(id)
    }

    pub fn remove_player_character(&mut self, id: &EntityId) {
        let before = self.player_characters.len();
        self.player_characters.retain(|p| &p.id != id);
        if self.player_characters.len() != before {
            self.mark_dirty();
            tracing::debug!(id = %id, "Removed player character");
        }
    }

    pub fn update_player_character_name(&mut self, id: &EntityId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(pc) = self.player_character_mut(id) {
            pc.name = name.to_string();
            self.mark_dirty();
        }
    }

    pub fn set_player_character_initiative(&mut self, id: &EntityId, initiative: Option<u32>) {
        if let Some(pc) = self.player_character_mut(id) {
            pc.initiative = normalize_initiative(initiative);
            self.mark_dirty();
        }
    }

    pub fn update_player_character_notes(&mut self, id: &EntityId, notes: &str) {
        if let Some(pc) = self.player_character_mut(id) {
            pc.notes = notes.to_string();
            self.mark_dirty();
        }
    }

    /// Swap in a saved party roster with fresh ids. The player count follows
    /// the roster size.
    pub fn replace_player_characters(&mut self, roster: Vec<PlayerEntry>) -> Vec<EntityId> {
        self.player_characters.clear();
        let ids: Vec<EntityId> = roster
            .into_iter()
            .filter_map(|entry| {
                let id = self.add_player_character(&entry.name)?;
                self.update_player_character_notes(&id, &entry.notes);
                Some(id)
            })
            .collect();

        self.settings.player_count = ids.len() as u32;
        self.mark_dirty();
        ids
    }

    /* =========================
       Individuals
       ========================= */

    /// Instantiate a standalone individual from the catalog. Returns `None`
    /// when the threat is unknown.
    pub fn add_individual(
        &mut self,
        catalog: &dyn Catalog,
        threat_id: &str,
        bonus: Bonus,
    ) -> Option<EntityId> {
        let Some(threat) = catalog.get_threat(threat_id) else {
            tracing::warn!(threat_id, "Unknown threat, individual not added");
            return None;
        };
        // A zero maximum would make the individual dead on arrival.
        let (max_wounds, max_shock) = (threat.max_wounds.max(1), threat.max_shock.max(1));

        let id = self.allocate_id(IdKind::Individual);
        let mut individual = Individual::fresh(id.clone(), threat_id.to_string(), max_wounds, max_shock);
        individual.bonus = bonus;
        self.individuals.push(individual);
        self.mark_dirty();
        tracing::debug!(id = %id, threat_id, "Added individual");
        Some(id)
    }

    pub fn add_individuals(
        &mut self,
        catalog: &dyn Catalog,
        threat_id: &str,
        count: usize,
        bonus: Bonus,
    ) -> Vec<EntityId> {
        (0..count)
            .map_while(|_| self.add_individual(catalog, threat_id, bonus))
            .collect()
    }

    /// Delete an individual, leaving its mob first.
    pub fn remove_individual(&mut self, id: &EntityId) {
        if self.individual(id).is_none() {
            return;
        }
        self.remove_from_mob(id);
        self.individuals.retain(|i| &i.id != id);
        self.mark_dirty();
        tracing::debug!(id = %id, "Removed individual");
    }

    pub fn update_bonus(&mut self, id: &EntityId, bonus: Bonus) {
        if let Some(individual) = self.individual_mut(id) {
            individual.bonus = bonus;
            self.mark_dirty();
        }
    }

    pub fn set_initiative(&mut self, id: &EntityId, initiative: Option<u32>) {
        if let Some(individual) = self.individual_mut(id) {
            individual.initiative = normalize_initiative(initiative);
            self.mark_dirty();
        }
    }

    pub fn update_individual_notes(&mut self, id: &EntityId, notes: &str) {
        if let Some(individual) = self.individual_mut(id) {
            individual.notes = notes.to_string();
            self.mark_dirty();
        }
    }

    /// Fresh standalone copy: same threat, maxima and bonus; no damage, notes,
    /// initiative or mob membership.
    pub fn duplicate_individual(&mut self, id: &EntityId) -> Option<EntityId> {
        let source = self.individual(id)?;
        let (threat_id, max_wounds, max_shock, bonus) = (
            source.threat_id.clone(),
            source.max_wounds,
            source.max_shock,
            source.bonus,
        );

        let new_id = self.allocate_id(IdKind::Individual);
        let mut copy = Individual::fresh(new_id.clone(), threat_id, max_wounds, max_shock);
        copy.bonus = bonus;
        self.individuals.push(copy);
        self.mark_dirty();
        tracing::debug!(source = %id, id = %new_id, "Duplicated individual");
        Some(new_id)
    }

    /* =========================
       Snapshot / replace
       ========================= */

    pub fn to_file(&self) -> EncounterFile {
        EncounterFile {
            version: ENCOUNTER_FILE_VERSION,
            settings: self.settings.clone(),
            player_characters: self.player_characters.clone(),
            individuals: self.individuals.clone(),
            mobs: self.mobs.clone(),
        }
    }

    /// Build a clean state from a loaded file. Counters are clamped and mob
    /// membership re-derived from the mobs' member lists.
    pub fn from_file(file: EncounterFile) -> Self {
        let mut state = Self {
            settings: file.settings,
            player_characters: file.player_characters,
            individuals: file.individuals,
            mobs: file.mobs,
            next_id: 0,
            dirty: false,
        };

        state.drop_duplicate_ids();
        for individual in &mut state.individuals {
            if individual.clamp_counters() {
                tracing::warn!(id = %individual.id, "Clamped out-of-range counters from file");
            }
        }
        state.rebuild_membership();

        state.next_id = state
            .player_characters
            .iter()
            .map(|p| &p.id)
            .chain(state.individuals.iter().map(|i| &i.id))
            .chain(state.mobs.iter().map(|m| &m.id))
            .filter_map(EntityId::sequence)
            .max()
            .unwrap_or(0);

        state
    }

    /// Keep the first entity seen for every id, across all kinds.
    fn drop_duplicate_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let before = self.player_characters.len() + self.individuals.len() + self.mobs.len();

        self.player_characters.retain(|p| first_sighting(&mut seen, &p.id));
        self.individuals.retain(|i| first_sighting(&mut seen, &i.id));
        self.mobs.retain(|m| first_sighting(&mut seen, &m.id));

        before - (self.player_characters.len() + self.individuals.len() + self.mobs.len())
    }
}

fn first_sighting(seen: &mut HashSet<EntityId>, id: &EntityId) -> bool {
    let fresh = seen.insert(id.clone());
    if !fresh {
        tracing::warn!(id = %id, "Dropped entity with duplicate id from file");
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::threat::{ThreatCatalog, ThreatDefinition};

    fn catalog() -> ThreatCatalog {
        ThreatCatalog::new([
            ThreatDefinition {
                id: "cultist".into(),
                name: "Cultist".into(),
                max_wounds: 4,
                max_shock: 3,
                resilience: Some(7),
                mob_bonus: None,
            },
            ThreatDefinition {
                id: "servitor".into(),
                name: "Servitor".into(),
                max_wounds: 0,
                max_shock: 0,
                resilience: None,
                mob_bonus: None,
            },
        ])
    }

    #[test]
    fn lookup_of_missing_ids_is_none() {
        let state = EncounterState::new();
        let id = EntityId::from("ind-99");
        assert!(state.individual(&id).is_none());
        assert!(state.mob(&id).is_none());
        assert!(state.player_character(&id).is_none());
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let catalog = catalog();
        let mut state = EncounterState::new();
        let pc = state.add_player_character("Aria").unwrap();
        let a = state.add_individual(&catalog, "cultist", Bonus::None).unwrap();
        let b = state.add_individual(&catalog, "cultist", Bonus::None).unwrap();
        assert_ne!(pc, a);
        assert_ne!(a, b);
        assert_eq!(pc.as_str(), "pc-1");
        assert_eq!(b.as_str(), "ind-3");
    }

    #[test]
    fn blank_player_names_are_rejected() {
        let mut state = EncounterState::new();
        assert!(state.add_player_character("   ").is_none());
        assert!(!state.has_unsaved_changes());

        let id = state.add_player_character(" Brother Tomas ").unwrap();
        state.update_player_character_name(&id, "");
        assert_eq!(state.player_character(&id).unwrap().name, "Brother Tomas");
    }

    #[test]
    fn zero_initiative_means_unset() {
        let mut state = EncounterState::new();
        let id = state.add_player_character("Aria").unwrap();
        state.set_player_character_initiative(&id, Some(12));
        assert_eq!(state.player_character(&id).unwrap().initiative, Some(12));
        state.set_player_character_initiative(&id, Some(0));
        assert_eq!(state.player_character(&id).unwrap().initiative, None);
    }

    #[test]
    fn lowering_player_count_trims_from_the_end() {
        let mut state = EncounterState::new();
        state.update_settings(SettingsPatch { player_count: Some(3), ..Default::default() });
        let a = state.add_player_character("A").unwrap();
        let b = state.add_player_character("B").unwrap();
        let c = state.add_player_character("C").unwrap();

        state.update_settings(SettingsPatch { player_count: Some(1), ..Default::default() });

        assert!(state.player_character(&a).is_some());
        assert!(state.player_character(&b).is_none());
        assert!(state.player_character(&c).is_none());
    }

    #[test]
    fn update_settings_merges_fields() {
        let mut state = EncounterState::new();
        state.update_settings(SettingsPatch { tier: Some(3), ..Default::default() });
        state.update_settings(SettingsPatch { name: Some("Ambush".into()), ..Default::default() });
        assert_eq!(state.settings().tier, 3);
        assert_eq!(state.settings().name, "Ambush");
        assert_eq!(state.settings().player_count, 0);
    }

    #[test]
    fn unknown_threat_adds_nothing() {
        let mut state = EncounterState::new();
        assert!(state.add_individual(&catalog(), "daemon", Bonus::Elite).is_none());
        assert!(state.individuals().is_empty());
    }

    #[test]
    fn zero_maxima_are_raised_to_one() {
        let mut state = EncounterState::new();
        let id = state.add_individual(&catalog(), "servitor", Bonus::None).unwrap();
        let servitor = state.individual(&id).unwrap();
        assert_eq!((servitor.max_wounds, servitor.max_shock), (1, 1));
        assert!(!servitor.is_dead());
    }

    #[test]
    fn duplicate_resets_damage_and_membership() {
        let catalog = catalog();
        let mut state = EncounterState::new();
        let a = state.add_individual(&catalog, "cultist", Bonus::Elite).unwrap();
        let b = state.add_individual(&catalog, "cultist", Bonus::None).unwrap();
        state.create_mob(&catalog, "cultist", &[a.clone(), b]).unwrap();
        state.update_wounds(&a, 2);
        state.update_individual_notes(&a, "limping");

        let copy_id = state.duplicate_individual(&a).unwrap();
        let copy = state.individual(&copy_id).unwrap();
        assert_eq!(copy.threat_id, "cultist");
        assert_eq!(copy.current_wounds, 0);
        assert_eq!(copy.bonus, Bonus::Elite);
        assert!(copy.notes.is_empty());
        assert!(copy.is_standalone());
    }

    #[test]
    fn duplicate_of_missing_is_none() {
        let mut state = EncounterState::new();
        assert!(state.duplicate_individual(&"ind-1".into()).is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = EncounterState::new();
        state.add_player_character("Aria");
        state.add_individual(&catalog(), "cultist", Bonus::None);
        state.clear_encounter();

        assert!(state.player_characters().is_empty());
        assert!(state.individuals().is_empty());
        assert_eq!(state.settings(), &EncounterSettings::default());
        assert_eq!(state.add_player_character("Aria").unwrap().as_str(), "pc-1");
    }

    #[test]
    fn dirty_flag_tracks_real_mutations_only() {
        let mut state = EncounterState::new();
        state.update_wounds(&"ind-1".into(), 1);
        state.remove_player_character(&"pc-1".into());
        assert!(!state.has_unsaved_changes());

        state.add_player_character("Aria");
        assert!(state.has_unsaved_changes());
        state.mark_saved();
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn from_file_resumes_id_allocation() {
        let catalog = catalog();
        let mut state = EncounterState::new();
        for _ in 0..4 {
            state.add_individual(&catalog, "cultist", Bonus::None);
        }
        let mut loaded = EncounterState::from_file(state.to_file());
        assert!(!loaded.has_unsaved_changes());

        let next = loaded.add_player_character("Late Arrival").unwrap();
        assert_eq!(next.as_str(), "pc-5");
    }

    #[test]
    fn settings_edits_keep_the_roster() {
        let mut state = EncounterState::new();
        state.add_player_character("Aria");
        state.add_player_character("Tomas");
        assert_eq!(state.settings().player_count, 2);

        state.update_settings(SettingsPatch { name: Some("Ambush".into()), ..Default::default() });
        state.update_settings(SettingsPatch { tier: Some(4), ..Default::default() });
        state.update_settings(SettingsPatch { player_count: Some(5), ..Default::default() });
        assert_eq!(state.player_characters().len(), 2);

        state.update_settings(SettingsPatch { player_count: Some(1), ..Default::default() });
        assert_eq!(state.player_characters().len(), 1);
        assert_eq!(state.player_characters()[0].name, "Aria");
    }

    #[test]
    fn huge_id_suffix_does_not_overflow_the_counter() {
        let mut file = EncounterState::new().to_file();
        file.player_characters.push(PlayerCharacter {
            id: EntityId::from(format!("pc-{}", u64::MAX)),
            name: "Ancient".into(),
            initiative: None,
            notes: String::new(),
        });
        file.player_characters.push(PlayerCharacter {
            id: EntityId::from("pc-1"),
            name: "Elder".into(),
            initiative: None,
            notes: String::new(),
        });

        let mut state = EncounterState::from_file(file);
        let a = state.add_player_character("Newcomer").unwrap();
        let b = state.add_individual(&catalog(), "cultist", Bonus::None).unwrap();

        assert_eq!(a.as_str(), "pc-2");
        assert_eq!(b.as_str(), "ind-3");
        assert_eq!(state.player_characters().len(), 3);
    }

    #[test]
    fn duplicate_ids_in_a_file_keep_the_first_entity() {
        let catalog = catalog();
        let mut source = EncounterState::new();
        source.add_player_character("Aria");
        let ids = source.add_individuals(&catalog, "cultist", 2, Bonus::None);
        source.create_mob(&catalog, "cultist", &ids).unwrap();

        let mut file = source.to_file();
        let mut clone = file.individuals[0].clone();
        clone.notes = "impostor".into();
        file.individuals.push(clone);
        let mut shadow = file.player_characters[0].clone();
        shadow.name = "Shadow".into();
        file.player_characters.push(shadow);

        let state = EncounterState::from_file(file);
        assert_eq!(state.individuals().len(), 2);
        assert_eq!(state.player_characters().len(), 1);
        assert_eq!(state.player_characters()[0].name, "Aria");
        assert!(state.individuals().iter().all(|i| i.notes.is_empty()));
        state.verify_membership().unwrap();
    }
}
