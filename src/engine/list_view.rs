use crate::engine::store::EncounterState;
use crate::model::list_item::EncounterListItem;
use crate::model::threat::{BonusTable, Catalog};

impl EncounterState {
    /// Project the store into display rows: players, then standalone
    /// individuals, then mobs, each in insertion order. Mob members appear
    /// only through their mob.
    pub fn encounter_list_items(
        &self,
        catalog: &dyn Catalog,
        fallback: &BonusTable,
    ) -> Vec<EncounterListItem> {
        let players = self.player_characters.iter().map(|pc| EncounterListItem::Player {
            id: pc.id.clone(),
            name: pc.name.clone(),
            initiative: pc.initiative,
        });

        let individuals = self
            .individuals
            .iter()
            .filter(|i| i.is_standalone())
            .map(|i| EncounterListItem::Individual {
                id: i.id.clone(),
                threat_id: i.threat_id.clone(),
                name: catalog.threat_name(&i.threat_id).to_string(),
                initiative: i.initiative,
                bonus: i.bonus,
                current_wounds: i.current_wounds,
                max_wounds: i.max_wounds,
                current_shock: i.current_shock,
                max_shock: i.max_shock,
                is_dead: i.is_dead(),
            });

        let mobs = self.mobs.iter().map(|m| {
            let attack_bonus = self
                .mob_attack_bonus(catalog, fallback, &m.id)
                .unwrap_or_default();
            EncounterListItem::Mob {
                id: m.id.clone(),
                threat_id: m.threat_id.clone(),
                name: m.name.clone(),
                initiative: m.initiative,
                member_count: m.member_ids.len(),
                living_count: attack_bonus.count,
                attack_bonus,
                is_dead: attack_bonus.count == 0,
            }
        });

        players.chain(individuals).chain(mobs).collect()
    }
}

/// Stable display ordering: highest initiative first, unset last.
pub fn sort_by_initiative(items: &mut [EncounterListItem]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.initiative()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::EntityId;
    use crate::model::individual::Bonus;
    use crate::model::threat::{ThreatCatalog, ThreatDefinition};

    fn catalog() -> ThreatCatalog {
        ThreatCatalog::new([ThreatDefinition {
            id: "gaunt".into(),
            name: "Termagant".into(),
            max_wounds: 1,
            max_shock: 1,
            resilience: Some(6),
            mob_bonus: None,
        }])
    }

    #[test]
    fn rows_are_grouped_by_kind_in_insertion_order() {
        let catalog = catalog();
        let mut state = EncounterState::new();
        let gaunts = state.add_individuals(&catalog, "gaunt", 4, Bonus::None);
        let pc = state.add_player_character("Aria").unwrap();
        let mob_id = state.create_mob(&catalog, "gaunt", &gaunts[1..3]).unwrap();

        let items = state.encounter_list_items(&catalog, &BonusTable::default());
        let ids: Vec<&EntityId> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![&pc, &gaunts[0], &gaunts[3], &mob_id]);
        assert_eq!(items[1].name(), "Termagant");
        assert_eq!(items[3].kind(), "mob");
    }

    #[test]
    fn projection_reflects_live_death_state() {
        let catalog = catalog();
        let mut state = EncounterState::new();
        let gaunts = state.add_individuals(&catalog, "gaunt", 3, Bonus::Elite);
        let mob_id = state.create_mob(&catalog, "gaunt", &gaunts[..2]).unwrap();
        state.update_wounds(&gaunts[2], 1);
        state.mark_as_dead(&gaunts[0]);

        let items = state.encounter_list_items(&catalog, &BonusTable::default());
        assert!(items[0].is_dead());
        match &items[1] {
            EncounterListItem::Mob { id, member_count, living_count, is_dead, .. } => {
                assert_eq!(id, &mob_id);
                assert_eq!(*member_count, 2);
                assert_eq!(*living_count, 1);
                assert!(!is_dead);
            }
            other => panic!("expected mob row, got {other:?}"),
        }

        state.mark_as_dead(&gaunts[1]);
        let items = state.encounter_list_items(&catalog, &BonusTable::default());
        assert!(items[1].is_dead());
    }

    #[test]
    fn sort_by_initiative_is_stable_with_unset_last() {
        let catalog = catalog();
        let mut state = EncounterState::new();
        let a = state.add_player_character("A").unwrap();
        let b = state.add_player_character("B").unwrap();
        let c = state.add_player_character("C").unwrap();
        let g = state.add_individual(&catalog, "gaunt", Bonus::None).unwrap();
        state.set_player_character_initiative(&b, Some(9));
        state.set_player_character_initiative(&c, Some(3));
        state.set_initiative(&g, Some(9));

        let mut items = state.encounter_list_items(&catalog, &BonusTable::default());
        sort_by_initiative(&mut items);
        let ids: Vec<&EntityId> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![&b, &g, &c, &a]);
    }
}
