use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::engine::store::{normalize_initiative, EncounterState};
use crate::model::ids::{EntityId, IdKind};
use crate::model::individual::Individual;
use crate::model::mob::{AttackBonus, Mob};
use crate::model::threat::{BonusTable, Catalog};

/// A broken link between `Mob::member_ids` and `Individual::mob_id`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("mob {mob} has no members")]
    EmptyMob { mob: EntityId },

    #[error("mob {mob} lists missing individual {member}")]
    DanglingMember { mob: EntityId, member: EntityId },

    #[error("individual {member} is listed by mob {mob} but points at {actual:?}")]
    BackReferenceMismatch {
        mob: EntityId,
        member: EntityId,
        actual: Option<EntityId>,
    },

    #[error("individual {member} ({member_threat}) cannot join mob {mob} ({mob_threat})")]
    ThreatMismatch {
        mob: EntityId,
        member: EntityId,
        mob_threat: String,
        member_threat: String,
    },

    #[error("individual {member} points at mob {mob} which does not list it")]
    OrphanedMember { member: EntityId, mob: EntityId },
}

fn default_mob_name(catalog: &dyn Catalog, threat_id: &str) -> String {
    format!("{} Mob", catalog.threat_name(threat_id))
}

impl EncounterState {
    /* =========================
       Formation
       ========================= */

    /// Group at least two standalone individuals of `threat_id` into a new
    /// mob. All-or-nothing: any failing id leaves the state untouched.
    pub fn create_mob(
        &mut self,
        catalog: &dyn Catalog,
        threat_id: &str,
        individual_ids: &[EntityId],
    ) -> Option<EntityId> {
        if individual_ids.len() < 2 {
            tracing::warn!(threat_id, count = individual_ids.len(), "Mob needs at least two members");
            return None;
        }

        let mut seen = HashSet::new();
        for id in individual_ids {
            if !seen.insert(id) {
                tracing::warn!(id = %id, "Duplicate id in mob formation");
                return None;
            }
            let eligible = self
                .individual(id)
                .is_some_and(|i| i.threat_id == threat_id && i.is_standalone());
            if !eligible {
                tracing::warn!(id = %id, threat_id, "Individual cannot join new mob");
                return None;
            }
        }

        let mob_id = self.allocate_id(IdKind::Mob);
        for id in individual_ids {
            if let Some(individual) = self.individual_mut(id) {
                individual.mob_id = Some(mob_id.clone());
            }
        }
        self.mobs.push(Mob {
            id: mob_id.clone(),
            threat_id: threat_id.to_string(),
            name: default_mob_name(catalog, threat_id),
            member_ids: individual_ids.to_vec(),
            initiative: None,
            notes: String::new(),
        });
        self.mark_dirty();

        tracing::debug!(mob = %mob_id, threat_id, members = individual_ids.len(), "Formed mob");
        Some(mob_id)
    }

    /// Append standalone individuals of the mob's threat. Ineligible ids are
    /// skipped one by one. Returns how many joined.
    pub fn add_to_mob(&mut self, mob_id: &EntityId, individual_ids: &[EntityId]) -> usize {
        let Some(threat_id) = self.mob(mob_id).map(|m| m.threat_id.clone()) else {
            return 0;
        };

        let mut joined = Vec::new();
        for id in individual_ids {
            let Some(individual) = self.individual_mut(id) else {
                continue;
            };
            if individual.threat_id != threat_id || !individual.is_standalone() {
                tracing::debug!(id = %id, mob = %mob_id, "Skipped ineligible individual");
                continue;
            }
            individual.mob_id = Some(mob_id.clone());
            joined.push(id.clone());
        }

        if joined.is_empty() {
            return 0;
        }
        let count = joined.len();
        if let Some(mob) = self.mob_mut(mob_id) {
            mob.member_ids.extend(joined);
        }
        self.mark_dirty();
        tracing::debug!(mob = %mob_id, count, "Added members to mob");
        count
    }

    /// Make one member standalone again. An emptied mob is deleted.
    pub fn remove_from_mob(&mut self, individual_id: &EntityId) {
        let Some(mob_id) = self
            .individual_mut(individual_id)
            .and_then(|i| i.mob_id.take())
        else {
            return;
        };

        let mut emptied = false;
        if let Some(mob) = self.mob_mut(&mob_id) {
            mob.member_ids.retain(|m| m != individual_id);
            emptied = mob.member_ids.is_empty();
        }
        if emptied {
            self.mobs.retain(|m| m.id != mob_id);
            tracing::debug!(mob = %mob_id, "Removed empty mob");
        }
        self.mark_dirty();
        tracing::debug!(id = %individual_id, mob = %mob_id, "Left mob");
    }

    /// Move the first `n` living members into a new mob of the same threat.
    /// Requires `1 <= n < living`. Dead members stay behind.
    pub fn split_off_from_mob(
        &mut self,
        catalog: &dyn Catalog,
        mob_id: &EntityId,
        n: usize,
    ) -> Option<EntityId> {
        let (threat_id, initiative) = {
            let mob = self.mob(mob_id)?;
            (mob.threat_id.clone(), mob.initiative)
        };
        let moving: Vec<EntityId> = self
            .mob_living_members(mob_id)
            .iter()
            .map(|i| i.id.clone())
            .collect();

        if n == 0 || n >= moving.len() {
            tracing::warn!(mob = %mob_id, n, living = moving.len(), "Invalid split size");
            return None;
        }
        let moving = &moving[..n];

        let new_id = self.allocate_id(IdKind::Mob);
        if let Some(mob) = self.mob_mut(mob_id) {
            mob.member_ids.retain(|m| !moving.contains(m));
        }
        for id in moving {
            if let Some(individual) = self.individual_mut(id) {
                individual.mob_id = Some(new_id.clone());
            }
        }
        self.mobs.push(Mob {
            id: new_id.clone(),
            name: default_mob_name(catalog, &threat_id),
            threat_id,
            member_ids: moving.to_vec(),
            initiative,
            notes: String::new(),
        });
        self.mark_dirty();

        tracing::debug!(mob = %mob_id, new_mob = %new_id, n, "Split mob");
        Some(new_id)
    }

    /// Ungroup: every member becomes standalone, the mob record goes away.
    pub fn disband_mob(&mut self, mob_id: &EntityId) {
        let Some(index) = self.mobs.iter().position(|m| &m.id == mob_id) else {
            return;
        };
        let mob = self.mobs.remove(index);
        for member in &mob.member_ids {
            if let Some(individual) = self.individual_mut(member) {
                individual.mob_id = None;
            }
        }
        self.mark_dirty();
        tracing::debug!(mob = %mob_id, members = mob.member_ids.len(), "Disbanded mob");
    }

    /// Delete the mob together with every member individual.
    pub fn remove_mob(&mut self, mob_id: &EntityId) {
        let Some(index) = self.mobs.iter().position(|m| &m.id == mob_id) else {
            return;
        };
        let mob = self.mobs.remove(index);
        self.individuals.retain(|i| !mob.member_ids.contains(&i.id));
        self.mark_dirty();
        tracing::debug!(mob = %mob_id, members = mob.member_ids.len(), "Removed mob and members");
    }

    /* =========================
       Mob fields
       ========================= */

    pub fn set_mob_initiative(&mut self, mob_id: &EntityId, initiative: Option<u32>) {
        if let Some(mob) = self.mob_mut(mob_id) {
            mob.initiative = normalize_initiative(initiative);
            self.mark_dirty();
        }
    }

    pub fn update_mob_notes(&mut self, mob_id: &EntityId, notes: &str) {
        if let Some(mob) = self.mob_mut(mob_id) {
            mob.notes = notes.to_string();
            self.mark_dirty();
        }
    }

    pub fn rename_mob(&mut self, mob_id: &EntityId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(mob) = self.mob_mut(mob_id) {
            mob.name = name.to_string();
            self.mark_dirty();
        }
    }

    /* =========================
       Queries
       ========================= */

    /// Members in `member_ids` order.
    pub fn mob_members(&self, mob_id: &EntityId) -> Vec<&Individual> {
        let Some(mob) = self.mob(mob_id) else {
            return Vec::new();
        };
        mob.member_ids
            .iter()
            .filter_map(|id| self.individual(id))
            .collect()
    }

    pub fn mob_living_members(&self, mob_id: &EntityId) -> Vec<&Individual> {
        self.mob_members(mob_id)
            .into_iter()
            .filter(|i| !i.is_dead())
            .collect()
    }

    /// Standalone individuals of `threat_id`, for "add to mob" pickers.
    pub fn compatible_individuals_for_mob(&self, threat_id: &str) -> Vec<&Individual> {
        self.individuals
            .iter()
            .filter(|i| i.threat_id == threat_id && i.is_standalone())
            .collect()
    }

    /// Count living members, then apply the threat's bonus table, or
    /// `fallback` when the catalog defines none.
    pub fn mob_attack_bonus(
        &self,
        catalog: &dyn Catalog,
        fallback: &BonusTable,
        mob_id: &EntityId,
    ) -> Option<AttackBonus> {
        let mob = self.mob(mob_id)?;
        let count = self.mob_living_members(mob_id).len();
        let table = catalog
            .get_threat(&mob.threat_id)
            .and_then(|t| t.mob_bonus.as_ref())
            .unwrap_or(fallback);
        let (bonus, max) = table.lookup(count);
        Some(AttackBonus { count, bonus, max })
    }

    /* =========================
       Membership integrity
       ========================= */

    pub fn verify_membership(&self) -> Result<(), IntegrityError> {
        for mob in &self.mobs {
            if mob.member_ids.is_empty() {
                return Err(IntegrityError::EmptyMob { mob: mob.id.clone() });
            }
            for member in &mob.member_ids {
                let Some(individual) = self.individual(member) else {
                    return Err(IntegrityError::DanglingMember {
                        mob: mob.id.clone(),
                        member: member.clone(),
                    });
                };
                if individual.mob_id.as_ref() != Some(&mob.id) {
                    return Err(IntegrityError::BackReferenceMismatch {
                        mob: mob.id.clone(),
                        member: member.clone(),
                        actual: individual.mob_id.clone(),
                    });
                }
                if individual.threat_id != mob.threat_id {
                    return Err(IntegrityError::ThreatMismatch {
                        mob: mob.id.clone(),
                        member: member.clone(),
                        mob_threat: mob.threat_id.clone(),
                        member_threat: individual.threat_id.clone(),
                    });
                }
            }
        }

        for individual in &self.individuals {
            if let Some(mob_id) = &individual.mob_id {
                if !self.mob(mob_id).is_some_and(|m| m.contains(&individual.id)) {
                    return Err(IntegrityError::OrphanedMember {
                        member: individual.id.clone(),
                        mob: mob_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Re-derive every `mob_id` from the mobs' member lists. Members that are
    /// missing, of another threat or already claimed are dropped, then empty
    /// mobs are deleted. Returns the number of repairs made.
    pub(crate) fn rebuild_membership(&mut self) -> usize {
        let previous: HashMap<EntityId, Option<EntityId>> = self
            .individuals
            .iter_mut()
            .map(|i| (i.id.clone(), i.mob_id.take()))
            .collect();
        let mut repairs = 0;

        for index in 0..self.mobs.len() {
            let mob_id = self.mobs[index].id.clone();
            let threat_id = self.mobs[index].threat_id.clone();
            let listed = std::mem::take(&mut self.mobs[index].member_ids);

            let mut kept = Vec::with_capacity(listed.len());
            for member in listed {
                match self.individual_mut(&member) {
                    Some(individual)
                        if individual.threat_id == threat_id && individual.mob_id.is_none() =>
                    {
                        individual.mob_id = Some(mob_id.clone());
                        kept.push(member);
                    }
                    _ => {
                        tracing::warn!(mob = %mob_id, member = %member, "Dropped invalid mob member");
                        repairs += 1;
                    }
                }
            }
            self.mobs[index].member_ids = kept;
        }

        self.mobs.retain(|m| {
            let keep = !m.member_ids.is_empty();
            if !keep {
                tracing::warn!(mob = %m.id, "Dropped empty mob");
            }
            keep
        });

        repairs += self
            .individuals
            .iter()
            .filter(|i| previous.get(&i.id).is_some_and(|p| p != &i.mob_id))
            .count();
        repairs
    }
}
