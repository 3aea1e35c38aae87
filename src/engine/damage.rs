use crate::engine::store::EncounterState;
use crate::model::ids::EntityId;

/// Add a signed delta to a counter, saturating into `[0, max]`.
fn apply_delta(current: u32, delta: i32, max: u32) -> u32 {
    current.saturating_add_signed(delta).min(max)
}

impl EncounterState {
    pub fn update_wounds(&mut self, id: &EntityId, delta: i32) {
        let Some(individual) = self.individual_mut(id) else {
            return;
        };
        let next = apply_delta(individual.current_wounds, delta, individual.max_wounds);
        if next != individual.current_wounds {
            individual.current_wounds = next;
            tracing::debug!(id = %id, wounds = next, "Wounds updated");
            self.mark_dirty();
        }
    }

    pub fn update_shock(&mut self, id: &EntityId, delta: i32) {
        let Some(individual) = self.individual_mut(id) else {
            return;
        };
        let next = apply_delta(individual.current_shock, delta, individual.max_shock);
        if next != individual.current_shock {
            individual.current_shock = next;
            tracing::debug!(id = %id, shock = next, "Shock updated");
            self.mark_dirty();
        }
    }

    pub fn mark_as_dead(&mut self, id: &EntityId) {
        self.set_manually_dead(id, true);
    }

    /// GM override: clears the manual flag only. Counters at their maximum
    /// still keep the individual dead.
    pub fn revive_individual(&mut self, id: &EntityId) {
        self.set_manually_dead(id, false);
    }

    fn set_manually_dead(&mut self, id: &EntityId, dead: bool) {
        let Some(individual) = self.individual_mut(id) else {
            return;
        };
        if individual.manually_dead != dead {
            individual.manually_dead = dead;
            tracing::debug!(id = %id, dead, "Manual death flag changed");
            self.mark_dirty();
        }
    }

    /// False for unknown ids.
    pub fn is_individual_dead(&self, id: &EntityId) -> bool {
        self.individual(id).is_some_and(|i| i.is_dead())
    }
}
