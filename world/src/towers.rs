//! Authoritative tower state management utilities.

use std::collections::BTreeMap;
use std::time::Duration;

use wave_defence_core::{CellCoord, TowerId, TowerKind};

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Upgrade level, starting at one.
    pub(crate) level: u32,
    /// Simulation timestamp of the last shot, if the tower has fired.
    pub(crate) last_shot: Option<Duration>,
}

impl TowerState {
    /// Simulated time until the tower may fire again. Cooldown only counts
    /// from an actual shot, so an unfired tower is always ready.
    pub(crate) fn ready_in(&self, clock: Duration) -> Duration {
        match self.last_shot {
            None => Duration::ZERO,
            Some(shot_at) => {
                let ready_at = shot_at.saturating_add(self.kind.spec().fire_interval);
                ready_at.saturating_sub(clock)
            }
        }
    }

    /// Targeting radius after upgrade multipliers.
    pub(crate) fn effective_range(&self) -> f32 {
        self.kind.spec().effective_range(self.level)
    }

    /// Damage per hit after upgrade multipliers.
    pub(crate) fn effective_damage(&self) -> u32 {
        self.kind.spec().effective_damage(self.level)
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_id: u32,
}

impl TowerRegistry {
    /// Inserts a new level-one tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = TowerId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                cell,
                level: 1,
                last_shot: None,
            },
        );
        id
    }

    /// Removes the tower with the provided identifier, if present.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Retrieves the tower with the provided identifier, if present.
    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    /// Retrieves a mutable reference to the tower, if present.
    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Reports whether any tower occupies the provided cell.
    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|tower| tower.cell == cell)
    }

    /// Iterator over all towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Removes every tower and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_allocates_ascending_identifiers() {
        let mut registry = TowerRegistry::default();
        let first = registry.insert(TowerKind::Cannon, CellCoord::new(1, 1));
        let second = registry.insert(TowerKind::Sniper, CellCoord::new(2, 1));
        assert!(first < second);
        assert!(registry.occupies(CellCoord::new(1, 1)));
        assert!(!registry.occupies(CellCoord::new(3, 3)));
    }

    #[test]
    fn unfired_tower_is_immediately_ready() {
        let mut registry = TowerRegistry::default();
        let id = registry.insert(TowerKind::Cannon, CellCoord::new(0, 0));
        let tower = registry.get(id).expect("tower exists");
        assert_eq!(tower.ready_in(Duration::from_secs(30)), Duration::ZERO);
    }

    #[test]
    fn cooldown_counts_from_last_shot() {
        let mut registry = TowerRegistry::default();
        let id = registry.insert(TowerKind::Cannon, CellCoord::new(0, 0));
        registry.get_mut(id).expect("tower exists").last_shot = Some(Duration::from_secs(1));

        let tower = registry.get(id).expect("tower exists");
        assert_eq!(
            tower.ready_in(Duration::from_millis(1200)),
            Duration::from_millis(600),
        );
        assert_eq!(tower.ready_in(Duration::from_millis(1800)), Duration::ZERO);
        assert_eq!(tower.ready_in(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn clear_resets_identifier_allocation() {
        let mut registry = TowerRegistry::default();
        let _ = registry.insert(TowerKind::Cannon, CellCoord::new(0, 0));
        registry.clear();
        let id = registry.insert(TowerKind::Cannon, CellCoord::new(0, 0));
        assert_eq!(id, TowerId::new(0));
    }
}
