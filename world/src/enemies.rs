//! Authoritative enemy state and path-following movement.

use std::collections::BTreeMap;
use std::time::Duration;

use wave_defence_core::{EnemyId, EnemyKind, GridPoint, Path};

/// State of an enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    /// Identifier allocated by the world for the enemy.
    pub(crate) id: EnemyId,
    /// Kind of enemy.
    pub(crate) kind: EnemyKind,
    /// Remaining health.
    pub(crate) health: u32,
    /// Continuous position interpolated along the path.
    pub(crate) position: GridPoint,
    /// Zero-based index of the path leg currently being traversed.
    pub(crate) leg: u32,
    /// Fractional progress along the current leg, in `[0, 1)`.
    pub(crate) progress: f32,
    /// Simulation timestamp until which the enemy moves at reduced speed.
    pub(crate) slowed_until: Option<SlowState>,
}

/// Lingering slow applied by a projectile hit.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SlowState {
    /// Multiplier applied to the enemy's speed while the slow persists.
    pub(crate) factor: f32,
    /// Simulation timestamp at which the slow wears off.
    pub(crate) until: Duration,
}

impl EnemyState {
    fn current_speed(&self, clock: Duration) -> f32 {
        let base = self.kind.spec().speed;
        match self.slowed_until {
            Some(slow) if clock < slow.until => base * slow.factor,
            _ => base,
        }
    }
}

/// Outcome of applying projectile damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HitOutcome {
    /// The enemy survived the hit.
    Survived,
    /// The enemy died; the contained value is the kill reward.
    Killed {
        /// Gold credited for the kill.
        reward: u32,
    },
}

/// Registry that stores enemies and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, EnemyState>,
    next_id: u32,
}

impl EnemyRegistry {
    /// Spawns a new enemy at the path's first waypoint.
    pub(crate) fn spawn(&mut self, kind: EnemyKind, path: &Path) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.entries.insert(
            id,
            EnemyState {
                id,
                kind,
                health: kind.spec().max_health,
                position: path.first().center(),
                leg: 0,
                progress: 0.0,
                slowed_until: None,
            },
        );
        id
    }

    /// Advances every enemy along the path and returns the identifiers of
    /// enemies that reached the final waypoint this tick, in id order.
    pub(crate) fn advance(&mut self, path: &Path, dt: Duration, clock: Duration) -> Vec<EnemyId> {
        let waypoints = path.waypoints();
        let mut leaked = Vec::new();

        for enemy in self.entries.values_mut() {
            let mut budget = enemy.current_speed(clock) * dt.as_secs_f32();

            while budget > 0.0 {
                let leg_index = enemy.leg as usize;
                let Some(next_waypoint) = waypoints.get(leg_index + 1) else {
                    break;
                };
                let leg_start = waypoints[leg_index].center();
                let target = next_waypoint.center();
                let remaining = enemy.position.distance_to(target);

                if budget < remaining {
                    let dx = (target.x() - enemy.position.x()) / remaining;
                    let dy = (target.y() - enemy.position.y()) / remaining;
                    enemy.position = GridPoint::new(
                        enemy.position.x() + dx * budget,
                        enemy.position.y() + dy * budget,
                    );
                    let leg_length = leg_start.distance_to(target);
                    if leg_length > 0.0 {
                        enemy.progress = 1.0 - (remaining - budget) / leg_length;
                    }
                    break;
                }

                budget -= remaining;
                enemy.position = target;
                enemy.leg += 1;
                enemy.progress = 0.0;

                if enemy.leg as usize + 1 >= waypoints.len() {
                    leaked.push(enemy.id);
                    break;
                }
            }
        }

        for id in &leaked {
            let _ = self.entries.remove(id);
        }

        leaked
    }

    /// Applies damage to the enemy, removing it on death.
    pub(crate) fn damage(&mut self, id: EnemyId, amount: u32) -> Option<HitOutcome> {
        let enemy = self.entries.get_mut(&id)?;
        enemy.health = enemy.health.saturating_sub(amount);
        if enemy.health == 0 {
            let reward = enemy.kind.spec().reward;
            let _ = self.entries.remove(&id);
            Some(HitOutcome::Killed { reward })
        } else {
            Some(HitOutcome::Survived)
        }
    }

    /// Applies a slow to the enemy, replacing any existing slow.
    pub(crate) fn apply_slow(&mut self, id: EnemyId, factor: f32, until: Duration) {
        if let Some(enemy) = self.entries.get_mut(&id) {
            enemy.slowed_until = Some(SlowState { factor, until });
        }
    }

    /// Retrieves the enemy with the provided identifier, if present.
    pub(crate) fn get(&self, id: EnemyId) -> Option<&EnemyState> {
        self.entries.get(&id)
    }

    /// Iterator over all enemies in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values()
    }

    /// Reports whether no enemies remain on the path.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every enemy and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_defence_core::CellCoord;

    fn straight_path() -> Path {
        Path::new(vec![CellCoord::new(0, 0), CellCoord::new(4, 0)]).expect("valid path")
    }

    #[test]
    fn spawn_places_enemy_at_first_waypoint_center() {
        let path = straight_path();
        let mut registry = EnemyRegistry::default();
        let id = registry.spawn(EnemyKind::Grunt, &path);
        let enemy = registry.get(id).expect("enemy exists");
        assert!((enemy.position.x() - 0.5).abs() < f32::EPSILON);
        assert!((enemy.position.y() - 0.5).abs() < f32::EPSILON);
        assert_eq!(enemy.health, EnemyKind::Grunt.spec().max_health);
    }

    #[test]
    fn advance_moves_proportionally_to_speed_and_dt() {
        let path = straight_path();
        let mut registry = EnemyRegistry::default();
        let id = registry.spawn(EnemyKind::Runner, &path);

        let leaked = registry.advance(&path, Duration::from_millis(500), Duration::ZERO);
        assert!(leaked.is_empty());

        // Runner speed is 2.0, so half a second covers one grid unit.
        let enemy = registry.get(id).expect("enemy exists");
        assert!((enemy.position.x() - 1.5).abs() < 1e-4);
        assert!((enemy.progress - 0.25).abs() < 1e-4);
    }

    #[test]
    fn reaching_final_waypoint_reports_a_leak() {
        let path = straight_path();
        let mut registry = EnemyRegistry::default();
        let id = registry.spawn(EnemyKind::Runner, &path);

        let leaked = registry.advance(&path, Duration::from_secs(5), Duration::ZERO);
        assert_eq!(leaked, vec![id]);
        assert!(registry.is_empty());
    }

    #[test]
    fn lethal_damage_removes_enemy_and_reports_reward() {
        let path = straight_path();
        let mut registry = EnemyRegistry::default();
        let id = registry.spawn(EnemyKind::Grunt, &path);

        assert_eq!(registry.damage(id, 60), Some(HitOutcome::Survived));
        assert_eq!(
            registry.damage(id, 60),
            Some(HitOutcome::Killed { reward: 10 }),
        );
        assert!(registry.get(id).is_none());
        assert_eq!(registry.damage(id, 60), None);
    }

    #[test]
    fn slow_reduces_speed_until_expiry() {
        let path = straight_path();
        let mut registry = EnemyRegistry::default();
        let id = registry.spawn(EnemyKind::Grunt, &path);
        registry.apply_slow(id, 0.5, Duration::from_secs(1));

        let _ = registry.advance(&path, Duration::from_millis(500), Duration::ZERO);
        let halfway = registry.get(id).expect("enemy exists").position;
        assert!((halfway.x() - 0.75).abs() < 1e-4);

        // Past the expiry timestamp the base speed applies again.
        let _ = registry.advance(&path, Duration::from_millis(500), Duration::from_secs(2));
        let after = registry.get(id).expect("enemy exists").position;
        assert!((after.x() - 1.25).abs() < 1e-4);
    }

    #[test]
    fn corner_is_traversed_within_a_single_tick() {
        let path = Path::new(vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(1, 3),
        ])
        .expect("valid path");
        let mut registry = EnemyRegistry::default();
        let id = registry.spawn(EnemyKind::Runner, &path);

        // One second at speed 2.0 covers the first leg and half of the next.
        let leaked = registry.advance(&path, Duration::from_secs(1), Duration::ZERO);
        assert!(leaked.is_empty());
        let enemy = registry.get(id).expect("enemy exists");
        assert_eq!(enemy.leg, 1);
        assert!((enemy.position.x() - 1.5).abs() < 1e-4);
        assert!((enemy.position.y() - 1.5).abs() < 1e-4);
    }
}
