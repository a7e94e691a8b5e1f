//! Authoritative projectile state, flight, and collision resolution.

use std::collections::BTreeMap;
use std::time::Duration;

use wave_defence_core::{
    EnemyId, Event, GridPoint, ProjectileId, SpecialEffect, PROJECTILE_HIT_RADIUS,
};

use crate::enemies::{EnemyRegistry, HitOutcome};

/// State of a projectile stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    /// Identifier allocated by the world for the projectile.
    pub(crate) id: ProjectileId,
    /// Enemy the projectile was aimed at when launched.
    pub(crate) target: EnemyId,
    /// Continuous position of the projectile.
    pub(crate) position: GridPoint,
    /// Unit heading frozen at launch.
    pub(crate) heading: (f32, f32),
    /// Travel speed in grid units per second.
    pub(crate) speed: f32,
    /// Damage applied on impact.
    pub(crate) damage: u32,
    /// Simulated flight time remaining before the projectile expires.
    pub(crate) remaining: Duration,
    /// Optional effect applied to the target on impact.
    pub(crate) effect: Option<SpecialEffect>,
}

/// Gold and score credited by a single combat resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CombatOutcome {
    /// Gold credited for kills resolved during the pass.
    pub(crate) gold: u32,
    /// Score credited for kills resolved during the pass.
    pub(crate) score: u64,
}

/// Registry that stores projectiles and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, ProjectileState>,
    next_id: u32,
}

impl ProjectileRegistry {
    /// Inserts a new projectile and returns its identifier.
    pub(crate) fn insert(
        &mut self,
        target: EnemyId,
        position: GridPoint,
        heading: (f32, f32),
        speed: f32,
        damage: u32,
        lifetime: Duration,
        effect: Option<SpecialEffect>,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.entries.insert(
            id,
            ProjectileState {
                id,
                target,
                position,
                heading,
                speed,
                damage,
                remaining: lifetime,
                effect,
            },
        );
        id
    }

    /// Iterator over all projectiles in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.entries.values()
    }

    /// Removes every projectile and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }

    /// Advances every projectile, resolves collisions against designated
    /// targets, and removes spent or expired projectiles. Kills credit gold
    /// and score through the returned outcome; a projectile whose target no
    /// longer exists is discarded as a benign miss.
    pub(crate) fn advance(
        &mut self,
        enemies: &mut EnemyRegistry,
        dt: Duration,
        clock: Duration,
        out_events: &mut Vec<Event>,
    ) -> CombatOutcome {
        let mut outcome = CombatOutcome::default();
        let mut removals: Vec<ProjectileId> = Vec::new();
        let step = dt.as_secs_f32();

        let ids: Vec<ProjectileId> = self.entries.keys().copied().collect();
        for id in ids {
            let Some(projectile) = self.entries.get_mut(&id) else {
                continue;
            };

            projectile.remaining = projectile.remaining.saturating_sub(dt);
            projectile.position = GridPoint::new(
                projectile.position.x() + projectile.heading.0 * projectile.speed * step,
                projectile.position.y() + projectile.heading.1 * projectile.speed * step,
            );

            let target = projectile.target;
            let Some(enemy) = enemies.get(target) else {
                removals.push(id);
                out_events.push(Event::ProjectileExpired { projectile: id });
                continue;
            };

            if projectile.position.distance_to(enemy.position) <= PROJECTILE_HIT_RADIUS {
                let damage = projectile.damage;
                let effect = projectile.effect;
                removals.push(id);

                match enemies.damage(target, damage) {
                    Some(HitOutcome::Killed { reward }) => {
                        outcome.gold = outcome.gold.saturating_add(reward);
                        outcome.score = outcome.score.saturating_add(u64::from(reward) * 10);
                        out_events.push(Event::EnemyKilled {
                            enemy: target,
                            reward,
                        });
                    }
                    Some(HitOutcome::Survived) => {
                        if let Some(SpecialEffect::Slow { factor, duration }) = effect {
                            enemies.apply_slow(target, factor, clock.saturating_add(duration));
                        }
                    }
                    None => {}
                }
                continue;
            }

            if projectile.remaining.is_zero() {
                removals.push(id);
                out_events.push(Event::ProjectileExpired { projectile: id });
            }
        }

        for id in removals {
            let _ = self.entries.remove(&id);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_defence_core::{CellCoord, EnemyKind, Path};

    fn registry_with_enemy() -> (EnemyRegistry, EnemyId, Path) {
        let path = Path::new(vec![CellCoord::new(0, 0), CellCoord::new(9, 0)]).expect("path");
        let mut enemies = EnemyRegistry::default();
        let id = enemies.spawn(EnemyKind::Runner, &path);
        (enemies, id, path)
    }

    #[test]
    fn projectile_strikes_stationary_target() {
        let (mut enemies, target, _path) = registry_with_enemy();
        let mut projectiles = ProjectileRegistry::default();
        let _ = projectiles.insert(
            target,
            GridPoint::new(3.5, 0.5),
            (-1.0, 0.0),
            10.0,
            60,
            Duration::from_secs(2),
            None,
        );

        let mut events = Vec::new();
        let mut outcome = CombatOutcome::default();
        for _ in 0..10 {
            let credited = projectiles.advance(
                &mut enemies,
                Duration::from_millis(50),
                Duration::ZERO,
                &mut events,
            );
            outcome.gold += credited.gold;
            outcome.score += credited.score;
        }

        assert!(enemies.is_empty(), "lethal hit should remove the enemy");
        assert_eq!(outcome.gold, 15);
        assert_eq!(outcome.score, 150);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. })));
    }

    #[test]
    fn missing_target_discards_projectile_without_credit() {
        let (mut enemies, target, _path) = registry_with_enemy();
        let mut projectiles = ProjectileRegistry::default();
        let _ = projectiles.insert(
            target,
            GridPoint::new(3.5, 0.5),
            (-1.0, 0.0),
            10.0,
            60,
            Duration::from_secs(2),
            None,
        );

        // The enemy dies to something else before the projectile arrives.
        let _ = enemies.damage(target, 1_000);

        let mut events = Vec::new();
        let outcome = projectiles.advance(
            &mut enemies,
            Duration::from_millis(50),
            Duration::ZERO,
            &mut events,
        );

        assert_eq!(outcome, CombatOutcome::default());
        assert_eq!(
            events,
            vec![Event::ProjectileExpired {
                projectile: ProjectileId::new(0),
            }],
        );
        assert!(projectiles.iter().next().is_none());
    }

    #[test]
    fn expired_projectile_is_removed_as_a_miss() {
        let (mut enemies, target, _path) = registry_with_enemy();
        let mut projectiles = ProjectileRegistry::default();
        let _ = projectiles.insert(
            target,
            GridPoint::new(8.5, 8.5),
            (1.0, 0.0),
            1.0,
            60,
            Duration::from_millis(100),
            None,
        );

        let mut events = Vec::new();
        let _ = projectiles.advance(
            &mut enemies,
            Duration::from_millis(50),
            Duration::ZERO,
            &mut events,
        );
        assert!(events.is_empty(), "projectile still in flight");

        let _ = projectiles.advance(
            &mut enemies,
            Duration::from_millis(50),
            Duration::ZERO,
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ProjectileExpired {
                projectile: ProjectileId::new(0),
            }],
        );
        assert_eq!(enemies.iter().count(), 1, "enemy is untouched by a miss");
    }

    #[test]
    fn same_tick_double_hit_credits_reward_once() {
        let (mut enemies, target, _path) = registry_with_enemy();
        let mut projectiles = ProjectileRegistry::default();
        for _ in 0..2 {
            let _ = projectiles.insert(
                target,
                GridPoint::new(0.6, 0.5),
                (-1.0, 0.0),
                1.0,
                60,
                Duration::from_secs(2),
                None,
            );
        }

        let mut events = Vec::new();
        let outcome = projectiles.advance(
            &mut enemies,
            Duration::from_millis(50),
            Duration::ZERO,
            &mut events,
        );

        let kills = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1, "second projectile must find its target gone");
        assert_eq!(outcome.gold, 15);
        assert!(projectiles.iter().next().is_none());
    }

    #[test]
    fn frost_hit_slows_a_surviving_target() {
        let path = Path::new(vec![CellCoord::new(0, 0), CellCoord::new(9, 0)]).expect("path");
        let mut enemies = EnemyRegistry::default();
        let target = enemies.spawn(EnemyKind::Tank, &path);
        let mut projectiles = ProjectileRegistry::default();
        let _ = projectiles.insert(
            target,
            GridPoint::new(0.6, 0.5),
            (-1.0, 0.0),
            1.0,
            25,
            Duration::from_secs(2),
            Some(SpecialEffect::Slow {
                factor: 0.5,
                duration: Duration::from_secs(1),
            }),
        );

        let mut events = Vec::new();
        let _ = projectiles.advance(
            &mut enemies,
            Duration::from_millis(50),
            Duration::ZERO,
            &mut events,
        );

        let enemy = enemies.get(target).expect("enemy survived");
        assert_eq!(enemy.health, 275);
        assert!(enemy.slowed_until.is_some());
    }
}
