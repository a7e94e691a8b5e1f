#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Wave Defence.
//!
//! The world owns every entity collection, the economy, and the session
//! state machine. Mutations happen exclusively through [`apply`]; reads
//! happen exclusively through the [`query`] module. Systems never touch the
//! world directly: they observe broadcast [`Event`] values plus immutable
//! snapshots and respond with new command batches.

mod enemies;
mod projectiles;
mod towers;

use std::time::Duration;

use wave_defence_core::{
    CellCoord, Command, EnemyId, Event, PlacementError, SaleError, Scenario, ScenarioError,
    SessionStatus, TowerId, TowerKind, UpgradeError,
};

use enemies::EnemyRegistry;
use projectiles::ProjectileRegistry;
use towers::TowerRegistry;

/// Represents the authoritative Wave Defence session state.
#[derive(Debug)]
pub struct World {
    scenario: Scenario,
    blocked_cells: Vec<CellCoord>,
    status: SessionStatus,
    gold: u32,
    health: u32,
    score: u64,
    wave: u32,
    clock: Duration,
    towers: TowerRegistry,
    enemies: EnemyRegistry,
    projectiles: ProjectileRegistry,
}

impl World {
    /// Creates a new world for the provided scenario, validating it first.
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let blocked_cells = scenario.path.covered_cells();
        let mut world = Self {
            status: SessionStatus::Menu,
            gold: 0,
            health: 0,
            score: 0,
            wave: 0,
            clock: Duration::ZERO,
            towers: TowerRegistry::default(),
            enemies: EnemyRegistry::default(),
            projectiles: ProjectileRegistry::default(),
            blocked_cells,
            scenario,
        };
        world.reinitialise();
        Ok(world)
    }

    fn reinitialise(&mut self) {
        self.gold = self.scenario.starting_gold;
        self.health = self.scenario.starting_health;
        self.score = 0;
        self.wave = 0;
        self.clock = Duration::ZERO;
        self.towers.clear();
        self.enemies.clear();
        self.projectiles.clear();
    }

    fn placement_error(&self, cell: CellCoord, kind: TowerKind) -> Option<PlacementError> {
        if self.status != SessionStatus::Playing {
            return Some(PlacementError::InvalidStatus);
        }
        if cell.column() >= self.scenario.columns || cell.row() >= self.scenario.rows {
            return Some(PlacementError::OutOfBounds);
        }
        if self.blocked_cells.contains(&cell) {
            return Some(PlacementError::OnPath);
        }
        if self.towers.occupies(cell) {
            return Some(PlacementError::Occupied);
        }
        if self.gold < kind.spec().cost {
            return Some(PlacementError::InsufficientGold);
        }
        None
    }

    fn run_tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        // Movement resolves leaks before combat so a defeated session does
        // not continue accruing gold or damage.
        let leaked = self.enemies.advance(&self.scenario.path, dt, self.clock);
        for enemy in leaked {
            self.health = self.health.saturating_sub(self.scenario.leak_damage);
            out_events.push(Event::EnemyLeaked {
                enemy,
                damage: self.scenario.leak_damage,
            });
        }

        if self.health == 0 {
            self.status = SessionStatus::Failed;
            out_events.push(Event::SessionFailed {
                score: self.score,
                wave_reached: self.wave,
            });
            return;
        }

        let outcome = self
            .projectiles
            .advance(&mut self.enemies, dt, self.clock, out_events);
        self.gold = self.gold.saturating_add(outcome.gold);
        self.score = self.score.saturating_add(outcome.score);
    }

    fn fire(&mut self, tower_id: TowerId, target: EnemyId) -> Option<Event> {
        let clock = self.clock;
        let tower = self.towers.get(tower_id)?;
        if !tower.ready_in(clock).is_zero() {
            return None;
        }

        let enemy = self.enemies.get(target)?;
        let origin = tower.cell.center();
        let distance = origin.distance_to(enemy.position);
        if distance > tower.effective_range() || distance <= f32::EPSILON {
            return None;
        }

        let heading = (
            (enemy.position.x() - origin.x()) / distance,
            (enemy.position.y() - origin.y()) / distance,
        );
        let spec = tower.kind.spec();
        let damage = tower.effective_damage();
        let projectile = self.projectiles.insert(
            target,
            origin,
            heading,
            spec.projectile_speed,
            damage,
            spec.projectile_lifetime,
            spec.effect,
        );

        if let Some(tower) = self.towers.get_mut(tower_id) {
            tower.last_shot = Some(clock);
        }

        Some(Event::ProjectileFired {
            projectile,
            tower: tower_id,
            target,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid commands never mutate state: they are rejected silently, at most
/// broadcasting a rejection event so adapters can surface feedback.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession => {
            if world.status != SessionStatus::Menu {
                return;
            }
            world.reinitialise();
            world.status = SessionStatus::Playing;
            world.wave = 1;
            out_events.push(Event::SessionStarted { wave: 1 });
            out_events.push(Event::WaveStarted { wave: 1 });
        }
        Command::Tick { dt } => {
            if world.status != SessionStatus::Playing {
                return;
            }
            world.run_tick(dt, out_events);
        }
        Command::PlaceTower { kind, cell } => {
            if let Some(reason) = world.placement_error(cell, kind) {
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
                return;
            }
            world.gold -= kind.spec().cost;
            let tower = world.towers.insert(kind, cell);
            out_events.push(Event::TowerPlaced { tower, kind, cell });
        }
        Command::UpgradeTower { tower } => {
            if world.status != SessionStatus::Playing {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::InvalidStatus,
                });
                return;
            }
            let Some(state) = world.towers.get_mut(tower) else {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::MissingTower,
                });
                return;
            };
            let cost = state.kind.spec().upgrade_cost();
            if world.gold < cost {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::InsufficientGold,
                });
                return;
            }
            state.level += 1;
            let level = state.level;
            world.gold -= cost;
            out_events.push(Event::TowerUpgraded { tower, level });
        }
        Command::SellTower { tower } => {
            if world.status != SessionStatus::Playing {
                out_events.push(Event::TowerSaleRejected {
                    tower,
                    reason: SaleError::InvalidStatus,
                });
                return;
            }
            let Some(state) = world.towers.remove(tower) else {
                out_events.push(Event::TowerSaleRejected {
                    tower,
                    reason: SaleError::MissingTower,
                });
                return;
            };
            let refund = state.kind.spec().sell_refund();
            world.gold = world.gold.saturating_add(refund);
            out_events.push(Event::TowerSold { tower, refund });
        }
        Command::Pause => {
            if world.status != SessionStatus::Playing {
                return;
            }
            world.status = SessionStatus::Paused;
            out_events.push(Event::SessionPaused);
        }
        Command::Resume => {
            if world.status != SessionStatus::Paused {
                return;
            }
            world.status = SessionStatus::Playing;
            out_events.push(Event::SessionResumed);
        }
        Command::Reset => {
            if world.status == SessionStatus::Menu {
                return;
            }
            world.reinitialise();
            world.status = SessionStatus::Menu;
            out_events.push(Event::SessionReset);
        }
        Command::SpawnEnemy { kind } => {
            if world.status != SessionStatus::Playing {
                return;
            }
            let enemy = world.enemies.spawn(kind, &world.scenario.path);
            out_events.push(Event::EnemySpawned { enemy, kind });
        }
        Command::AdvanceWave => {
            if world.status != SessionStatus::Playing || !world.enemies.is_empty() {
                return;
            }
            let bonus = world.scenario.wave_bonus;
            world.gold = world.gold.saturating_add(bonus);
            out_events.push(Event::WaveCleared {
                wave: world.wave,
                bonus,
            });

            if world.wave as usize >= world.scenario.waves.len() {
                world.status = SessionStatus::Completed;
                out_events.push(Event::SessionCompleted { score: world.score });
            } else {
                world.wave += 1;
                out_events.push(Event::WaveStarted { wave: world.wave });
            }
        }
        Command::FireProjectile { tower, target } => {
            if world.status != SessionStatus::Playing {
                return;
            }
            if let Some(event) = world.fire(tower, target) {
                out_events.push(event);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use wave_defence_core::{
        EnemySnapshot, EnemyView, ProjectileSnapshot, ProjectileView, Scenario, SessionSnapshot,
        TowerSnapshot, TowerView,
    };

    /// Captures a compact copy of the session-level state.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            status: world.status,
            gold: world.gold,
            health: world.health,
            wave: world.wave,
            score: world.score,
            elapsed: world.clock,
        }
    }

    /// Provides read-only access to the static scenario configuration.
    #[must_use]
    pub fn scenario(world: &World) -> &Scenario {
        &world.scenario
    }

    /// Captures a read-only view of all towers in deterministic order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                cell: tower.cell,
                level: tower.level,
                center: tower.cell.center(),
                range: tower.effective_range(),
                ready_in: tower.ready_in(world.clock),
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of all enemies in deterministic order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                health: enemy.health,
                position: enemy.position,
                leg: enemy.leg,
                progress: enemy.progress,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of all projectiles in deterministic order.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                target: projectile.target,
                position: projectile.position,
                remaining: projectile.remaining,
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }
}
