#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wave Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Wave Defence.";

/// Distance below which a projectile is considered to have struck its target.
pub const PROJECTILE_HIT_RADIUS: f32 = 0.5;

/// Multiplier applied to a tower's damage for each upgrade level above one.
pub const DAMAGE_UPGRADE_FACTOR: f32 = 1.5;

/// Multiplier applied to a tower's range for each upgrade level above one.
pub const RANGE_UPGRADE_FACTOR: f32 = 1.1;

/// Lifecycle phases a defence session moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Initial phase before a session starts and after a reset.
    Menu,
    /// Simulation is live; the clock advances on every tick.
    Playing,
    /// Simulation is frozen; the clock and all timers stand still.
    Paused,
    /// Terminal phase reached once every configured wave is resolved.
    Completed,
    /// Terminal phase reached once defender health hits zero.
    Failed,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts the session, moving from the menu into the first wave.
    StartSession,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests construction of a tower on the provided cell.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Requests an upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests removal of a tower in exchange for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Freezes the simulation clock without discarding session state.
    Pause,
    /// Unfreezes a paused session.
    Resume,
    /// Returns the session to the menu, clearing all entities and timers.
    Reset,
    /// Requests that an enemy enter the path at its first waypoint.
    SpawnEnemy {
        /// Kind of enemy to spawn.
        kind: EnemyKind,
    },
    /// Closes the current wave, crediting the clear bonus and either starting
    /// the next wave or completing the session.
    AdvanceWave,
    /// Requests that a tower launch a projectile at the designated enemy.
    FireProjectile {
        /// Identifier of the tower attempting to fire.
        tower: TowerId,
        /// Identifier of the enemy being aimed at.
        target: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a session left the menu and began playing.
    SessionStarted {
        /// Wave number the session opens with.
        wave: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that spawning for the provided wave may begin.
    WaveStarted {
        /// One-based number of the wave that started.
        wave: u32,
    },
    /// Confirms that a wave was fully resolved and its bonus credited.
    WaveCleared {
        /// One-based number of the wave that was cleared.
        wave: u32,
        /// Gold credited for clearing the wave.
        bonus: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
        /// Damage applied to the defender's health pool.
        damage: u32,
    },
    /// Confirms that an enemy was destroyed by a projectile.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Gold credited for the kill.
        reward: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile by the world.
        projectile: ProjectileId,
        /// Tower that fired the projectile.
        tower: TowerId,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
    },
    /// Reports that a projectile was discarded without striking its target.
    ProjectileExpired {
        /// Identifier of the discarded projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower now holds.
        level: u32,
    },
    /// Confirms that a tower was sold and removed from the world.
    TowerSold {
        /// Identifier of the tower that was sold.
        tower: TowerId,
        /// Gold refunded for the sale.
        refund: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports that a tower sale request was rejected.
    TowerSaleRejected {
        /// Identifier of the tower targeted for sale.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that the session froze in response to a pause request.
    SessionPaused,
    /// Confirms that the session resumed from a pause.
    SessionResumed,
    /// Confirms that the session returned to the menu. Systems holding
    /// scheduled work must discard it when they observe this event.
    SessionReset,
    /// Announces that the final wave resolved and the session is won.
    SessionCompleted {
        /// Final score accumulated over the session.
        score: u64,
    },
    /// Announces that defender health reached zero and the session is lost.
    SessionFailed {
        /// Final score accumulated over the session.
        score: u64,
        /// Wave number that was in progress when the session failed.
        wave_reached: u32,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Continuous coordinates of the cell's center.
    #[must_use]
    pub fn center(&self) -> GridPoint {
        GridPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position measured in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    x: f32,
    y: f32,
}

impl GridPoint {
    /// Creates a new continuous grid position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component measured in grid units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component measured in grid units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to the other position in grid units.
    #[must_use]
    pub fn distance_to(&self, other: GridPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Types of towers available in the static catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced tower with moderate cost, damage, and cadence.
    Cannon,
    /// Support tower whose hits slow the struck enemy.
    Frost,
    /// Long-range tower with heavy damage and a slow cadence.
    Sniper,
}

impl TowerKind {
    /// Resolves the static combat parameters for the tower kind.
    #[must_use]
    pub const fn spec(self) -> TowerSpec {
        match self {
            Self::Cannon => TowerSpec {
                cost: 50,
                damage: 60,
                range: 2.5,
                fire_interval: Duration::from_millis(800),
                projectile_speed: 8.0,
                projectile_lifetime: Duration::from_millis(1500),
                effect: None,
            },
            Self::Frost => TowerSpec {
                cost: 70,
                damage: 25,
                range: 3.0,
                fire_interval: Duration::from_millis(1000),
                projectile_speed: 9.0,
                projectile_lifetime: Duration::from_millis(1500),
                effect: Some(SpecialEffect::Slow {
                    factor: 0.5,
                    duration: Duration::from_millis(1500),
                }),
            },
            Self::Sniper => TowerSpec {
                cost: 120,
                damage: 150,
                range: 5.0,
                fire_interval: Duration::from_millis(2000),
                projectile_speed: 12.0,
                projectile_lifetime: Duration::from_millis(2000),
                effect: None,
            },
        }
    }
}

/// Static combat parameters resolved from a [`TowerKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSpec {
    /// Gold deducted when the tower is placed.
    pub cost: u32,
    /// Base damage applied per projectile hit.
    pub damage: u32,
    /// Base targeting radius measured in grid units.
    pub range: f32,
    /// Minimum simulated time between successive shots.
    pub fire_interval: Duration,
    /// Projectile travel speed in grid units per second.
    pub projectile_speed: f32,
    /// Simulated time a projectile may fly before expiring as a miss.
    pub projectile_lifetime: Duration,
    /// Optional effect applied to enemies struck by this tower's projectiles.
    pub effect: Option<SpecialEffect>,
}

impl TowerSpec {
    /// Damage per hit after applying the upgrade multiplier for the level.
    #[must_use]
    pub fn effective_damage(&self, level: u32) -> u32 {
        let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.damage as f32 * DAMAGE_UPGRADE_FACTOR.powi(exponent);
        scaled.round() as u32
    }

    /// Targeting radius after applying the upgrade multiplier for the level.
    #[must_use]
    pub fn effective_range(&self, level: u32) -> f32 {
        let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
        self.range * RANGE_UPGRADE_FACTOR.powi(exponent)
    }

    /// Gold required to raise the tower's level by one.
    #[must_use]
    pub const fn upgrade_cost(&self) -> u32 {
        self.cost / 2
    }

    /// Gold refunded when the tower is sold. The refund ignores upgrade
    /// spend and is always 70% of the base cost, rounded down.
    #[must_use]
    pub const fn sell_refund(&self) -> u32 {
        self.cost * 7 / 10
    }
}

/// Lingering effect a projectile may apply on impact.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Multiplies the struck enemy's speed for a fixed duration.
    Slow {
        /// Multiplier applied to the enemy's speed while slowed.
        factor: f32,
        /// Simulated time the slow persists after the hit.
        duration: Duration,
    },
}

/// Types of enemies available in the static catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy with average health and speed.
    Grunt,
    /// Fragile enemy that moves twice as fast as a grunt.
    Runner,
    /// Slow enemy with a deep health pool and a large bounty.
    Tank,
}

impl EnemyKind {
    /// Resolves the static stats for the enemy kind.
    #[must_use]
    pub const fn spec(self) -> EnemySpec {
        match self {
            Self::Grunt => EnemySpec {
                max_health: 100,
                speed: 1.0,
                reward: 10,
            },
            Self::Runner => EnemySpec {
                max_health: 60,
                speed: 2.0,
                reward: 15,
            },
            Self::Tank => EnemySpec {
                max_health: 300,
                speed: 0.6,
                reward: 40,
            },
        }
    }
}

/// Static stats resolved from an [`EnemyKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpec {
    /// Health the enemy spawns with.
    pub max_health: u32,
    /// Movement speed in grid units per second.
    pub speed: f32,
    /// Gold credited when the enemy is destroyed.
    pub reward: u32,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The session is not in the playing phase, so placement is disabled.
    InvalidStatus,
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested cell is covered by the enemy path.
    OnPath,
    /// The requested cell already hosts a tower.
    Occupied,
    /// The treasury holds less gold than the tower costs.
    InsufficientGold,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The session is not in the playing phase, so upgrades are disabled.
    InvalidStatus,
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The treasury holds less gold than the upgrade costs.
    InsufficientGold,
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleError {
    /// The session is not in the playing phase, so sales are disabled.
    InvalidStatus,
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Validation failures detected while loading a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// The path holds fewer than the two waypoints required for a route.
    #[error("path requires at least two waypoints, found {found}")]
    TooFewWaypoints {
        /// Number of waypoints the path actually holds.
        found: usize,
    },
    /// Two consecutive waypoints differ in both column and row.
    #[error("path leg {index} is not axis-aligned")]
    DiagonalLeg {
        /// Zero-based index of the offending leg.
        index: usize,
    },
    /// Two consecutive waypoints coincide.
    #[error("path leg {index} has zero length")]
    ZeroLengthLeg {
        /// Zero-based index of the offending leg.
        index: usize,
    },
    /// A waypoint lies beyond the configured grid bounds.
    #[error("path waypoint ({column}, {row}) lies outside the grid")]
    WaypointOutOfBounds {
        /// Column of the offending waypoint.
        column: u32,
        /// Row of the offending waypoint.
        row: u32,
    },
    /// The grid has a zero dimension.
    #[error("grid dimensions must be non-zero")]
    ZeroGrid,
    /// The scenario configures no waves.
    #[error("scenario requires at least one wave")]
    MissingWaves,
}

/// Ordered, immutable route enemies travel from spawn to the defender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    waypoints: Vec<CellCoord>,
}

impl Path {
    /// Creates a path from the provided waypoints, validating that it forms
    /// a contiguous axis-aligned route of at least two points.
    pub fn new(waypoints: Vec<CellCoord>) -> Result<Self, ScenarioError> {
        let path = Self { waypoints };
        path.validate()?;
        Ok(path)
    }

    /// Re-checks the path invariants. Used by scenario validation so that
    /// deserialized paths cannot bypass the constructor checks.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.waypoints.len() < 2 {
            return Err(ScenarioError::TooFewWaypoints {
                found: self.waypoints.len(),
            });
        }

        for (index, pair) in self.waypoints.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            if from == to {
                return Err(ScenarioError::ZeroLengthLeg { index });
            }
            if from.column() != to.column() && from.row() != to.row() {
                return Err(ScenarioError::DiagonalLeg { index });
            }
        }

        Ok(())
    }

    /// Waypoints that define the route, in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Cell enemies occupy at the instant they spawn.
    #[must_use]
    pub fn first(&self) -> CellCoord {
        self.waypoints[0]
    }

    /// Enumerates every cell covered by the route, expanding straight legs
    /// into the intermediate cells they cross. Towers may not occupy any of
    /// these cells.
    #[must_use]
    pub fn covered_cells(&self) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        if let Some(first) = self.waypoints.first() {
            cells.push(*first);
        }

        for pair in self.waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from.column() == to.column() {
                let column = from.column();
                let (lo, hi) = ordered(from.row(), to.row());
                for row in lo..=hi {
                    push_unique(&mut cells, CellCoord::new(column, row));
                }
            } else {
                let row = from.row();
                let (lo, hi) = ordered(from.column(), to.column());
                for column in lo..=hi {
                    push_unique(&mut cells, CellCoord::new(column, row));
                }
            }
        }

        cells
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn push_unique(cells: &mut Vec<CellCoord>, cell: CellCoord) {
    if !cells.contains(&cell) {
        cells.push(cell);
    }
}

/// Batch of identical enemies spawned on a shared cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnGroup {
    /// Kind of enemy the group spawns.
    pub kind: EnemyKind,
    /// Number of enemies the group contributes.
    pub count: u32,
    /// Simulated time between successive spawns within the group.
    pub interval: Duration,
}

/// Ordered spawn groups that make up a single wave. Groups expand
/// sequentially: every spawn of one group is scheduled before the next
/// group begins.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Spawn groups in scheduling order.
    pub groups: Vec<SpawnGroup>,
}

/// Complete static configuration supplied at session start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Number of placeable columns in the grid.
    pub columns: u32,
    /// Number of placeable rows in the grid.
    pub rows: u32,
    /// Route enemies travel from spawn to the defender.
    pub path: Path,
    /// Waves the session progresses through, in order.
    pub waves: Vec<WaveConfig>,
    /// Gold the treasury opens with.
    pub starting_gold: u32,
    /// Health the defender opens with.
    pub starting_health: u32,
    /// Health lost each time an enemy leaks past the final waypoint.
    pub leak_damage: u32,
    /// Flat gold bonus credited when a wave is cleared.
    pub wave_bonus: u32,
    /// Delay between a wave's resolution and the next scheduling decision.
    pub grace_period: Duration,
}

impl Scenario {
    /// Checks the scenario invariants: a valid in-bounds path, non-zero grid
    /// dimensions, and at least one configured wave.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ScenarioError::ZeroGrid);
        }

        self.path.validate()?;

        for waypoint in self.path.waypoints() {
            if waypoint.column() >= self.columns || waypoint.row() >= self.rows {
                return Err(ScenarioError::WaypointOutOfBounds {
                    column: waypoint.column(),
                    row: waypoint.row(),
                });
            }
        }

        if self.waves.is_empty() {
            return Err(ScenarioError::MissingWaves);
        }

        Ok(())
    }

    /// Reference scenario used by the bundled adapter and by tests: a
    /// horizontal route across a ten-by-ten grid with two waves.
    #[must_use]
    pub fn reference() -> Self {
        let waypoints = vec![CellCoord::new(0, 5), CellCoord::new(9, 5)];
        Self {
            columns: 10,
            rows: 10,
            path: Path { waypoints },
            waves: vec![
                WaveConfig {
                    groups: vec![SpawnGroup {
                        kind: EnemyKind::Grunt,
                        count: 5,
                        interval: Duration::from_millis(1000),
                    }],
                },
                WaveConfig {
                    groups: vec![
                        SpawnGroup {
                            kind: EnemyKind::Runner,
                            count: 3,
                            interval: Duration::from_millis(800),
                        },
                        SpawnGroup {
                            kind: EnemyKind::Tank,
                            count: 1,
                            interval: Duration::from_millis(1000),
                        },
                    ],
                },
            ],
            starting_gold: 200,
            starting_health: 100,
            leak_damage: 10,
            wave_bonus: 25,
            grace_period: Duration::from_millis(2000),
        }
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Upgrade level, starting at one.
    pub level: u32,
    /// Continuous center of the tower's cell.
    pub center: GridPoint,
    /// Targeting radius after upgrade multipliers, in grid units.
    pub range: f32,
    /// Simulated time until the tower may fire again. Zero means ready.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all towers in the session.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Remaining health, at most the kind's maximum.
    pub health: u32,
    /// Continuous position interpolated along the path.
    pub position: GridPoint,
    /// Zero-based index of the path leg the enemy is traversing.
    pub leg: u32,
    /// Fractional progress along the current leg, in `[0, 1)`.
    pub progress: f32,
}

/// Read-only snapshot describing all enemies in the session.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Enemy the projectile was aimed at when launched.
    pub target: EnemyId,
    /// Continuous position of the projectile.
    pub position: GridPoint,
    /// Simulated flight time remaining before the projectile expires.
    pub remaining: Duration,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Compact copy of the session-level state observed each render frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub status: SessionStatus,
    /// Gold held by the treasury.
    pub gold: u32,
    /// Remaining defender health.
    pub health: u32,
    /// One-based number of the wave in progress.
    pub wave: u32,
    /// Score accumulated from kills.
    pub score: u64,
    /// Total simulated time accumulated while playing.
    pub elapsed: Duration,
}
