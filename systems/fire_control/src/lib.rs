#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects targets for ready towers from world snapshots.
//!
//! Each tower whose cooldown has elapsed picks the in-range enemy furthest
//! along the path: the greatest leg index wins, then the greatest fractional
//! progress within the leg, then the lowest enemy identifier. Ties resolve
//! identically on every run, so replays stay deterministic.

use wave_defence_core::{
    Command, EnemyId, EnemyView, GridPoint, SessionSnapshot, SessionStatus, TowerView,
};

/// Fire control system that reuses a scratch buffer to avoid repeated
/// allocations.
#[derive(Debug, Default)]
pub struct FireControl {
    candidates: Vec<Candidate>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: EnemyId,
    position: GridPoint,
    leg: u32,
    progress: f32,
}

impl Candidate {
    fn precedes(&self, other: &Candidate) -> bool {
        if self.leg != other.leg {
            return self.leg > other.leg;
        }
        if self.progress != other.progress {
            return self.progress > other.progress;
        }
        self.id < other.id
    }
}

impl FireControl {
    /// Creates a new fire control system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a fire command for every ready tower with an enemy in range.
    pub fn handle(
        &mut self,
        session: &SessionSnapshot,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if session.status != SessionStatus::Playing {
            return;
        }

        self.candidates.clear();
        self.candidates.extend(enemies.iter().map(|enemy| Candidate {
            id: enemy.id,
            position: enemy.position,
            leg: enemy.leg,
            progress: enemy.progress,
        }));
        if self.candidates.is_empty() {
            return;
        }

        for tower in towers.iter() {
            if !tower.ready_in.is_zero() {
                continue;
            }

            let mut best: Option<Candidate> = None;
            for candidate in &self.candidates {
                if tower.center.distance_to(candidate.position) > tower.range {
                    continue;
                }
                match &mut best {
                    Some(existing) => {
                        if candidate.precedes(existing) {
                            *existing = *candidate;
                        }
                    }
                    None => best = Some(*candidate),
                }
            }

            if let Some(target) = best {
                out.push(Command::FireProjectile {
                    tower: tower.id,
                    target: target.id,
                });
            }
        }
    }
}
