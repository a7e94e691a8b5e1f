#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduling system.
//!
//! The scheduler reconstructs the simulation clock from broadcast
//! [`Event::TimeAdvanced`] events, releases the active wave's spawn queue as
//! the clock passes each entry, and requests the next wave once the board has
//! been clear for the scenario's grace period. It never touches the world
//! directly: all effects travel through [`Command`] batches.

use std::collections::VecDeque;
use std::time::Duration;

use wave_defence_core::{
    Command, EnemyKind, EnemyView, Event, Scenario, SessionSnapshot, SessionStatus,
};

/// A spawn that becomes due once the simulation clock reaches its timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingSpawn {
    at: Duration,
    kind: EnemyKind,
}

/// Pure system that releases wave spawns and paces wave transitions.
#[derive(Debug, Default)]
pub struct Scheduling {
    clock: Duration,
    queue: VecDeque<PendingSpawn>,
    grace_deadline: Option<Duration>,
    advance_requested: bool,
}

impl Scheduling {
    /// Creates a new scheduler with no active wave.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events and immutable views to emit spawn and wave commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: &SessionSnapshot,
        enemies: &EnemyView,
        scenario: &Scenario,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.clock = self.clock.saturating_add(*dt);
                }
                Event::SessionStarted { .. } => {
                    self.clock = Duration::ZERO;
                    self.queue.clear();
                    self.grace_deadline = None;
                    self.advance_requested = false;
                }
                Event::WaveStarted { wave } => {
                    self.enqueue_wave(*wave, scenario);
                    self.grace_deadline = None;
                    self.advance_requested = false;
                }
                Event::SessionReset
                | Event::SessionCompleted { .. }
                | Event::SessionFailed { .. } => {
                    self.clock = Duration::ZERO;
                    self.queue.clear();
                    self.grace_deadline = None;
                    self.advance_requested = false;
                }
                _ => {}
            }
        }

        if session.status != SessionStatus::Playing {
            return;
        }

        while let Some(pending) = self.queue.front().copied() {
            if pending.at > self.clock {
                break;
            }
            let _ = self.queue.pop_front();
            out.push(Command::SpawnEnemy { kind: pending.kind });
        }

        if self.queue.is_empty() && enemies.is_empty() && !self.advance_requested {
            match self.grace_deadline {
                None => {
                    self.grace_deadline =
                        Some(self.clock.saturating_add(scenario.grace_period));
                }
                Some(deadline) if self.clock >= deadline => {
                    self.advance_requested = true;
                    self.grace_deadline = None;
                    out.push(Command::AdvanceWave);
                }
                Some(_) => {}
            }
        } else if !self.queue.is_empty() || !enemies.is_empty() {
            self.grace_deadline = None;
        }
    }

    /// Builds the spawn queue for the given wave. Groups run back to back:
    /// each group's first spawn is due immediately after the previous group's
    /// last interval elapses, and spawns within a group are spaced by the
    /// group's interval.
    fn enqueue_wave(&mut self, wave: u32, scenario: &Scenario) {
        self.queue.clear();
        let Some(config) = wave
            .checked_sub(1)
            .and_then(|index| scenario.waves.get(index as usize))
        else {
            return;
        };

        let mut offset = Duration::ZERO;
        for group in &config.groups {
            for index in 0..group.count {
                let at = self
                    .clock
                    .saturating_add(offset)
                    .saturating_add(group.interval * index);
                self.queue.push_back(PendingSpawn {
                    at,
                    kind: group.kind,
                });
            }
            offset = offset.saturating_add(group.interval * group.count);
        }
    }
}
