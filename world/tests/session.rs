//! End-to-end session tests that pump commands and events between the world
//! and the pure systems, mirroring how an adapter drives the simulation.

use std::time::Duration;

use wave_defence_core::{
    CellCoord, Command, EnemyKind, Event, Path, Scenario, SessionStatus, SpawnGroup, TowerKind,
    WaveConfig,
};
use wave_defence_system_fire_control::FireControl;
use wave_defence_system_scheduling::Scheduling;
use wave_defence_world::{apply, query, World};

/// Drives the world and systems the way a frontend adapter does: commands are
/// applied, the resulting events feed the systems, and any commands the
/// systems emit are applied in the next iteration until the batch settles.
struct Harness {
    world: World,
    scheduler: Scheduling,
    fire_control: FireControl,
}

impl Harness {
    fn new(scenario: Scenario) -> Self {
        Self {
            world: World::new(scenario).expect("scenario is valid"),
            scheduler: Scheduling::new(),
            fire_control: FireControl::new(),
        }
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut pending = vec![command];
        let mut log = Vec::new();

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                apply(&mut self.world, command, &mut events);
            }

            let session = query::session(&self.world);
            let towers = query::tower_view(&self.world);
            let enemies = query::enemy_view(&self.world);

            let mut commands = Vec::new();
            self.scheduler.handle(
                &events,
                &session,
                &enemies,
                query::scenario(&self.world),
                &mut commands,
            );
            self.fire_control
                .handle(&session, &towers, &enemies, &mut commands);

            log.extend(events);
            pending = commands;
        }

        log
    }

    fn tick(&mut self, millis: u64) -> Vec<Event> {
        self.dispatch(Command::Tick {
            dt: Duration::from_millis(millis),
        })
    }
}

fn sniper_scenario() -> Scenario {
    Scenario {
        columns: 10,
        rows: 10,
        path: Path::new(vec![CellCoord::new(0, 5), CellCoord::new(9, 5)]).expect("path"),
        waves: vec![WaveConfig {
            groups: vec![SpawnGroup {
                kind: EnemyKind::Grunt,
                count: 2,
                interval: Duration::from_millis(500),
            }],
        }],
        starting_gold: 150,
        starting_health: 100,
        leak_damage: 10,
        wave_bonus: 25,
        grace_period: Duration::from_millis(2000),
    }
}

#[test]
fn defended_session_runs_to_completion() {
    let mut harness = Harness::new(sniper_scenario());
    let _ = harness.dispatch(Command::StartSession);
    let _ = harness.dispatch(Command::PlaceTower {
        kind: TowerKind::Sniper,
        cell: CellCoord::new(4, 4),
    });

    let mut kills = 0;
    let mut completed = false;
    for _ in 0..400 {
        let events = harness.tick(50);
        kills += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count();
        if events.contains(&Event::SessionCompleted { score: 200 }) {
            completed = true;
            break;
        }
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::EnemyLeaked { .. })),
            "a sniper covering the path must not allow leaks",
        );
    }

    assert!(completed, "the defended session should complete");
    assert_eq!(kills, 2);

    let session = query::session(&harness.world);
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.health, 100);
    // 150 starting, -120 tower, +20 kill rewards, +25 wave bonus.
    assert_eq!(session.gold, 75);
    assert_eq!(session.score, 200);
}

#[test]
fn undefended_session_leaks_every_enemy_and_survives_on_health() {
    let mut harness = Harness::new(Scenario::reference());
    let _ = harness.dispatch(Command::StartSession);

    let mut leaks = 0;
    let mut completed = false;
    for _ in 0..800 {
        let events = harness.tick(50);
        leaks += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyLeaked { .. }))
            .count();
        if events
            .iter()
            .any(|event| matches!(event, Event::SessionCompleted { .. }))
        {
            completed = true;
            break;
        }
    }

    assert!(completed, "both reference waves should eventually clear");
    assert_eq!(leaks, 9, "all five grunts and four wave-two enemies leak");

    let session = query::session(&harness.world);
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.health, 10);
    // 200 starting plus two wave bonuses; leaks credit nothing.
    assert_eq!(session.gold, 250);
    assert_eq!(session.score, 0);
}

#[test]
fn identical_command_scripts_replay_identically() {
    let script = || {
        let mut harness = Harness::new(Scenario::reference());
        let mut log = Vec::new();
        log.extend(harness.dispatch(Command::StartSession));
        log.extend(harness.dispatch(Command::PlaceTower {
            kind: TowerKind::Cannon,
            cell: CellCoord::new(1, 4),
        }));
        log.extend(harness.dispatch(Command::PlaceTower {
            kind: TowerKind::Frost,
            cell: CellCoord::new(3, 6),
        }));
        for _ in 0..100 {
            log.extend(harness.tick(50));
        }
        log.extend(harness.dispatch(Command::Pause));
        log.extend(harness.dispatch(Command::Resume));
        for _ in 0..50 {
            log.extend(harness.tick(50));
        }
        (log, query::session(&harness.world))
    };

    let (first_log, first_session) = script();
    let (second_log, second_session) = script();
    assert_eq!(first_log, second_log);
    assert_eq!(first_session, second_session);
}
