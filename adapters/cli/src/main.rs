#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that drives a Wave Defence session.
//!
//! The runner applies an optional tower loadout, then pumps fixed ticks
//! through the world and the pure systems until the session reaches a
//! terminal state or the tick budget runs out.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, info, warn};

use wave_defence_core::{
    CellCoord, Command, Event, Scenario, SessionStatus, TowerKind, WELCOME_BANNER,
};
use wave_defence_system_fire_control::FireControl;
use wave_defence_system_scheduling::Scheduling;
use wave_defence_world::{apply, query, World};

/// Command-line arguments accepted by the headless runner.
#[derive(Debug, Parser)]
#[command(name = "wave-defence", about = "Headless Wave Defence simulation runner")]
struct Args {
    /// Path to a JSON scenario file. The built-in scenario is used when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Fixed simulation step in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Upper bound on simulated ticks before the runner gives up.
    #[arg(long, default_value_t = 2_000)]
    max_ticks: u64,

    /// Tower placement applied at session start, as `kind:column,row`.
    /// May be repeated.
    #[arg(long = "tower", value_name = "KIND:COL,ROW")]
    towers: Vec<String>,
}

/// Final state reported once the run ends.
#[derive(Debug)]
struct Summary {
    status: SessionStatus,
    ticks: u64,
    wave: u32,
    gold: u32,
    health: u32,
    score: u64,
}

/// Owns the world and the systems, pumping command batches until they settle.
struct Runner {
    world: World,
    scheduler: Scheduling,
    fire_control: FireControl,
}

impl Runner {
    fn new(scenario: Scenario) -> anyhow::Result<Self> {
        let world = World::new(scenario).context("scenario rejected by the world")?;
        Ok(Self {
            world,
            scheduler: Scheduling::new(),
            fire_control: FireControl::new(),
        })
    }

    fn dispatch(&mut self, command: Command) {
        let mut pending = vec![command];

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

            for event in &events {
                report(event);
            }
            pending = commands;
        }
    }
}

fn report(event: &Event) {
    match event {
        Event::SessionStarted { wave } => info!("session started at wave {wave}"),
        Event::WaveStarted { wave } => info!("wave {wave} started"),
        Event::WaveCleared { wave, bonus } => info!("wave {wave} cleared, bonus {bonus} gold"),
        Event::EnemyLeaked { enemy, damage } => {
            warn!("enemy {} leaked for {damage} damage", enemy.get());
        }
        Event::SessionCompleted { score } => info!("session completed, score {score}"),
        Event::SessionFailed {
            score,
            wave_reached,
        } => warn!("session failed at wave {wave_reached}, score {score}"),
        Event::TowerPlacementRejected { cell, reason, .. } => warn!(
            "tower placement at {},{} rejected: {reason:?}",
            cell.column(),
            cell.row(),
        ),
        other => debug!("{other:?}"),
    }
}

/// Parses a `kind:column,row` placement argument.
fn parse_placement(raw: &str) -> anyhow::Result<(TowerKind, CellCoord)> {
    let (kind, cell) = raw
        .split_once(':')
        .with_context(|| format!("placement `{raw}` is missing the `kind:` prefix"))?;
    let kind = match kind.to_ascii_lowercase().as_str() {
        "cannon" => TowerKind::Cannon,
        "frost" => TowerKind::Frost,
        "sniper" => TowerKind::Sniper,
        other => bail!("unknown tower kind `{other}`"),
    };
    let (column, row) = cell
        .split_once(',')
        .with_context(|| format!("placement `{raw}` must name a `column,row` cell"))?;
    let column: u32 = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column in `{raw}`"))?;
    let row: u32 = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row in `{raw}`"))?;
    Ok((kind, CellCoord::new(column, row)))
}

fn load_scenario(path: Option<&PathBuf>) -> anyhow::Result<Scenario> {
    match path {
        None => Ok(Scenario::reference()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse scenario file {}", path.display()))
        }
    }
}

fn run(args: &Args) -> anyhow::Result<Summary> {
    if args.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }

    let placements = args
        .towers
        .iter()
        .map(|raw| parse_placement(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let scenario = load_scenario(args.scenario.as_ref())?;
    let mut runner = Runner::new(scenario)?;

    runner.dispatch(Command::StartSession);
    for (kind, cell) in placements {
        runner.dispatch(Command::PlaceTower { kind, cell });
    }

    let dt = Duration::from_millis(args.tick_ms);
    let mut ticks = 0;
    while ticks < args.max_ticks {
        let status = query::session(&runner.world).status;
        if status == SessionStatus::Completed || status == SessionStatus::Failed {
            break;
        }
        runner.dispatch(Command::Tick { dt });
        ticks += 1;
    }

    let session = query::session(&runner.world);
    Ok(Summary {
        status: session.status,
        ticks,
        wave: session.wave,
        gold: session.gold,
        health: session.health,
        score: session.score,
    })
}

/// Entry point for the Wave Defence command-line interface.
fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    println!("{WELCOME_BANNER}");
    match run(&args) {
        Ok(summary) => {
            println!(
                "{:?} after {} ticks: wave {}, gold {}, health {}, score {}",
                summary.status,
                summary.ticks,
                summary.wave,
                summary.gold,
                summary.health,
                summary.score,
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
