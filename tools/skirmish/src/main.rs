//! skirmish: run a seeded BROADSIDE skirmish headlessly and print a summary.
//!
//! Usage:
//!   skirmish [--setup skirmish.json] [--seed N] [--seconds S] [--json]
//!
//! Without `--setup` the stock two-versus-two skirmish is flown. `--json`
//! prints the final snapshot instead of the text summary. Logging goes
//! through `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::path::PathBuf;
use std::process;

use broadside_core::config::load_json;
use broadside_core::constants::TICK_RATE;
use broadside_core::enums::Team;
use broadside_sim::state::{SimEvent, SimSnapshot};
use broadside_sim::world_setup::SkirmishSetup;
use broadside_sim::{SimConfig, SimError, SimulationEngine};

struct Options {
    setup: Option<PathBuf>,
    seed: u64,
    seconds: f32,
    json: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = run(&options) {
        eprintln!("skirmish failed: {err}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "skirmish: headless BROADSIDE skirmish\n\
         \n\
           --setup <path>   JSON skirmish setup (default: stock skirmish)\n\
           --seed <N>       RNG seed (default: 42)\n\
           --seconds <S>    Maximum simulated seconds (default: 120)\n\
           --json           Print the final snapshot as JSON\n"
    );
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        setup: None,
        seed: 42,
        seconds: 120.0,
        json: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--setup" => {
                let path = iter.next().ok_or("--setup needs a path")?;
                options.setup = Some(PathBuf::from(path));
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                options.seed = value.parse().map_err(|_| format!("invalid seed: {value}"))?;
            }
            "--seconds" => {
                let value = iter.next().ok_or("--seconds needs a value")?;
                options.seconds = value
                    .parse()
                    .map_err(|_| format!("invalid duration: {value}"))?;
            }
            "--json" => options.json = true,
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn run(options: &Options) -> Result<(), SimError> {
    let setup = match &options.setup {
        Some(path) => load_json::<SkirmishSetup>(path)?,
        None => SkirmishSetup::default_skirmish(),
    };

    let mut engine = SimulationEngine::new(SimConfig {
        seed: options.seed,
        ..Default::default()
    });
    engine.initialize(&setup)?;

    let max_ticks = (options.seconds.max(0.0) * TICK_RATE as f32) as u64;
    let mut snapshot = engine.tick();
    let mut tally = Tally::default();
    tally.record(&snapshot);

    while snapshot.tick < max_ticks && !is_decided(&snapshot) {
        snapshot = engine.tick();
        tally.record(&snapshot);
    }
    engine.shutdown();

    if options.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("failed to serialize snapshot: {err}"),
        }
    } else {
        print_summary(&snapshot, &tally);
    }
    Ok(())
}

fn is_decided(snapshot: &SimSnapshot) -> bool {
    snapshot.alive(Team::Blue) == 0 || snapshot.alive(Team::Red) == 0
}

#[derive(Default)]
struct Tally {
    shots: u32,
    hits: u32,
    damage: f32,
    failures: u32,
    kills: Vec<(f64, String)>,
}

impl Tally {
    fn record(&mut self, snapshot: &SimSnapshot) {
        use broadside_core::events::WeaponEvent;

        for event in &snapshot.events {
            match event {
                SimEvent::Weapon {
                    event: WeaponEvent::UnitFired { .. },
                    ..
                } => self.shots += 1,
                SimEvent::Weapon {
                    event: WeaponEvent::FiringFailed,
                    ..
                } => self.failures += 1,
                SimEvent::Weapon { .. } => {}
                SimEvent::Hit { damage, .. } => {
                    self.hits += 1;
                    self.damage += damage;
                }
                SimEvent::ShipDestroyed { ship } => {
                    self.kills.push((snapshot.elapsed_secs, ship.clone()));
                }
            }
        }
    }
}

fn print_summary(snapshot: &SimSnapshot, tally: &Tally) {
    println!("BROADSIDE skirmish: {:.1} s ({} ticks)", snapshot.elapsed_secs, snapshot.tick);
    println!();
    for ship in &snapshot.ships {
        let status = if ship.destroyed { "destroyed" } else { "active" };
        println!(
            "  {:<10} {:?}  hull {:>6.1}  {:<9}  target {}",
            ship.name,
            ship.team,
            ship.hull,
            status,
            ship.target.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!(
        "  shots {}  hits {}  damage {:.1}  denied {}",
        tally.shots, tally.hits, tally.damage, tally.failures
    );
    for (time, ship) in &tally.kills {
        println!("  {time:>6.1} s  {ship} destroyed");
    }

    let verdict = match (snapshot.alive(Team::Blue), snapshot.alive(Team::Red)) {
        (0, 0) => "mutual destruction",
        (_, 0) => "Blue wins",
        (0, _) => "Red wins",
        _ => "undecided",
    };
    println!();
    println!("  {verdict}");
}
