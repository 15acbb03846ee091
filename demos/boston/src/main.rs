//! boston: one bike-fleet run over a handful of downtown Boston stations.
//!
//! ```text
//! boston [config.json] [stations.csv] [trips.csv]
//! ```
//!
//! Every argument is optional.  Without a config file the run uses
//! `FleetConfig::default()` scaled down to the embedded rosters; without
//! roster paths the embedded CSVs below are used.  Log verbosity comes from
//! `RUST_LOG` (e.g. `RUST_LOG=info`).

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use fleet_core::{FleetConfig, HaversineDistance};
use fleet_output::{CsvWriter, OutputObserver};
use fleet_registry::{DockRecord, load_docks_csv, load_docks_reader};
use fleet_sim::{FleetSimBuilder, Trip, load_trips_csv, load_trips_reader};

// ── Constants ─────────────────────────────────────────────────────────────────

const FLEET_SIZE:      usize = 20;
const SEED:            u64   = 42;
const SNAPSHOT_SECS:   f64   = 900.0; // every 15 minutes
/// Streets add roughly a third to great-circle distance downtown.
const DETOUR_FACTOR:   f64   = 1.3;
const OUTPUT_DIR:      &str  = "output/boston";

// ── Embedded rosters ──────────────────────────────────────────────────────────

const STATIONS_CSV: &str = "\
latitude,longitude,capacity\n\
42.3555,-71.0605,10\n\
42.3601,-71.0589,8\n\
42.3662,-71.0621,6\n\
42.3519,-71.0552,12\n\
42.3493,-71.0781,8\n\
42.3467,-71.0972,6\n\
42.3626,-71.0843,10\n\
42.3736,-71.1190,8\n\
";

// Departures spread over the morning peak (seconds after 07:00).
const TRIPS_CSV: &str = "\
origin_lat,origin_lon,destination_lat,destination_lon,departure_secs\n\
42.3550,-71.0610,42.3620,-71.0840,0\n\
42.3605,-71.0590,42.3490,-71.0790,120\n\
42.3660,-71.0625,42.3520,-71.0550,300\n\
42.3520,-71.0555,42.3740,-71.1185,420\n\
42.3495,-71.0785,42.3600,-71.0585,600\n\
42.3470,-71.0970,42.3555,-71.0605,900\n\
42.3625,-71.0845,42.3465,-71.0975,1200\n\
42.3735,-71.1192,42.3660,-71.0620,1500\n\
42.3558,-71.0600,42.3518,-71.0556,1800\n\
42.3600,-71.0592,42.3737,-71.1188,2100\n\
42.3664,-71.0619,42.3494,-71.0780,2400\n\
42.3517,-71.0551,42.3627,-71.0841,2700\n\
";

// ── Inputs ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<FleetConfig> {
    let Some(path) = path else {
        return Ok(FleetConfig {
            fleet_size:             FLEET_SIZE,
            seed:                   SEED,
            snapshot_interval_secs: Some(SNAPSHOT_SECS),
            ..FleetConfig::default()
        });
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: FleetConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn load_stations(path: Option<&Path>) -> Result<Vec<DockRecord>> {
    Ok(match path {
        Some(path) => load_docks_csv(path)?,
        None => load_docks_reader(Cursor::new(STATIONS_CSV))?,
    })
}

fn load_trips(path: Option<&Path>) -> Result<Vec<Trip>> {
    Ok(match path {
        Some(path) => load_trips_csv(path)?,
        None => load_trips_reader(Cursor::new(TRIPS_CSV))?,
    })
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let arg = |i: usize| args.get(i).map(PathBuf::as_path);

    // 1. Inputs.
    let config = load_config(arg(0))?;
    let stations = load_stations(arg(1))?;
    let trips = load_trips(arg(2))?;
    log::info!("loaded {} stations and {} trips", stations.len(), trips.len());

    println!("=== boston: bike-fleet simulation ===");
    println!(
        "Mode: {}  |  Bikes: {}  |  Stations: {}  |  Trips: {}  |  Seed: {}",
        config.mode,
        config.fleet_size,
        stations.len(),
        trips.len(),
        config.seed,
    );
    println!();

    // 2. Build.  Charging stations mirror the docking stations.
    let mut sim = FleetSimBuilder::new(config, HaversineDistance::new(DETOUR_FACTOR))
        .stations(stations)
        .trips(trips)
        .build()?;

    // 3. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    log::info!("writing output to {OUTPUT_DIR}/");
    let mut obs = OutputObserver::new(writer);

    // 4. Run.
    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    log::info!("run finished at {} after {:.3} s wall time", summary.final_time, elapsed.as_secs_f64());

    if let Some(e) = obs.take_error() {
        log::error!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("{summary}");
    println!("Output written to {OUTPUT_DIR}/");
    println!();

    // 6. Final station occupancy.
    println!("{:<10} {:>9} {:>9}", "Station", "Bikes", "Capacity");
    println!("{}", "-".repeat(30));
    for station in sim.registry().stations() {
        println!(
            "{:<10} {:>9} {:>9}",
            station.id().0,
            station.occupant_count(),
            station.capacity(),
        );
    }

    Ok(())
}
