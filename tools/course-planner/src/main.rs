use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use quest_core::game::state::GameSettings;
use quest_core::game::Game;
use quest_geofence::course::SamplingArea;
use quest_geofence::prelude::*;

mod output;

use output::{render_geojson, render_json, write_output};

#[derive(Parser, Debug)]
#[command(
    name = "course-planner",
    author,
    version,
    about = "Generate waypoint courses and check positions against them",
    long_about = "Generates a start point, 4-7 clue waypoints and an end point inside a \
                  bounding box, and evaluates player positions against a saved course.\n\n\
                  Courses are reproducible with --seed. Settings (trigger distance, clue \
                  count range, sampling area) can be loaded from a JSON file with --config."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a course inside a bounding box
    Generate(GenerateArgs),
    /// Check a position against a saved JSON course
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Northern edge latitude
    #[arg(long, allow_negative_numbers = true)]
    north: f64,

    /// Western edge longitude
    #[arg(long, allow_negative_numbers = true)]
    west: f64,

    /// Southern edge latitude
    #[arg(long, allow_negative_numbers = true)]
    south: f64,

    /// Eastern edge longitude (may be less than --west to cross the antimeridian)
    #[arg(long, allow_negative_numbers = true)]
    east: f64,

    /// Fixed start latitude
    #[arg(long, allow_negative_numbers = true, requires = "start_lng")]
    start_lat: Option<f64>,

    /// Fixed start longitude
    #[arg(long, allow_negative_numbers = true, requires = "start_lat")]
    start_lng: Option<f64>,

    /// Radius hint in meters
    #[arg(long)]
    max_radius: Option<f64>,

    /// Keep every waypoint within --max-radius of the bounding box center
    #[arg(long, requires = "max_radius")]
    within_radius: bool,

    /// RNG seed for a reproducible course. None = random.
    #[arg(long)]
    seed: Option<u64>,

    /// Game id used to derive waypoint ids
    #[arg(long, default_value = "course")]
    game_id: String,

    /// Settings JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Geojson)]
    format: Format,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Course JSON file written by `generate --format json`
    #[arg(long)]
    course: PathBuf,

    /// Player latitude
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Player longitude
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Trigger distance in meters (overrides settings)
    #[arg(long)]
    threshold: Option<f64>,

    /// Settings JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Geojson,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    match args.command {
        Command::Generate(generate) => run_generate(generate),
        Command::Check(check) => run_check(check),
    }
}

fn load_settings(path: Option<&Path>) -> Result<GameSettings> {
    let Some(path) = path else {
        return Ok(GameSettings::default());
    };

    log::info!("Settings: {}", path.display());
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    GameSettings::from_json(&json).with_context(|| format!("Invalid settings in {}", path.display()))
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut settings = load_settings(args.config.as_deref())?;
    if args.within_radius {
        settings.course.sampling = SamplingArea::WithinRadius;
    }

    let region = BoundingRegion::from_edges(args.north, args.west, args.south, args.east)
        .context("Invalid bounding box")?;

    let starting_point = match (args.start_lat, args.start_lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng).context("Invalid starting point")?),
        (None, None) => None,
        _ => bail!("--start-lat and --start-lng must be given together"),
    };

    let game = Game {
        max_radius_meters: args.max_radius,
        starting_point,
        ..Game::new(GameIdentifier::new(&args.game_id)).with_bounding_box(region)
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    log::info!(
        "Region: N {} W {} S {} E {}{}",
        args.north,
        args.west,
        args.south,
        args.east,
        if region.crosses_antimeridian() { " (crosses antimeridian)" } else { "" }
    );

    let course = game
        .plan_course(&settings, &mut rng)
        .context("Failed to generate course")?;
    log::info!("Generated {} waypoints", course.len());

    let rendered = match args.format {
        Format::Geojson => render_geojson(&course)?,
        Format::Json => render_json(&course)?,
    };
    write_output(&rendered, args.output.as_deref())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let proximity = match args.threshold {
        Some(meters) => ProximityConfig::new(meters).context("Invalid --threshold")?,
        None => settings.trigger_distance,
    };

    let json = std::fs::read_to_string(&args.course)
        .with_context(|| format!("Failed to read course from {}", args.course.display()))?;
    let course: Vec<Waypoint> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid course in {}", args.course.display()))?;

    let position = Coordinate::new(args.lat, args.lng).context("Invalid position")?;
    let threshold = proximity.trigger_distance_meters();

    println!("Waypoints by distance:");
    for waypoint in sort_by_distance(position, &course) {
        println!(
            "  {:>3} {:<5} {:<9} {:>10.1} m  {}",
            waypoint.sequence_number,
            waypoint.kind,
            waypoint.status(),
            haversine_distance(position, waypoint.coordinate),
            waypoint.id
        );
    }

    if let Some(closest) = get_closest_point(position, &course) {
        println!("Closest: {}", closest.id);
    }

    let triggered = get_triggered_points(position, &course, threshold)?;
    if triggered.is_empty() {
        println!("No waypoints triggered within {threshold} m");
    } else {
        for waypoint in triggered {
            println!("Triggered: {} ({})", waypoint.id, waypoint.kind);
        }
    }

    Ok(())
}
