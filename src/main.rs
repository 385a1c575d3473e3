use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use worldforge::ascii::{self, AsciiMode};
use worldforge::export;
use worldforge::history::{self, HistoryData, HistorySynthesizer, HistoryTables};
use worldforge::settings::WorldGenSettings;
use worldforge::World;

#[derive(Parser, Debug)]
#[command(name = "worldforge")]
#[command(about = "Generate deterministic fantasy worlds with terrain and history")]
struct Args {
    /// History seed (random if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// World size slider (0-4)
    #[arg(long, default_value = "2")]
    world_size: u8,

    /// History length slider (0-4)
    #[arg(long, default_value = "2")]
    history_length: u8,

    /// Civilization saturation slider (0-4)
    #[arg(long, default_value = "2")]
    civilizations: u8,

    /// Site density slider (0-4)
    #[arg(long, default_value = "2")]
    sites: u8,

    /// World volatility slider (0-4)
    #[arg(long, default_value = "2")]
    volatility: u8,

    /// Resource abundance slider (0-4)
    #[arg(long, default_value = "2")]
    resources: u8,

    /// Monstrous population slider (0-4)
    #[arg(long, default_value = "2")]
    monsters: u8,

    /// History data file; without it the world has terrain but no history
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Also print the chronicle of historical events
    #[arg(long)]
    chronicle: bool,

    /// Extra ASCII view: elevation, temperature, moisture, mineral, vegetation
    #[arg(long)]
    view: Option<String>,

    /// Export the world map as PNG
    #[arg(long)]
    map_png: Option<String>,

    /// Export the history package as JSON
    #[arg(long)]
    json: Option<String>,
}

fn slider_settings(args: &Args) -> WorldGenSettings {
    WorldGenSettings::new(
        args.world_size,
        args.history_length,
        args.civilizations,
        args.sites,
        args.volatility,
        args.resources,
        args.monsters,
    )
}

fn parse_view(name: &str) -> Option<AsciiMode> {
    AsciiMode::all()
        .iter()
        .copied()
        .find(|m| m.name().eq_ignore_ascii_case(name))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = slider_settings(&args);
    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Generating world with seed {} and settings {:?}", seed, settings);

    let data: Option<HistoryData> = match &args.data {
        Some(path) => match history::load_history_data(path) {
            Ok((data, report)) => {
                if report.warnings > 0 {
                    println!("History data loaded with {} warning(s)", report.warnings);
                }
                Some(data)
            }
            Err(err) => {
                eprintln!("History data unavailable: {}", err);
                None
            }
        },
        None => None,
    };

    let tables = HistoryTables::default();
    let package = data
        .as_ref()
        .map(|d| HistorySynthesizer::new(seed, d, &tables).generate(&settings));

    let world = match &package {
        Some(pkg) => World::generate_with_history(&settings, pkg),
        None => World::generate(&settings),
    };

    println!();
    print!("{}", ascii::render(&world, AsciiMode::Map));
    println!();
    println!("{}", ascii::map_legend());
    println!(
        "Start position: ({}, {})",
        world.start.0, world.start.1
    );

    if let Some(view) = &args.view {
        match parse_view(view) {
            Some(mode) => {
                println!();
                println!("{} view:", mode.name());
                print!("{}", ascii::render(&world, mode));
            }
            None => eprintln!("Unknown view '{}'", view),
        }
    }

    if let Some(pkg) = &package {
        println!(
            "History: {} events, {} entities",
            pkg.events.len(),
            pkg.entities.len()
        );
        if args.chronicle {
            println!();
            for line in pkg.display_lines() {
                println!("{}", line);
            }
        }
    }

    if let Some(path) = &args.map_png {
        if let Err(err) = export::export_world_png(&world, path) {
            eprintln!("Failed to export map PNG: {}", err);
            return ExitCode::FAILURE;
        }
        println!("Wrote map to {}", path);
    }

    if let Some(path) = &args.json {
        match &package {
            Some(pkg) => {
                if let Err(err) = export::export_history_json(pkg, path) {
                    eprintln!("Failed to export history JSON: {}", err);
                    return ExitCode::FAILURE;
                }
                println!("Wrote history to {}", path);
            }
            None => eprintln!("No history package to export (pass --data)"),
        }
    }

    ExitCode::SUCCESS
}
