//! Command-line front end for inspecting and normalising model files.
//!
//! # Responsibility
//! - Load a model file, print a per-park summary of trails and which
//!   activities each is currently open for.
//! - Optionally write the model back out (`--save <path>`), which rewrites it
//!   in canonical sorted order.
//!
//! Logging is configured through `TRAILHEAD_LOG_DIR` / `TRAILHEAD_LOG_LEVEL`.

use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use trailhead_core::logging::LoggingConfig;
use trailhead_core::{core_version, Coordinator};

const USAGE: &str = "usage: trailhead_cli <model-file> [--save <path>]";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    input: PathBuf,
    save_to: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let input = args.next().ok_or_else(|| USAGE.to_string())?;
    let mut save_to = None;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--save" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--save requires a path".to_string())?;
                save_to = Some(PathBuf::from(path));
            }
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(Args {
        input: PathBuf::from(input),
        save_to,
    })
}

fn print_summary(model: &Coordinator) {
    let activities = model.activities().activities();
    println!(
        "activities={} parks={} trail_registries={}",
        activities.len(),
        model.parks().len(),
        model.trail_registry_count()
    );

    for registry in model.trail_registries() {
        println!(
            "{} (snow delta {})",
            registry.park_name(),
            registry.park().snow_delta()
        );
        for trail in registry.trails() {
            let open_for: Vec<&str> = activities
                .iter()
                .filter(|activity| trail.is_open_for(activity))
                .map(|activity| activity.name())
                .collect();
            println!(
                "  {} [{}] snow={} maintenance={} open_for={}",
                trail.name(),
                trail.difficulty(),
                trail.snow_depth(),
                trail.closed_for_maintenance(),
                open_for.join(",")
            );
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let model = trailhead_core::open(&args.input).map_err(|err| err.to_string())?;
    print_summary(&model);

    if let Some(path) = args.save_to {
        model.save_file(&path).map_err(|err| err.to_string())?;
        println!("saved {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Some(config) = LoggingConfig::from_env() {
        if let Err(err) = config.init() {
            eprintln!("logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
