#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that asks the pilot for one decision on a level file.

mod level_file;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use roguepilot_core::{Action, Location};
use roguepilot_system_pathfinding::Pathfinder;
use roguepilot_system_tactics::{Pilot, PilotConfig};
use roguepilot_system_threat::ThreatEvaluator;
use serde::Serialize;

/// Decide the next move of the player on a level snapshot.
#[derive(Debug, Parser)]
#[command(name = "roguepilot", version)]
struct Args {
    /// TOML level description holding the layout and entity stats.
    #[arg(value_name = "LEVEL")]
    level: PathBuf,

    /// TOML tuning file overriding the engine defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also plan and print the route from the player to this cell (`x,y`).
    #[arg(long, value_name = "X,Y", value_parser = level_file::parse_location)]
    route_to: Option<Location>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human readable lines.
    Text,
    /// A single JSON object.
    Json,
}

#[derive(Debug, Serialize)]
struct Report {
    action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<Vec<Location>>,
}

/// Entry point for the Roguepilot command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => level_file::load_config(path)?,
        None => PilotConfig::default(),
    };
    let view = level_file::load_level(&args.level)?;
    tracing::info!(
        level = %args.level.display(),
        monsters = view.monsters().len(),
        items = view.items().len(),
        "level loaded"
    );

    let route = args.route_to.map(|target| {
        Pathfinder::new(ThreatEvaluator::new(config.threat))
            .route_to(&view, target)
            .cells()
            .to_vec()
    });
    let action = Pilot::new(config).decide(&view);
    let report = Report { action, route };

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&report).context("failed to encode report as json")?
        ),
    }

    Ok(())
}

fn render_text(report: &Report) -> String {
    let mut text = match report.action {
        Action::None => String::from("action: none\n"),
        Action::Step(offset) => format!("action: step {} {}\n", offset.dx(), offset.dy()),
        Action::Attack(offset) => format!("action: attack {} {}\n", offset.dx(), offset.dy()),
    };

    if let Some(route) = &report.route {
        let cells: Vec<String> = route
            .iter()
            .map(|cell| format!("({}, {})", cell.x(), cell.y()))
            .collect();
        if cells.is_empty() {
            text.push_str("route: unreachable\n");
        } else {
            text.push_str(&format!("route: {}\n", cells.join(" -> ")));
        }
    }

    text
}
