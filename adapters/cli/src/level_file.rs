//! Loading of level and tuning files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use roguepilot_core::{LevelView, Location};
use roguepilot_system_tactics::PilotConfig;
use roguepilot_world::{query, Level, LevelDescription};

/// Reads a TOML level description and captures its snapshot.
pub(crate) fn load_level(path: &Path) -> Result<LevelView> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file at {}", path.display()))?;
    parse_level(&contents).with_context(|| format!("invalid level file {}", path.display()))
}

/// Parses the contents of a TOML level description.
pub(crate) fn parse_level(contents: &str) -> Result<LevelView> {
    let description: LevelDescription =
        toml::from_str(contents).context("failed to parse level toml contents")?;
    let level = Level::from_description(&description).context("level layout is inconsistent")?;
    Ok(query::level_view(&level))
}

/// Reads a TOML tuning file; missing keys keep their defaults.
pub(crate) fn load_config(path: &Path) -> Result<PilotConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid tuning file {}", path.display()))
}

/// Parses the contents of a TOML tuning file.
pub(crate) fn parse_config(contents: &str) -> Result<PilotConfig> {
    toml::from_str(contents).context("failed to parse tuning toml contents")
}

/// Parses a `x,y` pair as given on the command line.
pub(crate) fn parse_location(value: &str) -> Result<Location, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid column `{x}`"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid row `{y}`"))?;
    Ok(Location::new(x, y))
}
