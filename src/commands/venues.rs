use std::path::Path;

use anyhow::Result;
use calgrid_core::CalgridConfig;
use owo_colors::OwoColorize;

use super::{build_registry, load_calendar, resolve_timezone};
use crate::render::render_venue;

pub fn run(ics: &Path, seed: Option<u64>) -> Result<()> {
    let config = CalgridConfig::load()?;
    let tz = resolve_timezone(None, &config)?;
    let data = load_calendar(ics, tz)?;

    if data.venues.is_empty() {
        println!("{}", "No venues found".dimmed());
        return Ok(());
    }

    let registry = build_registry(&data, seed.or(config.seed), &config, &[])?;

    println!("{}", "Venues".bold());
    for venue in &data.venues {
        println!("{}", render_venue(venue, registry.color_for(venue)));
    }

    Ok(())
}
