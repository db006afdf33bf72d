pub mod config;
pub mod render;
pub mod venues;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use calgrid_core::color::parse_assignment;
use calgrid_core::ics;
use calgrid_core::{CalendarData, CalgridConfig, ColorRegistry};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Default range length after the first month
pub const DEFAULT_MONTHS_AHEAD: u32 = 12;

/// Timezone precedence: flag, config file, system timezone, UTC.
pub fn resolve_timezone(flag: Option<&str>, config: &CalgridConfig) -> Result<Tz> {
    if let Some(name) = flag {
        return Tz::from_str(name).map_err(|_| anyhow::anyhow!("Unknown timezone: {name}"));
    }

    if let Some(tz) = config.timezone()? {
        return Ok(tz);
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => match Tz::from_str(&name) {
            Ok(tz) => Ok(tz),
            Err(_) => {
                warn!(timezone = %name, "Unrecognized system timezone, using UTC");
                Ok(Tz::UTC)
            }
        },
        Err(e) => {
            warn!(error = %e, "Could not detect the system timezone, using UTC");
            Ok(Tz::UTC)
        }
    }
}

pub fn load_calendar(path: &Path, tz: Tz) -> Result<CalendarData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    ics::load_calendar(&content, tz).with_context(|| format!("Could not parse {}", path.display()))
}

/// Build the session's color registry: one default color per venue, then the
/// config file's overrides, then the command-line overrides.
pub fn build_registry(
    data: &CalendarData,
    seed: Option<u64>,
    config: &CalgridConfig,
    overrides: &[String],
) -> Result<ColorRegistry> {
    let venues = data.venues.iter().map(String::as_str);
    let mut registry = match seed {
        Some(seed) => ColorRegistry::seeded(venues, seed),
        None => ColorRegistry::with_random_colors(venues),
    };

    config
        .apply_colors(&mut registry)
        .context("Invalid color in config file")?;

    for assignment in overrides {
        let (venue, color) = parse_assignment(assignment)?;
        if !data.venues.contains(&venue) {
            debug!(venue = %venue, "Color override for a venue not in the calendar");
        }
        registry.set(&venue, color);
    }

    Ok(registry)
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    fn data(venues: &[&str]) -> CalendarData {
        CalendarData {
            venues: venues.iter().map(|v| v.to_string()).collect(),
            ..CalendarData::default()
        }
    }

    #[test]
    fn timezone_flag_beats_config() {
        let config = CalgridConfig {
            timezone: Some("America/New_York".to_string()),
            ..CalgridConfig::default()
        };
        assert_eq!(resolve_timezone(Some("Europe/Berlin"), &config).unwrap(), Berlin);
        assert_eq!(
            resolve_timezone(None, &config).unwrap(),
            chrono_tz::America::New_York
        );
    }

    #[test]
    fn unknown_timezone_flag_is_an_error() {
        assert!(resolve_timezone(Some("Nowhere/Special"), &CalgridConfig::default()).is_err());
    }

    #[test]
    fn command_line_colors_win_over_config() {
        let config = CalgridConfig {
            colors: vec!["Hall=#111111".to_string(), "Cafe=#222222".to_string()],
            ..CalgridConfig::default()
        };
        let registry = build_registry(
            &data(&["Hall", "Cafe", "Annex"]),
            Some(1),
            &config,
            &["Hall=#333333".to_string()],
        )
        .unwrap();

        assert_eq!(registry.color_for("Hall").to_hex(), "#333333");
        assert_eq!(registry.color_for("Cafe").to_hex(), "#222222");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn seeded_registry_is_reproducible() {
        let data = data(&["Hall", "Cafe"]);
        let config = CalgridConfig::default();
        assert_eq!(
            build_registry(&data, Some(7), &config, &[]).unwrap(),
            build_registry(&data, Some(7), &config, &[]).unwrap()
        );
    }

    #[test]
    fn malformed_override_is_rejected() {
        let result = build_registry(
            &data(&["Hall"]),
            None,
            &CalgridConfig::default(),
            &["Hall:#FF0000".to_string()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn reads_calendar_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.ics");
        std::fs::write(
            &path,
            "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nUID:a\nSUMMARY:Standup\n\
             LOCATION:Room A\nDTSTART:20240103T090000\nEND:VEVENT\nEND:VCALENDAR\n",
        )
        .unwrap();

        let data = load_calendar(&path, Berlin).unwrap();
        assert_eq!(data.events.len(), 1);
        assert!(data.venues.contains("Room A"));

        assert!(load_calendar(&dir.path().join("missing.ics"), Berlin).is_err());
    }

    #[test]
    fn expands_home_prefix() {
        let plain = PathBuf::from("/tmp/out");
        assert_eq!(expand_home(&plain), plain);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/pdfs")), home.join("pdfs"));
        }
    }
}
