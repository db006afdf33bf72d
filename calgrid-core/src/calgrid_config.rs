//! User configuration at ~/.config/calgrid/config.toml.
//!
//! Every key is optional. Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::color::{self, Color, ColorRegistry};
use crate::error::{CalGridError, CalGridResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalgridConfig {
    /// IANA timezone name, e.g. "Europe/Berlin"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub monochrome: bool,

    /// Where PDFs are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Seed for default venue colors; random each run when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Venue color overrides as `"Venue=#RRGGBB"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

impl CalgridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config. A missing file yields the defaults.
    pub fn load() -> CalGridResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// The configured timezone, if any.
    pub fn timezone(&self) -> CalGridResult<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| Tz::from_str(name).map_err(|_| CalGridError::InvalidTimezone(name.into())))
            .transpose()
    }

    /// Parsed venue color overrides, in file order.
    pub fn venue_colors(&self) -> CalGridResult<Vec<(String, Color)>> {
        self.colors
            .iter()
            .map(|assignment| color::parse_assignment(assignment))
            .collect()
    }

    /// Apply the venue color overrides to `registry`.
    pub fn apply_colors(&self, registry: &mut ColorRegistry) -> CalGridResult<()> {
        for (venue, color) in self.venue_colors()? {
            registry.set(&venue, color);
        }
        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = "\
# calgrid configuration

# Timezone for placing events (defaults to the system timezone):
# timezone = \"Europe/Berlin\"

# Render all event text in black:
# monochrome = false

# Where PDFs are written (defaults to the current directory):
# output_dir = \"~/calendars\"

# Fixed seed for default venue colors, so reruns keep the same colors:
# seed = 42

# Venue color overrides:
# colors = [\"Room A=#D62728\", \"Main Hall=#1F77B4\"]
";

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
