//! Venue colors.
//!
//! A [`ColorRegistry`] is built once per session and shared by reference with
//! every page, so a venue keeps the same color across all months.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Text color used in monochrome mode and for unknown venues.
    pub const NEUTRAL: Color = Color::BLACK;

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Color::rgb(rng.random(), rng.random(), rng.random())
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> CalGridResult<Self> {
        let invalid = || CalGridError::InvalidColor(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| invalid())
        };

        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Components scaled to 0..=255.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CalGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

/// Parse a `Venue=#RRGGBB` assignment. The venue is everything before the
/// last `=`, trimmed.
pub fn parse_assignment(assignment: &str) -> CalGridResult<(String, Color)> {
    let (venue, hex) = assignment
        .rsplit_once('=')
        .ok_or_else(|| CalGridError::InvalidColor(assignment.to_string()))?;
    let venue = venue.trim();
    if venue.is_empty() {
        return Err(CalGridError::InvalidColor(assignment.to_string()));
    }
    Ok((venue.to_string(), Color::from_hex(hex)?))
}

/// Venue → color mapping for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorRegistry {
    colors: BTreeMap<String, Color>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One random color per venue from the thread RNG.
    pub fn with_random_colors<'a>(venues: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_rng(venues, &mut rand::rng())
    }

    /// One random color per venue from a seeded RNG, reproducible across runs.
    pub fn seeded<'a>(venues: impl IntoIterator<Item = &'a str>, seed: u64) -> Self {
        Self::with_rng(venues, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<'a>(venues: impl IntoIterator<Item = &'a str>, rng: &mut impl Rng) -> Self {
        let mut registry = Self::new();
        for venue in venues {
            let venue = venue.trim();
            if !registry.colors.contains_key(venue) {
                registry.colors.insert(venue.to_string(), Color::random(rng));
            }
        }
        registry
    }

    /// Assign `color` to `venue`, replacing any previous color.
    pub fn set(&mut self, venue: &str, color: Color) {
        self.colors.insert(venue.trim().to_string(), color);
    }

    pub fn get(&self, venue: &str) -> Option<Color> {
        self.colors.get(venue.trim()).copied()
    }

    /// The venue's color, or [`Color::NEUTRAL`] for unknown venues.
    pub fn color_for(&self, venue: &str) -> Color {
        self.get(venue).unwrap_or(Color::NEUTRAL)
    }

    /// Venues and colors, ordered by venue.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.colors.iter().map(|(venue, color)| (venue.as_str(), *color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
