//! Terminal rendering for calgrid-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.

use calgrid_core::{Color, MonthPage};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Color {
    /// A swatch in the color followed by its hex code
    fn render(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("{} {}", "██".truecolor(r, g, b), self.to_hex().dimmed())
    }
}

impl Render for MonthPage {
    fn render(&self) -> String {
        format!(
            "{} {}",
            self.file_name(),
            format!("({} KB)", self.bytes.len().div_ceil(1024)).dimmed()
        )
    }
}

/// A venue with its color swatch
pub fn render_venue(venue: &str, color: Color) -> String {
    format!("   {}  {}", color.render(), venue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_swatch_shows_hex() {
        let color = Color::from_hex("#FF0000").unwrap();
        let rendered = color.render();
        assert!(rendered.contains("██"));
        assert!(rendered.contains("#FF0000"));
    }

    #[test]
    fn page_shows_file_name_and_size() {
        let page = MonthPage {
            year: 2025,
            month: 1,
            bytes: vec![0; 1500],
        };
        let rendered = page.render();
        assert!(rendered.starts_with("calendar_2025-01.pdf"));
        assert!(rendered.contains("(2 KB)"));
    }

    #[test]
    fn venue_line_ends_with_name() {
        let line = render_venue("Room A", Color::BLACK);
        assert!(line.ends_with("Room A"));
    }
}
