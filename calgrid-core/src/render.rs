//! PDF rendering of one month page.
//!
//! Drawing is split in two steps: [`cell_text_runs`] decides what text goes
//! where inside a cell (wrapping, coloring, truncation), and [`PageRenderer`]
//! turns the page into PDF content operations with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::color::{Color, ColorRegistry};
use crate::day_index::DayBuckets;
use crate::error::CalGridResult;
use crate::layout::{CellGeometry, DayMatrix, Grid, PageGeometry};
use crate::month::YearMonth;
use crate::text_fit;

pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const WEEKDAY_FONT_SIZE: f32 = 12.0;
pub const DAY_NUMBER_FONT_SIZE: f32 = 8.0;
pub const EVENT_FONT_SIZE: f32 = 8.0;

/// Distance between successive event lines
pub const LINE_PITCH: f32 = 10.0;
/// Offset of the first event line below the cell top
pub const FIRST_LINE_OFFSET: f32 = 22.0;
/// Offset of the day number below the cell top
pub const DAY_NUMBER_OFFSET: f32 = 12.0;
/// Left inset of text, and bottom inset of the truncation marker
pub const TEXT_INSET: f32 = 2.0;

pub const TRUNCATION_MARKER: &str = "...";

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// A piece of text placed on the page (left baseline origin).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Color,
}

/// The venue of a day line: the text after its last `@`, trimmed.
pub fn venue_of(line: &str) -> &str {
    line.rsplit('@').next().unwrap_or(line).trim()
}

/// Lay out a day's lines inside `cell`.
///
/// Lines are wrapped to the cell width and drawn top-down. The first line that
/// would reach the cell bottom is replaced by [`TRUNCATION_MARKER`] and
/// nothing after it is drawn, so a cell holds at most one marker. A line that
/// cannot fit a single character is treated the same way.
pub fn cell_text_runs<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    cell: &CellGeometry,
    colors: &ColorRegistry,
    monochrome: bool,
) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let x = cell.x + TEXT_INSET;
    let mut offset = FIRST_LINE_OFFSET;

    for line in lines {
        let color = if monochrome {
            Color::NEUTRAL
        } else {
            colors.color_for(venue_of(line))
        };

        let wrapped = text_fit::fit(line, cell.width - 2.0 * TEXT_INSET, EVENT_FONT_SIZE);
        let truncated = wrapped.is_empty() && !line.trim().is_empty();

        for text in wrapped {
            if offset >= cell.height {
                runs.push(marker(x, cell, color));
                return runs;
            }
            runs.push(TextRun {
                x,
                y: cell.y - offset,
                text,
                color,
            });
            offset += LINE_PITCH;
        }

        if truncated {
            runs.push(marker(x, cell, color));
            return runs;
        }
    }

    runs
}

fn marker(x: f32, cell: &CellGeometry, color: Color) -> TextRun {
    TextRun {
        x,
        y: cell.bottom() + TEXT_INSET,
        text: TRUNCATION_MARKER.to_string(),
        color,
    }
}

/// Renders month pages as single-page PDF documents.
#[derive(Debug, Clone)]
pub struct PageRenderer<'a> {
    page: PageGeometry,
    colors: &'a ColorRegistry,
    monochrome: bool,
}

impl<'a> PageRenderer<'a> {
    pub fn new(page: PageGeometry, colors: &'a ColorRegistry, monochrome: bool) -> Self {
        PageRenderer {
            page,
            colors,
            monochrome,
        }
    }

    /// Render one month. The output only depends on the arguments, so equal
    /// inputs produce byte-identical documents.
    pub fn render(
        &self,
        month: YearMonth,
        days: &DayMatrix,
        buckets: &DayBuckets,
        grid: &Grid,
    ) -> CalGridResult<Vec<u8>> {
        let content = self.page_content(month, days, buckets, grid);
        self.write_document(content)
    }

    fn page_content(
        &self,
        month: YearMonth,
        days: &DayMatrix,
        buckets: &DayBuckets,
        grid: &Grid,
    ) -> Content {
        let mut canvas = Canvas::default();
        let page = &self.page;

        canvas.fill_color(Color::BLACK);
        canvas.centered_text(
            BOLD_FONT,
            TITLE_FONT_SIZE,
            page.width / 2.0,
            page.title_center_y(),
            &format!("{} {}", month.name(), month.year()),
        );

        for (column, label) in WEEKDAY_LABELS.iter().enumerate() {
            canvas.centered_text(
                BOLD_FONT,
                WEEKDAY_FONT_SIZE,
                grid.column_center(column),
                page.weekday_center_y(),
                label,
            );
        }

        canvas.stroke_color(Color::BLACK);
        for cell in grid.cells() {
            canvas.rect(cell);

            let day = days[cell.row][cell.column];
            if day == 0 {
                continue;
            }

            canvas.fill_color(Color::BLACK);
            canvas.text(
                REGULAR_FONT,
                DAY_NUMBER_FONT_SIZE,
                cell.x + TEXT_INSET,
                cell.y - DAY_NUMBER_OFFSET,
                &day.to_string(),
            );

            for run in cell_text_runs(buckets.lines(day), cell, self.colors, self.monochrome) {
                canvas.fill_color(run.color);
                canvas.text(REGULAR_FONT, EVENT_FONT_SIZE, run.x, run.y, &run.text);
            }
        }

        canvas.into_content()
    }

    fn write_document(&self, content: Content) -> CalGridResult<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font("Helvetica"));
        let bold_id = doc.add_object(font("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), self.page.width.into(), self.page.height.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Accumulates content stream operations.
#[derive(Default)]
struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    fn fill_color(&mut self, color: Color) {
        self.operations.push(Operation::new(
            "rg",
            vec![color.r.into(), color.g.into(), color.b.into()],
        ));
    }

    fn stroke_color(&mut self, color: Color) {
        self.operations.push(Operation::new(
            "RG",
            vec![color.r.into(), color.g.into(), color.b.into()],
        ));
    }

    fn rect(&mut self, cell: &CellGeometry) {
        self.operations.push(Operation::new(
            "re",
            vec![
                cell.x.into(),
                cell.bottom().into(),
                cell.width.into(),
                cell.height.into(),
            ],
        ));
        self.operations.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Text centered on `center_x` using the same width estimate as wrapping.
    fn centered_text(&mut self, font: &str, size: f32, center_x: f32, y: f32, text: &str) {
        let width = text_fit::estimated_width(text, size);
        self.text(font, size, center_x - width / 2.0, y, text);
    }

    fn into_content(self) -> Content {
        Content {
            operations: self.operations,
        }
    }
}

/// Encode text for the standard fonts; characters outside Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
