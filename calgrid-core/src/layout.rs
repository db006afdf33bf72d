//! Month grid geometry.
//!
//! Coordinates follow PDF conventions: points, origin at the bottom-left of
//! the page, y growing upwards.

use chrono::Datelike;

use crate::month::YearMonth;

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;
pub const CELLS: usize = COLUMNS * ROWS;

pub const POINTS_PER_INCH: f32 = 72.0;

/// ISO A4 in landscape orientation, in points
pub const A4_LANDSCAPE: (f32, f32) = (841.89, 595.28);

/// Day numbers of a month; rows are weeks starting on Sunday, 0 = no day.
pub type DayMatrix = [[u32; COLUMNS]; ROWS];

/// Page size and the fixed bands around the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub title_band: f32,
    pub weekday_band: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            width: A4_LANDSCAPE.0,
            height: A4_LANDSCAPE.1,
            margin: 0.5 * POINTS_PER_INCH,
            title_band: 0.5 * POINTS_PER_INCH,
            weekday_band: 0.3 * POINTS_PER_INCH,
        }
    }
}

impl PageGeometry {
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.margin - self.title_band - self.weekday_band
    }

    /// Baseline-independent center of the title band
    pub fn title_center_y(&self) -> f32 {
        self.height - self.margin - self.title_band / 2.0
    }

    pub fn weekday_center_y(&self) -> f32 {
        self.height - self.margin - self.title_band - self.weekday_band / 2.0
    }

    /// Top edge of the first grid row
    pub fn grid_top(&self) -> f32 {
        self.height - self.margin - self.title_band - self.weekday_band
    }
}

/// Position and size of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub column: usize,
    pub row: usize,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellGeometry {
    pub fn bottom(&self) -> f32 {
        self.y - self.height
    }
}

/// The 6×7 cells of a month page, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<CellGeometry>,
    column_widths: [f32; COLUMNS],
}

impl Grid {
    /// Compute the cell geometry for `page`. Independent of the month shown.
    pub fn layout(page: &PageGeometry) -> Self {
        let usable_width = page.usable_width();
        let column_width = usable_width / COLUMNS as f32;
        let row_height = page.usable_height() / ROWS as f32;

        let mut column_widths = [column_width; COLUMNS];
        let others: f32 = column_widths[..COLUMNS - 1].iter().sum();
        column_widths[COLUMNS - 1] = usable_width - others;

        let mut column_x = [page.margin; COLUMNS];
        for column in 1..COLUMNS {
            column_x[column] = column_x[column - 1] + column_widths[column - 1];
        }

        let top = page.grid_top();
        let cells = (0..ROWS)
            .flat_map(|row| {
                (0..COLUMNS).map(move |column| CellGeometry {
                    column,
                    row,
                    x: column_x[column],
                    y: top - row as f32 * row_height,
                    width: column_widths[column],
                    height: row_height,
                })
            })
            .collect();

        Grid {
            cells,
            column_widths,
        }
    }

    pub fn cells(&self) -> &[CellGeometry] {
        &self.cells
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellGeometry> {
        if row >= ROWS || column >= COLUMNS {
            return None;
        }
        self.cells.get(row * COLUMNS + column)
    }

    pub fn column_widths(&self) -> &[f32; COLUMNS] {
        &self.column_widths
    }

    /// Horizontal center of a column
    pub fn column_center(&self, column: usize) -> f32 {
        self.cells
            .get(column)
            .map_or(0.0, |cell| cell.x + cell.width / 2.0)
    }
}

/// Lay out the days of `month` in weeks starting on Sunday.
///
/// Always six rows; cells before the first and after the last day are 0.
pub fn day_matrix(month: YearMonth) -> DayMatrix {
    let mut matrix = [[0; COLUMNS]; ROWS];
    let leading = month.first_day().weekday().num_days_from_sunday() as usize;

    for day in 1..=month.days_in_month() {
        let index = leading + day as usize - 1;
        matrix[index / COLUMNS][index % COLUMNS] = day;
    }

    matrix
}
