//! Month pages: the pipeline entry point and its output artifact.

use chrono_tz::Tz;
use tracing::debug;

use crate::color::ColorRegistry;
use crate::day_index::DayBuckets;
use crate::error::CalGridResult;
use crate::event::CalendarData;
use crate::layout::{self, Grid, PageGeometry};
use crate::month::{MonthRange, YearMonth};
use crate::recurrence::collect_occurrences;
use crate::render::PageRenderer;

pub const MIME_TYPE: &str = "application/pdf";

/// One rendered month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPage {
    pub year: i32,
    pub month: u32,
    /// Complete single-page PDF document
    pub bytes: Vec<u8>,
}

impl MonthPage {
    /// `calendar_{year}-{month:02}`
    pub fn identifier(&self) -> String {
        format!("calendar_{}-{:02}", self.year, self.month)
    }

    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.identifier())
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }
}

/// Renders month pages for one session.
///
/// Holds the calendar and the color registry by reference, so every page of a
/// session uses the same venue colors.
#[derive(Debug, Clone)]
pub struct CalendarPrinter<'a> {
    data: &'a CalendarData,
    timezone: Tz,
    colors: &'a ColorRegistry,
    monochrome: bool,
    page: PageGeometry,
}

impl<'a> CalendarPrinter<'a> {
    pub fn new(data: &'a CalendarData, timezone: Tz, colors: &'a ColorRegistry) -> Self {
        CalendarPrinter {
            data,
            timezone,
            colors,
            monochrome: false,
            page: PageGeometry::default(),
        }
    }

    pub fn monochrome(mut self, monochrome: bool) -> Self {
        self.monochrome = monochrome;
        self
    }

    pub fn page_geometry(mut self, page: PageGeometry) -> Self {
        self.page = page;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Render one month. Fails as a whole if any event cannot be expanded.
    pub fn render_month(&self, month: YearMonth) -> CalGridResult<MonthPage> {
        let window = month.window(self.timezone);
        let occurrences = collect_occurrences(&self.data.events, &window)?;
        let buckets = DayBuckets::index(occurrences);

        // TODO: apply overrides once per-occurrence replacement semantics are settled
        debug!(
            month = %month,
            entries = buckets.len(),
            overrides = self.data.overrides.len(),
            "Laid out month"
        );

        let grid = Grid::layout(&self.page);
        let days = layout::day_matrix(month);
        let bytes = PageRenderer::new(self.page, self.colors, self.monochrome)
            .render(month, &days, &buckets, &grid)?;

        Ok(MonthPage {
            year: month.year(),
            month: month.month(),
            bytes,
        })
    }

    /// Render every month of `range` in order, lazily.
    pub fn render_range(
        &self,
        range: MonthRange,
    ) -> impl Iterator<Item = CalGridResult<MonthPage>> + '_ {
        range.map(move |month| self.render_month(month))
    }
}
