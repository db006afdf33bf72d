use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calgrid_core::{CalendarPrinter, CalgridConfig, MonthPage, MonthRange, YearMonth};
use chrono::Utc;
use chrono_tz::Tz;
use owo_colors::OwoColorize;
use tracing::info;

use super::{DEFAULT_MONTHS_AHEAD, build_registry, expand_home, load_calendar, resolve_timezone};
use crate::render::Render;
use crate::utils::tui;

pub struct RenderArgs {
    pub ics: PathBuf,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
    pub timezone: Option<String>,
    pub monochrome: bool,
    pub output: Option<PathBuf>,
    pub colors: Vec<String>,
    pub seed: Option<u64>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let config = CalgridConfig::load()?;
    let tz = resolve_timezone(args.timezone.as_deref(), &config)?;
    let (from, to) = month_bounds(args.from, args.to, tz)?;

    let data = load_calendar(&args.ics, tz)?;
    let colors = build_registry(&data, args.seed.or(config.seed), &config, &args.colors)?;
    let monochrome = args.monochrome || config.monochrome;

    let output_dir = args
        .output
        .or_else(|| config.output_dir.clone())
        .map(|dir| expand_home(&dir))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Could not create {}", output_dir.display()))?;

    let printer = CalendarPrinter::new(&data, tz, &colors).monochrome(monochrome);
    let range = MonthRange::new(from, to);
    let total = range.clone().count();

    let progress = tui::create_progress_bar(total as u64);
    let mut written = Vec::with_capacity(total);
    for page in printer.render_range(range) {
        let page = page?;
        progress.set_message(page.identifier());
        let path = write_page(&output_dir, &page)?;
        info!(path = %path.display(), bytes = page.bytes.len(), "Wrote page");
        written.push(page);
        progress.inc(1);
    }
    progress.finish_and_clear();

    for page in &written {
        println!("{}", page.render());
    }
    println!(
        "\nPrinted {} {} ({}) to {}",
        written.len(),
        pluralize("month", written.len()),
        tz.name().dimmed(),
        output_dir.display()
    );

    Ok(())
}

/// The inclusive month range to print. Defaults to the current month in `tz`
/// through [`DEFAULT_MONTHS_AHEAD`] months after the first one.
fn month_bounds(
    from: Option<YearMonth>,
    to: Option<YearMonth>,
    tz: Tz,
) -> Result<(YearMonth, YearMonth)> {
    let from = match from {
        Some(month) => month,
        None => YearMonth::containing(Utc::now().with_timezone(&tz).date_naive())?,
    };
    let to = match to {
        Some(month) => month,
        None => from
            .plus_months(DEFAULT_MONTHS_AHEAD)
            .context("Default month range runs past the supported calendar")?,
    };

    if from > to {
        anyhow::bail!("--from {from} is after --to {to}");
    }

    Ok((from, to))
}

fn write_page(dir: &Path, page: &MonthPage) -> Result<PathBuf> {
    let path = dir.join(page.file_name());
    std::fs::write(&path, &page.bytes)
        .with_context(|| format!("Could not write {}", path.display()))?;
    Ok(path)
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
