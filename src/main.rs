mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use calgrid_core::YearMonth;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Print iCalendar files as month-grid PDF calendars")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG is honored otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one PDF page per month
    Render {
        /// The .ics file to print
        ics: PathBuf,

        /// First month (YYYY-MM, defaults to the current month)
        #[arg(long)]
        from: Option<YearMonth>,

        /// Last month, inclusive (YYYY-MM, defaults to 12 months after --from)
        #[arg(long)]
        to: Option<YearMonth>,

        /// IANA timezone events are placed in (e.g. "Europe/Berlin")
        #[arg(short, long)]
        timezone: Option<String>,

        /// Render all event text in black
        #[arg(long)]
        mono: bool,

        /// Directory the PDFs are written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Venue color override, e.g. --color "Room A=#FF0000" (repeatable)
        #[arg(short, long = "color", value_name = "VENUE=#RRGGBB")]
        colors: Vec<String>,

        /// Seed for default venue colors
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List venues and the colors they are printed in
    Venues {
        /// The .ics file to inspect
        ics: PathBuf,

        /// Seed for default venue colors
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the config file location
    Config {
        /// Write a commented default config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            ics,
            from,
            to,
            timezone,
            mono,
            output,
            colors,
            seed,
        } => commands::render::run(commands::render::RenderArgs {
            ics,
            from,
            to,
            timezone,
            monochrome: mono,
            output,
            colors,
            seed,
        }),
        Commands::Venues { ics, seed } => commands::venues::run(&ics, seed),
        Commands::Config { init } => commands::config::run(init),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
