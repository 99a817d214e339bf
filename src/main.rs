use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sambat_ipo::{
    AnnouncementBlock, BS_MONTH_NAMES, Diagnostic, ExtractedRecord, ExtractionPipeline,
    ExtractorConfig, ISO_DATE_FORMAT, IpoRow, lengths_for, parse_phrase, tabulated_years, to_ad,
    year_length,
};

#[derive(Parser)]
#[command(
    name = "sambat",
    version,
    about = "Bikram Sambat dates and IPO announcement extraction"
)]
struct Cli {
    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML file with extractor settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one BS date phrase, e.g. "28th Magh 2081"
    Convert {
        phrase: Vec<String>,
    },
    /// Extract issue windows from announcements, one per line
    Extract {
        /// Input file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Print the tabulated month lengths
    Table,
    /// Print the notifications due on a day for an extract report
    Due {
        /// Day to check, YYYY-MM-DD
        #[arg(long)]
        today: NaiveDate,
        /// Report file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    scraped_at: String,
    count:      usize,
    ipos:       Vec<IpoRow>,
    skipped:    Vec<Skipped>,
}

#[derive(Serialize)]
struct Skipped {
    index:   usize,
    company: Option<String>,
    stage:   String,
    phrase:  Option<String>,
    error:   String,
}

impl From<Diagnostic> for Skipped {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            index:   diagnostic.index,
            company: diagnostic.company,
            stage:   diagnostic.stage.to_string(),
            phrase:  diagnostic.phrase,
            error:   diagnostic.error.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct StoredReport {
    ipos: Vec<IpoRow>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "sambat_ipo=info"
    } else {
        "sambat_ipo=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => ExtractorConfig::load(path)?,
        None => ExtractorConfig::default(),
    };

    match cli.command {
        Command::Convert { phrase } => run_convert(&phrase.join(" ")),
        Command::Extract { input } => run_extract(config, &input),
        Command::Table => {
            run_table();
            Ok(())
        },
        Command::Due { today, input } => run_due(today, &input),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn run_convert(phrase: &str) -> Result<()> {
    let date = parse_phrase(phrase).with_context(|| format!("cannot parse {phrase:?}"))?;
    let converted = to_ad(date)?;
    let precision = if converted.is_exact() {
        "exact"
    } else {
        "approximate"
    };
    println!("{date} = {converted} ({precision})");
    Ok(())
}

fn run_extract(config: ExtractorConfig, input: &Path) -> Result<()> {
    let blocks: Vec<AnnouncementBlock> = read_input(input)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(AnnouncementBlock::new)
        .collect();

    let report = ExtractionPipeline::new(config).run_with_diagnostics(&blocks);
    let ipos: Vec<IpoRow> = report.records.iter().map(ExtractedRecord::to_row).collect();
    let output = Report {
        scraped_at: Utc::now().to_rfc3339(),
        count: ipos.len(),
        ipos,
        skipped: report.diagnostics.into_iter().map(Skipped::from).collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_table() {
    println!("{:<6} {}", "year", BS_MONTH_NAMES.join(" "));
    for year in tabulated_years() {
        let Some(lengths) = lengths_for(year) else {
            continue;
        };
        let cells: Vec<String> = lengths
            .iter()
            .zip(BS_MONTH_NAMES)
            .map(|(len, name)| format!("{len:>width$}", width = name.len()))
            .collect();
        println!(
            "{year:<6} {}  = {}",
            cells.join(" "),
            year_length(year).unwrap_or_default()
        );
    }
}

fn run_due(today: NaiveDate, input: &Path) -> Result<()> {
    let report: StoredReport =
        serde_json::from_str(&read_input(input)?).context("not an extract report")?;

    for row in &report.ipos {
        let window = match row.window() {
            Ok(window) => window,
            Err(e) => {
                warn!(company = %row.company, error = %e, "skipping row");
                continue;
            },
        };
        if let Some(trigger) = window.trigger_on(today) {
            println!(
                "{}: {} ({} to {})",
                row.company,
                trigger,
                window.start().format(ISO_DATE_FORMAT),
                window.end().format(ISO_DATE_FORMAT)
            );
        }
    }
    Ok(())
}
