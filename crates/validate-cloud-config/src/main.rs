mod hints;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cloud_config_validation::{Report, validate, validate_user_data};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use render::{FileReport, render_json, render_plain, render_text};

/// Some input has findings or does not parse.
const EXIT_FINDINGS: i32 = 1;
/// An input could not be read.
const EXIT_IO: i32 = 2;

/// Validate cloud-config user data
#[derive(Parser, Debug)]
#[command(name = "validate-cloud-config", version)]
#[command(about = "Validate cloud-config documents before they reach a host", long_about = None)]
struct Args {
    /// Documents to validate; `-` reads standard input
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Validate as cloud-config without checking the user-data header
    #[arg(long)]
    raw: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Source snippets with hints
    Text,
    /// One line per finding
    Plain,
    Json,
}

/// A validated input.
struct Checked {
    name: String,
    source: String,
    report: Report,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_FINDINGS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_IO);
        }
    }
}

/// Validate every input and print the reports. Returns whether all inputs
/// were clean.
fn run() -> Result<bool> {
    let args = Args::parse();
    let color = !args.no_color && io::stdout().is_terminal();

    let mut checked = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let input = read_input(path)?;
        let report = if args.raw {
            validate(&input)
        } else {
            validate_user_data(&input)
        }
        .unwrap_or_else(|e| e.into_report());
        tracing::debug!(file = %path.display(), entries = report.len(), "validated");

        checked.push(Checked {
            name: display_name(path),
            source: String::from_utf8_lossy(&input).into_owned(),
            report,
        });
    }

    match args.format {
        Format::Text => {
            for file in &checked {
                let text = render_text(&file.name, &file.source, &file.report, color)
                    .with_context(|| format!("Failed to render report for {}", file.name))?;
                print!("{}", text);
            }
        }
        Format::Plain => {
            for file in &checked {
                print!("{}", render_plain(&file.name, &file.report));
            }
        }
        Format::Json => {
            let files: Vec<FileReport<'_>> = checked
                .iter()
                .map(|file| FileReport {
                    file: &file.name,
                    entries: &file.report,
                })
                .collect();
            println!("{}", render_json(&files).context("Failed to serialize reports")?);
        }
    }

    Ok(checked.iter().all(|file| file.report.is_empty()))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut input = Vec::new();
        io::stdin()
            .read_to_end(&mut input)
            .context("Failed to read standard input")?;
        Ok(input)
    } else {
        fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
    }
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}
