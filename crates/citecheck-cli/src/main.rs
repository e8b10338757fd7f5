use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use citecheck_core::config_file::{self, ConfigFile, InputsConfig};
use citecheck_core::{DocumentBackend, PlainTextBackend};
use citecheck_parsing::{AnalysisOptions, ParsingConfigBuilder};
use citecheck_pdf_mupdf::MupdfBackend;

mod output;
mod settings;

use output::ColorMode;
use settings::{EnvVars, Flags, Settings};

/// Citation checker - Reconcile the citations in a document against a source list
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a PDF or text document against a reference list
    Check {
        /// Path to the document (.pdf, or text with form-feed page breaks)
        document: Option<PathBuf>,

        /// Path to the reference list, one entry per line
        sources: Option<PathBuf>,

        /// Also extract and print the document's own bibliography
        #[arg(long)]
        bibliography: bool,

        /// Number of trailing pages searched for the references section
        #[arg(long)]
        window: Option<usize>,

        /// Minimum length of a kept bibliography entry
        #[arg(long)]
        min_entry_chars: Option<usize>,

        /// Report format: text, markdown or json
        #[arg(long)]
        format: Option<String>,

        /// Write the report to this file instead of the console
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Save the document and source list paths to the config file
        #[arg(long)]
        remember: bool,
    },

    /// Show the config file location and the merged configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Config => show_config(),
        Command::Check {
            document,
            sources,
            bibliography,
            window,
            min_entry_chars,
            format,
            output,
            no_color,
            remember,
        } => {
            let flags = Flags {
                document,
                sources,
                bibliography,
                window,
                min_entry_chars,
                format,
                output,
            };
            let settings =
                settings::resolve(flags, EnvVars::from_process(), &config_file::load_config())?;
            tracing::debug!(?settings, "resolved settings");
            if remember {
                remember_inputs(&settings)?;
            }
            check(&settings, no_color)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check(settings: &Settings, no_color: bool) -> anyhow::Result<()> {
    // Determine color mode: never color a report written to a file
    let color = ColorMode(!no_color && settings.output.is_none());
    let mut stdout = std::io::stdout();

    let parsing = ParsingConfigBuilder::new()
        .window_pages(settings.window_pages)
        .min_entry_chars(settings.min_entry_chars)
        .build()?;
    let options = AnalysisOptions {
        parsing,
        extract_bibliography: settings.extract_bibliography,
    };

    let backend = backend_for(&settings.document);
    let analysis = citecheck_parsing::run(
        &settings.document,
        &settings.sources,
        backend.as_ref(),
        &options,
    )?;

    output::print_input_summary(&mut stdout, &settings.document, &analysis, color)?;

    match &settings.output {
        Some(path) => {
            citecheck_reporting::export_report(&analysis, settings.format, path)?;
            output::print_saved(&mut stdout, path, color)?;
        }
        None if settings.format == citecheck_reporting::ReportFormat::Text => {
            output::print_report(&mut stdout, &analysis, color)?;
        }
        None => {
            let content = citecheck_reporting::render(&analysis, settings.format)?;
            writeln!(stdout, "{}", content)?;
        }
    }
    Ok(())
}

/// `.pdf` goes through MuPDF; anything else is read as plain text.
fn backend_for(document: &Path) -> Box<dyn DocumentBackend> {
    let is_pdf = document
        .extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        Box::new(MupdfBackend::new())
    } else {
        Box::new(PlainTextBackend::new())
    }
}

/// Store the resolved input paths in the platform config, keeping its other sections.
fn remember_inputs(settings: &Settings) -> anyhow::Result<()> {
    let path = config_file::config_path().context("could not determine config directory")?;
    let mut config = config_file::load_from_path(&path).unwrap_or_default();
    config.inputs = Some(InputsConfig {
        document: Some(absolute(&settings.document)),
        sources: Some(absolute(&settings.sources)),
    });
    let saved = config_file::save_config(&config)?;
    eprintln!("Paths saved to {} for future use.", saved.display());
    Ok(())
}

fn absolute(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn show_config() -> anyhow::Result<()> {
    match config_file::config_path() {
        Some(path) if path.exists() => println!("Platform config: {}", path.display()),
        Some(path) => println!("Platform config: {} (not present)", path.display()),
        None => println!("Platform config: no config directory on this platform"),
    }
    let local = Path::new(config_file::LOCAL_CONFIG_NAME);
    if local.exists() {
        println!("Local config:    {}", local.display());
    }

    let merged: ConfigFile = config_file::load_config();
    let rendered = toml::to_string_pretty(&merged).context("failed to render config")?;
    println!();
    if rendered.trim().is_empty() {
        println!("(no settings)");
    } else {
        print!("{}", rendered);
    }
    Ok(())
}
