//! JCMP command-line interface.
//!
//! Reads JSON records from files, standard input or inline text, compares
//! every record against the first one, and prints the highlighted result.
//! With `--store` the records accumulate across runs in a JSON file.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use jcmp::{
    format_comparison, read_records, summarize, CompareConfig, FileStore, IngestError, MemoryStore,
    OutputFormat, OutputOptions, RecordStore, Session, Source,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// JCMP - compare JSON records against a baseline
///
/// The first record is the baseline. Every field of every other record is
/// marked as matching it, differing from it, or unknown to it. A file holding
/// a JSON array contributes each element as a separate record.
#[derive(Parser)]
#[command(name = "jcmp")]
#[command(version)]
#[command(about = "Compare JSON records against a baseline", long_about = None)]
struct Cli {
    /// Files to read records from, in order ("-" reads standard input)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Inline JSON text to read records from (repeatable, not combinable with files)
    #[arg(short = 't', long = "text", value_name = "JSON")]
    texts: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Hide comparand fields that match the baseline
    #[arg(long)]
    hide_matches: bool,

    /// Show full values instead of previews
    #[arg(long)]
    show_values: bool,

    /// Maximum length for displayed values
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Ignore whitespace differences in strings
    #[arg(long)]
    ignore_whitespace: bool,

    /// Accumulate records in this JSON file across runs
    #[arg(long, value_name = "PATH", env = "JCMP_STORE")]
    store: Option<PathBuf>,

    /// Start a new comparison, discarding stored records
    #[arg(long)]
    new: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress the summary line)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// Plain text with markers (no colors)
    Plain,
    /// JSON representation
    Json,
    /// HTML fragment with inline styles
    Html,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Plain => OutputFormat::Plain,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Html => OutputFormat::Html,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(2);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let sources = collect_sources(&cli)?;

    let config = CompareConfig {
        ignore_whitespace: cli.ignore_whitespace,
    };

    let annotated = match &cli.store {
        Some(path) => {
            let store = FileStore::new(path);
            let session = Session::open(store)?;
            accumulate(session, &sources, cli.new)?.compare(&config)
        }
        None => accumulate(Session::open(MemoryStore::new())?, &sources, false)?.compare(&config),
    };

    tracing::debug!(records = annotated.len(), "formatting output");

    let output_options = OutputOptions {
        hide_matches: cli.hide_matches,
        show_values: cli.show_values,
        max_value_length: cli.max_value_length,
    };

    let output_format: OutputFormat = cli.format.into();
    let output = format_comparison(&annotated, &output_format, &output_options)?;

    if cli.quiet {
        for line in output.lines() {
            if !line.starts_with("Summary:") {
                println!("{}", line);
            }
        }
    } else {
        println!("{}", output);
    }

    if summarize(&annotated).is_consistent() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Turns the command line inputs into sources, rejecting text mixed with files.
fn collect_sources(cli: &Cli) -> Result<Vec<Source>> {
    if !cli.texts.is_empty() && !cli.files.is_empty() {
        return Err(IngestError::AmbiguousInput.into());
    }
    if cli.texts.is_empty() && cli.files.is_empty() && cli.store.is_none() {
        return Err(IngestError::NoInput.into());
    }

    let texts = cli
        .texts
        .iter()
        .map(|text| Source::resolve(Some(text.clone()), None));
    let files = cli
        .files
        .iter()
        .map(|file| Source::resolve(None, Some(file.clone())));

    Ok(texts.chain(files).collect::<Result<Vec<_>, _>>()?)
}

/// Parses every source before touching the session, so a failing source adds nothing.
fn accumulate<S: RecordStore>(
    mut session: Session<S>,
    sources: &[Source],
    start_new: bool,
) -> Result<Session<S>> {
    let mut incoming = Vec::new();
    for source in sources {
        let records = read_records(source)?;
        tracing::info!(origin = %source.origin(), count = records.len(), "read records");
        incoming.extend(records);
    }

    if start_new {
        session.clear()?;
    }
    if !incoming.is_empty() {
        session.add_records(incoming)?;
    }

    Ok(session)
}
