use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use sqlprism::{GeneratorOptions, generate_with_options, parse_with_diagnostics};

#[derive(Parser)]
#[command(name = "sqlprism")]
#[command(version, about = "Convert PostgreSQL DDL into a Prisma schema")]
struct Cli {
    /// SQL file to convert (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Datasource provider written to the header
    #[arg(long, default_value = "postgresql")]
    provider: String,

    /// Environment variable holding the database URL
    #[arg(long, default_value = "DATABASE_URL")]
    url_env: String,

    /// Log skipped statements and pass summaries
    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let tag = match record.level() {
                Level::Error => "error",
                Level::Warn => "warning",
                Level::Info => "info",
                Level::Debug | Level::Trace => "debug",
            };
            eprintln!("{}: {}", tag, record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(level: LevelFilter) -> Result<()> {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
        .map_err(|e| anyhow!("Failed to install logger: {e}"))
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    init_logger(level)?;

    let input = read_input(cli.input.as_ref())?;
    let (schema, diagnostics) = parse_with_diagnostics(&input);

    if schema.is_empty() {
        bail!(
            "no valid CREATE TABLE or CREATE TYPE definitions found ({} statements skipped)",
            diagnostics.len()
        );
    }

    let options = GeneratorOptions {
        datasource_provider: cli.provider,
        url_env: cli.url_env,
        ..Default::default()
    };
    let prisma = generate_with_options(&schema, &options);

    match cli.output {
        Some(path) => fs::write(&path, &prisma)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", prisma),
    }

    Ok(())
}
