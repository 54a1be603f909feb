use anyhow::Context;
use clap::Parser;
use pfrepair::RunOptions;
use pfrepair_core::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pfrepair",
    version,
    about = "Repair malformed actor records in Pathfinder 1e pack files"
)]
struct Cli {
    /// Input folder.
    #[arg(long, default_value = "packages")]
    packages: PathBuf,

    /// Output folder (created if missing).
    #[arg(long = "packages-processed", default_value = "packages_processed")]
    packages_processed: PathBuf,

    /// Search for pack files recursively.
    #[arg(long)]
    recursive: bool,

    /// Copy each input to <output>.bak before writing.
    #[arg(long)]
    backup: bool,

    /// Write per-file reports into <output folder>/_reports/.
    #[arg(long)]
    reports: bool,

    /// Only patch documents with type == "npc".
    #[arg(long)]
    only_npc: bool,

    /// Process every pack file, not just the configured allow-list.
    #[arg(long)]
    all_files: bool,

    /// Process only this file (relative to --packages). Repeatable.
    #[arg(long = "file", value_name = "NAME")]
    files: Vec<String>,

    /// Refuse to overwrite existing output files.
    #[arg(long)]
    no_clobber: bool,

    /// Deduplicate item/action identifiers in every processed file.
    #[arg(long)]
    identifiers_all: bool,

    /// Configuration file (default: ./pfrepair.toml when present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(long)]
    debug: bool,

    /// Write logs to FILE instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            packages: self.packages.clone(),
            packages_processed: self.packages_processed.clone(),
            recursive: self.recursive,
            backup: self.backup,
            reports: self.reports,
            only_npc: self.only_npc,
            all_files: self.all_files,
            files: self.files.clone(),
            no_clobber: self.no_clobber,
            identifiers_all: self.identifiers_all,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match init_tracing(&cli).and_then(|()| repair(&cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn repair(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    pfrepair::run(&config, &cli.run_options(), &mut stdout.lock())?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
            tracing::info!(log = %path.display(), "pfrepair log started");
        }
        None => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init(),
    }
    Ok(())
}
