use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[macro_use]
mod ui;
mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "droidloc",
    version,
    about = "Consolidate Android string resources, find translation gaps and fill them"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export the consolidated string table to a timestamped CSV or XLSX file
    Export {
        /// Module root directory (defaults to module_root from droidloc.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Directory the export file is written into
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Output format: csv or xlsx
        #[arg(long)]
        format: Option<String>,
        /// Label for the Module column (defaults to the root directory name)
        #[arg(long)]
        module_name: Option<String>,
    },
    /// List strings present in the default locale but missing elsewhere
    Gaps {
        /// Module root directory (defaults to module_root from droidloc.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
        /// Write the JSON report to a file instead of stdout
        #[arg(long)]
        out_json: Option<PathBuf>,
    },
    /// Machine-translate missing strings and write them back into the locale documents
    Translate {
        /// Module root directory (defaults to module_root from droidloc.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Google Cloud project id (v3 API, paired with DROIDLOC_ACCESS_TOKEN)
        #[arg(long)]
        project_id: Option<String>,
        /// Google Cloud location, defaults to "global"
        #[arg(long)]
        location: Option<String>,
        /// API key for the v2 API (or DROIDLOC_API_KEY)
        #[arg(long, conflicts_with = "project_id")]
        api_key: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Plan the batch without contacting the service or writing files
        #[arg(long)]
        dry_run: bool,
        /// Copy each document to <name>.xml.bak before the first write
        #[arg(long)]
        backup: bool,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let name = match &self {
            Commands::Export { .. } => "export",
            Commands::Gaps { .. } => "gaps",
            Commands::Translate { .. } => "translate",
        };
        info!("▶ Starting command: {name}");
        let result = match self {
            Commands::Export {
                root,
                out_dir,
                format,
                module_name,
            } => commands::export::run_export(root, out_dir, format, module_name),
            Commands::Gaps {
                root,
                format,
                out_json,
            } => commands::gaps::run_gaps(root, &format, out_json, use_color),
            Commands::Translate {
                root,
                project_id,
                location,
                api_key,
                yes,
                dry_run,
                backup,
            } => commands::translate::run_translate(
                root, project_id, location, api_key, yes, dry_run, backup,
            ),
        };
        match &result {
            Ok(()) => info!("✔ Finished command: {name}"),
            Err(err) => error!("✖ Command {name} failed: {err:?}"),
        }
        result
    }
}

fn init_tracing() -> WorkerGuard {
    let file_appender = rolling::daily("logs", "droidloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();
    let use_color = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();

    cli.command.run(use_color)
}
