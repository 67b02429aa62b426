mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lanemark", version, about = "Collision-free label layout for timeline lanes")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a catalog and list every problem found.
    Check {
        catalog: PathBuf,
        /// Keep running and re-check every time the file is saved.
        #[arg(long)]
        watch: bool,
    },
    /// Lay out every lane of a catalog and print the placements as JSON.
    Layout {
        catalog: PathBuf,
        /// JSON file overriding layout constants.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only lay out this lane (`"Track::Sub track"`).
        #[arg(long)]
        lane: Option<String>,
        #[arg(long)]
        pretty: bool,
        /// Exit with status 2 if any label had to overlap another.
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { catalog, watch } => commands::check(&catalog, watch),
        Command::Layout {
            catalog,
            config,
            lane,
            pretty,
            strict,
        } => commands::layout(&commands::LayoutArgs {
            catalog,
            config,
            lane,
            pretty,
            strict,
        }),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
