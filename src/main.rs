mod cli;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use milbase::discharge::{self, ServiceType};
use milbase::paths::{self, DATA_DIR_ENV};
use milbase::store::Store;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{dashboard, memo, play, tips, vacation, Ctx};

#[derive(Debug, Parser)]
#[command(name = "milbase", version, about = "Personal service dashboard: discharge countdown, memos, vacation and games")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Directory holding milbase.json
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Seed for games and ids, for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true, hide = true)]
    today: Option<NaiveDate>,

    /// Verbose logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Welcome line, discharge progress, next vacation and activity counts
    Status,
    /// Run the discharge calculator
    Discharge {
        /// Enlistment date; defaults to the profile's
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Service type; defaults to the profile's
        #[arg(long)]
        service: Option<ServiceType>,
        /// Store the date and service type in the profile
        #[arg(long, requires = "date")]
        save: bool,
    },
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        cmd: Option<dashboard::ProfileCmd>,
    },
    /// Show or change settings
    Settings(dashboard::SettingsArgs),
    /// Memo pad
    Memo {
        #[command(subcommand)]
        cmd: memo::MemoCmd,
    },
    /// Service-life tips
    Tips {
        #[command(subcommand)]
        cmd: tips::TipsCmd,
    },
    /// Vacation planner
    Vacation {
        #[command(subcommand)]
        cmd: vacation::VacationCmd,
    },
    /// Play a mini-game
    Play {
        game: play::Game,
    },
    /// Game statistics and achievements
    Stats,
    /// Write the profile document to a JSON file
    Export { path: PathBuf },
    /// Deep-merge a JSON file into the profile document
    Import { path: PathBuf },
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let root = paths::data_root(args.data_dir).context("resolving data directory")?;
    let store = Store::open_in_dir(&root).with_context(|| format!("opening store in {}", root.display()))?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = args.today.unwrap_or_else(discharge::today);
    debug!(data_dir = %root.display(), %today, "starting");

    let mut ctx = Ctx { store, today, rng };
    match args.cmd {
        Command::Status => dashboard::status(&ctx),
        Command::Discharge { date, service, save } => dashboard::discharge(&mut ctx, date, service, save),
        Command::Profile { cmd } => dashboard::profile(&mut ctx, cmd),
        Command::Settings(settings) => dashboard::settings(&mut ctx, settings),
        Command::Memo { cmd } => memo::run(&mut ctx, cmd),
        Command::Tips { cmd } => tips::run(&mut ctx, cmd),
        Command::Vacation { cmd } => vacation::run(&mut ctx, cmd),
        Command::Play { game } => play::run(&mut ctx, game),
        Command::Stats => dashboard::stats(&ctx),
        Command::Export { path } => dashboard::export(&ctx, &path),
        Command::Import { path } => dashboard::import(&mut ctx, &path),
    }
}
