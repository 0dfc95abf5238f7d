use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::datekey::DateKey;
use crate::month::{WeekStart, YearMonth};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "planner",
    version,
    about = "Month planner: task calendar for the terminal",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Config file; falls back to $PLANNER_CONFIG, then the user config dir.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// JSON snapshot with `subjects` and `tasks`.
    #[arg(long = "tasks")]
    pub tasks: Option<PathBuf>,

    /// Month to show, `YYYY-MM` or any `YYYY-MM-DD` inside it.
    #[arg(long = "month", value_parser = parse_month)]
    pub month: Option<YearMonth>,

    /// Pretend today is this date.
    #[arg(long = "today", value_parser = parse_day)]
    pub today: Option<DateKey>,

    /// Also print the detail panel for this date.
    #[arg(long = "day", value_parser = parse_day)]
    pub day: Option<DateKey>,

    /// 0-6 (0 = Sunday) or a weekday name.
    #[arg(long = "week-start", value_parser = parse_week_start)]
    pub week_start: Option<WeekStart>,

    #[arg(long = "locale")]
    pub locale: Option<String>,

    #[arg(long = "no-color")]
    pub no_color: bool,
}

fn parse_month(raw: &str) -> Result<YearMonth, String> {
    YearMonth::parse(raw).map_err(|err| err.to_string())
}

fn parse_day(raw: &str) -> Result<DateKey, String> {
    DateKey::parse(raw).map_err(|err| err.to_string())
}

fn parse_week_start(raw: &str) -> Result<WeekStart, String> {
    WeekStart::parse(raw).map_err(|err| err.to_string())
}

pub const LOG_ENV: &str = "PLANNER_LOG";

/// Library spans at the chosen level; dependencies stay at `warn`
/// unless `-q` silences them further.
fn default_directive(verbose: u8, quiet: u8) -> String {
    let level = match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) => "warn",
        (0, 3..) => "trace",
        (0, 2) => "debug",
        (0, 1) => "info",
        (0, 0) => "warn",
    };
    let floor = if quiet >= 2 { "error" } else { "warn" };
    format!("{floor},planner_core={level},planner={level}")
}

/// `PLANNER_LOG` wins over `RUST_LOG`; both override `-v`/`-q`.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let directive = default_directive(verbose, quiet);
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(&directive))
        .map_err(|e| anyhow!("invalid {LOG_ENV} filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbose >= 2)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "planner logging already installed");
    }

    Ok(())
}
