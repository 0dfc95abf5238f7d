pub mod board;
pub mod cli;
pub mod config;
pub mod datekey;
pub mod day_view;
pub mod error;
pub mod grid;
pub mod index;
pub mod locale;
pub mod month;
pub mod navigation;
pub mod preview;
pub mod render;
pub mod snapshot;
pub mod subject;
pub mod task;

use std::ffi::OsString;
use std::io::{
  self,
  Write
};

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use crate::board::{
  BoardCell,
  MonthBoard,
  MonthStats
};
pub use crate::datekey::DateKey;
pub use crate::day_view::{
  DayDetail,
  DayEntry,
  tasks_for_day
};
pub use crate::error::{
  PlannerError,
  PlannerResult
};
pub use crate::grid::{
  DayCell,
  MonthGrid,
  Week,
  build_grid_for,
  build_month_grid
};
pub use crate::index::TaskIndex;
pub use crate::locale::{
  DateFormatter,
  LocaleFormatter
};
pub use crate::month::{
  WeekStart,
  YearMonth
};
pub use crate::navigation::MonthCursor;
pub use crate::preview::Preview;
pub use crate::subject::{
  Subject,
  SubjectBook,
  SubjectDraft,
  SubjectId,
  Swatch
};
pub use crate::task::{
  Task,
  TaskDraft,
  TaskId
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting planner"
  );

  let mut out = io::stdout().lock();
  execute(&cli, &mut out)?;

  info!("done");
  Ok(())
}

/// Loads config and snapshot, then
/// prints the month and, when a day is
/// selected, its detail panel.
#[tracing::instrument(skip_all)]
pub fn execute<W: Write>(
  cli: &cli::GlobalCli,
  out: &mut W
) -> anyhow::Result<()> {
  let cfg = config::PlannerConfig::load(
    cli.config.as_deref()
  )?;

  let week_start = cli
    .week_start
    .unwrap_or_else(|| cfg.week_start());
  let locale_tag = cli
    .locale
    .as_deref()
    .unwrap_or(&cfg.locale);
  let formatter =
    LocaleFormatter::new(locale_tag)
      .with_context(|| {
        format!(
          "unsupported locale \
           {locale_tag}"
        )
      })?;
  let today = cli
    .today
    .as_ref()
    .map(DateKey::date)
    .unwrap_or_else(|| cfg.today());

  let snapshot =
    match cli.tasks.as_deref() {
      | Some(path) => {
        snapshot::Snapshot::load(path)?
      }
      | None => {
        debug!(
          "no snapshot given; showing \
           an empty month"
        );
        snapshot::Snapshot::default()
      }
    };
  let subjects = snapshot.subject_book();
  let index =
    TaskIndex::build(&snapshot.tasks);

  // `--month` wins; without it the month
  // of `--day`, then of today.
  let focus = cli
    .day
    .as_ref()
    .map(DateKey::date)
    .unwrap_or(today);
  let mut cursor = match cli.month {
    | Some(month) => MonthCursor::new(month),
    | None => {
      MonthCursor::starting_at(focus)?
    }
  };
  if let Some(day) = cli.day.as_ref() {
    cursor = cursor.select(day.date());
  }
  debug!(
    month = %cursor.month(),
    today = %today,
    week_start = %week_start,
    "resolved view"
  );

  let grid = build_grid_for(
    cursor.month(),
    today,
    week_start
  )
  .with_context(|| {
    format!(
      "failed to lay out {}",
      cursor.month()
    )
  })?;
  let board =
    MonthBoard::new(&grid, &index);

  let renderer =
    render::Renderer::from_config(
      &cfg,
      cli.no_color
    );
  renderer.write_month(
    out,
    &board,
    &subjects,
    &formatter
  )?;

  if let Some(date) = cursor.selected() {
    let detail = DayDetail::new(
      &index,
      &subjects,
      date,
      &formatter
    );
    writeln!(out)?;
    renderer.write_day(out, &detail)?;
  }

  Ok(())
}
