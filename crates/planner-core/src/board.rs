use tracing::debug;

use crate::day_view::tasks_for_day;
use crate::grid::{
  DayCell,
  MonthGrid
};
use crate::index::TaskIndex;
use crate::month::{
  WeekStart,
  YearMonth
};
use crate::preview::Preview;
use crate::task::Task;

/// A grid cell with the tasks dated on
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardCell<'g, 'a> {
  cell:  &'g DayCell,
  tasks: Vec<&'a Task>
}

impl<'g, 'a> BoardCell<'g, 'a> {
  pub fn cell(&self) -> &'g DayCell {
    self.cell
  }

  pub fn tasks(&self) -> &[&'a Task] {
    &self.tasks
  }

  pub fn task_count(&self) -> usize {
    self.tasks.len()
  }

  pub fn preview(
    &self,
    limit: usize
  ) -> Preview<'_, &'a Task> {
    Preview::new(&self.tasks, limit)
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct MonthStats {
  pub total:     usize,
  pub completed: usize,
  pub pending:   usize
}

impl MonthStats {
  fn push(&mut self, task: &Task) {
    self.total =
      self.total.saturating_add(1);
    if task.completed() {
      self.completed = self
        .completed
        .saturating_add(1);
    } else {
      self.pending =
        self.pending.saturating_add(1);
    }
  }
}

/// A month grid joined with a task
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBoard<'g, 'a> {
  month:      YearMonth,
  week_start: WeekStart,
  weeks:      Vec<Vec<BoardCell<'g, 'a>>>
}

impl<'g, 'a> MonthBoard<'g, 'a> {
  pub fn new(
    grid: &'g MonthGrid,
    index: &TaskIndex<'a>
  ) -> Self {
    let weeks = grid
      .weeks()
      .iter()
      .map(|week| {
        week
          .cells()
          .iter()
          .map(|cell| BoardCell {
            cell,
            tasks: tasks_for_day(
              index,
              cell.date()
            )
          })
          .collect::<Vec<_>>()
      })
      .collect::<Vec<_>>();

    let board = Self {
      month: grid.month(),
      week_start: grid.week_start(),
      weeks
    };
    debug!(
      month = %board.month,
      tasks = board.cells().map(BoardCell::task_count).sum::<usize>(),
      "joined grid with task index"
    );
    board
  }

  pub fn month(&self) -> YearMonth {
    self.month
  }

  pub fn week_start(&self) -> WeekStart {
    self.week_start
  }

  pub fn weeks(
    &self
  ) -> &[Vec<BoardCell<'g, 'a>>] {
    &self.weeks
  }

  pub fn cells(
    &self
  ) -> impl Iterator<Item = &BoardCell<'g, 'a>>
  {
    self.weeks.iter().flatten()
  }

  /// Tasks dated inside the reference
  /// month, chronologically. Padding
  /// days never contribute.
  pub fn month_tasks(&self) -> Vec<&'a Task> {
    self
      .cells()
      .filter(|entry| {
        entry.cell.in_current_month()
      })
      .flat_map(|entry| {
        entry.tasks.iter().copied()
      })
      .collect()
  }

  pub fn stats(&self) -> MonthStats {
    let mut stats = MonthStats::default();
    for task in self.month_tasks() {
      stats.push(task);
    }
    stats
  }
}
