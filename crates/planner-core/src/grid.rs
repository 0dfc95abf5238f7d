use chrono::NaiveDate;
use tracing::debug;

use crate::datekey::DateKey;
use crate::error::{
  PlannerError,
  PlannerResult
};
use crate::month::{
  WeekStart,
  YearMonth
};

pub const DAYS_PER_WEEK: usize = 7;

/// One date of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
  date:             NaiveDate,
  key:              DateKey,
  in_current_month: bool,
  is_today:         bool
}

impl DayCell {
  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub fn key(&self) -> &DateKey {
    &self.key
  }

  pub fn in_current_month(
    &self
  ) -> bool {
    self.in_current_month
  }

  pub fn is_today(&self) -> bool {
    self.is_today
  }
}

/// Seven consecutive cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
  cells: Vec<DayCell>
}

impl Week {
  pub fn cells(&self) -> &[DayCell] {
    &self.cells
  }

  pub fn get(
    &self,
    column: usize
  ) -> Option<&DayCell> {
    self.cells.get(column)
  }

  pub fn first_day(&self) -> NaiveDate {
    self
      .cells
      .first()
      .map(DayCell::date)
      .unwrap_or(NaiveDate::MIN)
  }

  pub fn last_day(&self) -> NaiveDate {
    self
      .cells
      .last()
      .map(DayCell::date)
      .unwrap_or(NaiveDate::MIN)
  }
}

/// Full weeks covering one month,
/// padded with days of the adjacent
/// months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
  month:      YearMonth,
  week_start: WeekStart,
  weeks:      Vec<Week>
}

impl MonthGrid {
  pub fn month(&self) -> YearMonth {
    self.month
  }

  pub fn week_start(&self) -> WeekStart {
    self.week_start
  }

  pub fn weeks(&self) -> &[Week] {
    &self.weeks
  }

  pub fn week_count(&self) -> usize {
    self.weeks.len()
  }

  pub fn len(&self) -> usize {
    self.weeks.len() * DAYS_PER_WEEK
  }

  pub fn is_empty(&self) -> bool {
    self.weeks.is_empty()
  }

  pub fn cells(
    &self
  ) -> impl Iterator<Item = &DayCell> {
    self
      .weeks
      .iter()
      .flat_map(|week| week.cells.iter())
  }

  pub fn first_day(&self) -> NaiveDate {
    self
      .weeks
      .first()
      .map(Week::first_day)
      .unwrap_or(NaiveDate::MIN)
  }

  pub fn last_day(&self) -> NaiveDate {
    self
      .weeks
      .last()
      .map(Week::last_day)
      .unwrap_or(NaiveDate::MIN)
  }

  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    !self.is_empty()
      && date >= self.first_day()
      && date <= self.last_day()
  }

  pub fn cell(
    &self,
    date: NaiveDate
  ) -> Option<&DayCell> {
    if !self.contains(date) {
      return None;
    }
    let offset = (date
      - self.first_day())
    .num_days() as usize;
    self.cells().nth(offset)
  }

  pub fn today(&self) -> Option<&DayCell> {
    self.cells().find(|cell| cell.is_today)
  }

  /// Resolves a click on `row`/`column`
  /// to the date it shows. What happens
  /// next is up to the caller.
  pub fn activate(
    &self,
    row: usize,
    column: usize
  ) -> Option<NaiveDate> {
    let date = self
      .weeks
      .get(row)?
      .get(column)?
      .date;
    debug!(row, column, %date, "day cell activated");
    Some(date)
  }
}

/// Builds the grid for the month
/// containing `reference`.
pub fn build_month_grid(
  reference: NaiveDate,
  now: NaiveDate,
  week_start: WeekStart
) -> PlannerResult<MonthGrid> {
  let month = YearMonth::of(reference)?;
  build_grid_for(month, now, week_start)
}

pub fn build_grid_for(
  month: YearMonth,
  now: NaiveDate,
  week_start: WeekStart
) -> PlannerResult<MonthGrid> {
  let month_start = month.first_day();
  let month_end = month.last_day()?;
  let grid_start =
    week_start.start_of_week(month_start)?;
  let grid_end =
    week_start.end_of_week(month_end)?;

  // A `now` without a key cannot match
  // any cell.
  let today = DateKey::from_date(now).ok();

  let cells = grid_start
    .iter_days()
    .take_while(|day| *day <= grid_end)
    .map(|date| {
      let key = DateKey::from_date(date)?;
      Ok(DayCell {
        in_current_month: month
          .contains(date),
        is_today: today.as_ref()
          == Some(&key),
        date,
        key
      })
    })
    .collect::<PlannerResult<Vec<_>>>()?;

  if cells.len() % DAYS_PER_WEEK != 0 {
    return Err(PlannerError::out_of_range(
      format!(
        "grid for {month} ends at the \
         edge of the calendar"
      )
    ));
  }

  let weeks = cells
    .chunks(DAYS_PER_WEEK)
    .map(|chunk| Week {
      cells: chunk.to_vec()
    })
    .collect::<Vec<_>>();

  debug!(
    month = %month,
    week_start = %week_start,
    grid_start = %grid_start,
    grid_end = %grid_end,
    weeks = weeks.len(),
    "built month grid"
  );

  Ok(MonthGrid {
    month,
    week_start,
    weeks
  })
}
