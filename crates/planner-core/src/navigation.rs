use chrono::NaiveDate;
use tracing::debug;

use crate::error::PlannerResult;
use crate::month::YearMonth;

/// Which month is on screen and which day,
/// if any, is open in the detail panel.
///
/// Every move returns a new cursor; callers
/// keep the state.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub struct MonthCursor {
  month:    YearMonth,
  selected: Option<NaiveDate>
}

impl MonthCursor {
  pub fn new(month: YearMonth) -> Self {
    Self {
      month,
      selected: None
    }
  }

  /// Starts on the month of `today`.
  pub fn starting_at(
    today: NaiveDate
  ) -> PlannerResult<Self> {
    Ok(Self::new(YearMonth::of(today)?))
  }

  pub fn month(&self) -> YearMonth {
    self.month
  }

  pub fn selected(
    &self
  ) -> Option<NaiveDate> {
    self.selected
  }

  /// Leaving a month keeps the selection;
  /// the detail panel stays open like the
  /// navbar arrows do.
  pub fn previous(
    self
  ) -> PlannerResult<Self> {
    Ok(Self {
      month: self.month.previous()?,
      ..self
    })
  }

  pub fn next(self) -> PlannerResult<Self> {
    Ok(Self {
      month: self.month.next()?,
      ..self
    })
  }

  pub fn jump_to(
    self,
    date: NaiveDate
  ) -> PlannerResult<Self> {
    Ok(Self {
      month: YearMonth::of(date)?,
      ..self
    })
  }

  /// Opens `date` in the detail panel.
  /// The month on screen stays put, even
  /// for a padding day.
  pub fn select(
    self,
    date: NaiveDate
  ) -> Self {
    debug!(%date, month = %self.month, "selected day");
    Self {
      selected: Some(date),
      ..self
    }
  }

  pub fn clear_selection(self) -> Self {
    Self {
      selected: None,
      ..self
    }
  }
}
