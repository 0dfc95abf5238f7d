use chrono::NaiveDate;

use crate::index::TaskIndex;
use crate::locale::DateFormatter;
use crate::preview::Preview;
use crate::subject::{
  Subject,
  SubjectBook
};
use crate::task::Task;

/// Tasks of a single day.
///
/// Grid cells and the day-detail panel
/// both go through here so they can
/// never disagree about a date.
pub fn tasks_for_day<'a>(
  index: &TaskIndex<'a>,
  date: NaiveDate
) -> Vec<&'a Task> {
  index.lookup_date(date)
}

/// A task with its subject resolved.
/// `subject` is `None` both for tasks
/// without one and for dangling ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayEntry<'a> {
  pub task:    &'a Task,
  pub subject: Option<&'a Subject>
}

/// Everything the day-detail panel
/// shows for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDetail<'a> {
  date:    NaiveDate,
  heading: String,
  entries: Vec<DayEntry<'a>>
}

impl<'a> DayDetail<'a> {
  pub fn new(
    index: &TaskIndex<'a>,
    subjects: &'a SubjectBook,
    date: NaiveDate,
    formatter: &dyn DateFormatter
  ) -> Self {
    let entries = tasks_for_day(index, date)
      .into_iter()
      .map(|task| DayEntry {
        task,
        subject: subjects.resolve_subject(
          task.subject_id()
        )
      })
      .collect();

    Self {
      date,
      heading: formatter.day_heading(date),
      entries
    }
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub fn heading(&self) -> &str {
    &self.heading
  }

  pub fn entries(&self) -> &[DayEntry<'a>] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn completed_count(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|entry| entry.task.completed())
      .count()
  }

  pub fn preview(
    &self,
    limit: usize
  ) -> Preview<'_, DayEntry<'a>> {
    Preview::new(&self.entries, limit)
  }
}
