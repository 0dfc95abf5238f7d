use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{
  debug,
  trace,
  warn
};

use crate::datekey::DateKey;
use crate::task::{
  Task,
  TaskId
};

#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
  ordinal: usize,
  task:    &'a Task
}

/// Tasks grouped by [`DateKey`].
///
/// Holds references into the caller's
/// collection. Every slot remembers the
/// position its task had in that
/// collection, so incremental updates
/// produce exactly what a rebuild would.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex<'a> {
  days:         HashMap<DateKey, Vec<Slot<'a>>>,
  locations:    HashMap<TaskId, Vec<(DateKey, usize)>>,
  next_ordinal: usize
}

impl<'a> TaskIndex<'a> {
  pub fn build<I>(tasks: I) -> Self
  where
    I: IntoIterator<Item = &'a Task>
  {
    let mut index = Self::default();
    for task in tasks {
      index.add(task);
    }
    debug!(
      tasks = index.len(),
      days = index.days.len(),
      "built task index"
    );
    index
  }

  /// Same as appending `task` to the
  /// collection and rebuilding.
  pub fn add(&mut self, task: &'a Task) {
    let ordinal = self.next_ordinal;
    self.next_ordinal += 1;

    let entry = self
      .locations
      .entry(task.id().clone())
      .or_default();
    if !entry.is_empty() {
      warn!(
        task = %task.id(),
        "task id indexed more than once"
      );
    }
    entry.push((task.date().clone(), ordinal));

    self.insert_slot(Slot { ordinal, task });
  }

  /// Drops every slot for `id`. Returns
  /// whether anything was indexed under
  /// it.
  pub fn remove(
    &mut self,
    id: &TaskId
  ) -> bool {
    let Some(locations) =
      self.locations.remove(id)
    else {
      trace!(task = %id, "remove of unindexed task");
      return false;
    };

    for (key, ordinal) in locations {
      self.remove_slot(&key, ordinal);
    }
    true
  }

  /// Replaces the task with the same id,
  /// keeping its position in the
  /// collection even when the date
  /// changes. Unknown ids are added.
  pub fn update(&mut self, task: &'a Task) {
    let Some(locations) =
      self.locations.remove(task.id())
    else {
      self.add(task);
      return;
    };

    let ordinal = locations
      .iter()
      .map(|(_, ordinal)| *ordinal)
      .min()
      .unwrap_or(self.next_ordinal);
    for (key, old) in locations {
      self.remove_slot(&key, old);
    }

    self.locations.insert(
      task.id().clone(),
      vec![(task.date().clone(), ordinal)]
    );
    self.insert_slot(Slot { ordinal, task });
  }

  /// Tasks dated `key`, in collection
  /// order. Empty when there are none.
  pub fn lookup(
    &self,
    key: &DateKey
  ) -> Vec<&'a Task> {
    self
      .days
      .get(key)
      .map(|slots| {
        slots
          .iter()
          .map(|slot| slot.task)
          .collect()
      })
      .unwrap_or_default()
  }

  pub fn lookup_date(
    &self,
    date: NaiveDate
  ) -> Vec<&'a Task> {
    match DateKey::from_date(date) {
      | Ok(key) => self.lookup(&key),
      | Err(_) => Vec::new()
    }
  }

  pub fn count(
    &self,
    key: &DateKey
  ) -> usize {
    self
      .days
      .get(key)
      .map(Vec::len)
      .unwrap_or(0)
  }

  pub fn contains(
    &self,
    id: &TaskId
  ) -> bool {
    self.locations.contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.days.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.days.is_empty()
  }

  /// Keys that have at least one task,
  /// ascending.
  pub fn days(&self) -> Vec<&DateKey> {
    let mut keys: Vec<&DateKey> =
      self.days.keys().collect();
    keys.sort();
    keys
  }

  /// Tasks dated `from..=to`, day by day
  /// and in collection order within a
  /// day.
  pub fn tasks_between(
    &self,
    from: NaiveDate,
    to: NaiveDate
  ) -> Vec<&'a Task> {
    from
      .iter_days()
      .take_while(|day| *day <= to)
      .flat_map(|day| self.lookup_date(day))
      .collect()
  }

  fn insert_slot(&mut self, slot: Slot<'a>) {
    let group = self
      .days
      .entry(slot.task.date().clone())
      .or_default();
    let pos = group.partition_point(
      |existing| {
        existing.ordinal < slot.ordinal
      }
    );
    group.insert(pos, slot);
  }

  fn remove_slot(
    &mut self,
    key: &DateKey,
    ordinal: usize
  ) {
    let emptied =
      match self.days.get_mut(key) {
        | Some(group) => {
          group.retain(|slot| {
            slot.ordinal != ordinal
          });
          group.is_empty()
        }
        | None => false
      };
    if emptied {
      self.days.remove(key);
    }
  }
}
