//! Display truncation ("first K, then +N more").
//!
//! This sits on top of the aggregation layer and never changes what a day
//! contains, only how much of it is shown.

/// Tasks shown in a grid cell when no limit is configured.
pub const DEFAULT_PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview<'p, T> {
    shown: &'p [T],
    total: usize,
}

impl<'p, T> Preview<'p, T> {
    pub fn new(items: &'p [T], limit: usize) -> Self {
        let shown = &items[..items.len().min(limit)];
        Self { shown, total: items.len() }
    }

    pub fn shown(&self) -> &'p [T] {
        self.shown
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `total - limit` when something is hidden, else `None`.
    pub fn overflow(&self) -> Option<usize> {
        let hidden = self.total - self.shown.len();
        (hidden > 0).then_some(hidden)
    }
}
