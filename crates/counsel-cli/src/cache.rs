//! Per-collection snapshot cache.
//!
//! Reads serve from the snapshot until a mutating call invalidates it; the
//! next read refetches. No TTL, no background refresh.

/// A cached snapshot of one collection.
#[derive(Debug)]
pub struct Snapshot<T> {
  rows: Option<Vec<T>>,
}

impl<T> Default for Snapshot<T> {
  fn default() -> Self {
    Self { rows: None }
  }
}

impl<T> Snapshot<T> {
  /// Rows, if the snapshot is current.
  pub fn get(&self) -> Option<&[T]> {
    self.rows.as_deref()
  }

  pub fn rows(&self) -> &[T] {
    self.rows.as_deref().unwrap_or_default()
  }

  pub fn is_stale(&self) -> bool {
    self.rows.is_none()
  }

  pub fn fill(&mut self, rows: Vec<T>) {
    self.rows = Some(rows);
  }

  /// Drop the snapshot; called after every mutating API call.
  pub fn invalidate(&mut self) {
    self.rows = None;
  }
}
