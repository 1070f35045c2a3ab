//! List interaction shared by every table view: search, then sort, then
//! paginate, recomputed from the full snapshot on every state change.
//!
//! All three stages are pure functions over borrowed rows; the widgets only
//! ever see the current page.

// ─── Sort direction ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ascending,
  Descending,
}

impl Direction {
  pub fn toggled(self) -> Self {
    match self {
      Direction::Ascending => Direction::Descending,
      Direction::Descending => Direction::Ascending,
    }
  }
}

// ─── Interaction state ───────────────────────────────────────────────────────

/// Search term, sort choice, and page index for one table view.
#[derive(Debug, Clone, Default)]
pub struct ListState {
  pub search: String,
  /// Column index and direction; `None` keeps snapshot order.
  pub sort:   Option<(usize, Direction)>,
  pub page:   usize,
}

impl ListState {
  /// Replace the search term. Any edit jumps back to the first page.
  pub fn set_search(&mut self, term: impl Into<String>) {
    self.search = term.into();
    self.page = 0;
  }

  /// Sort by `column`: a repeat press reverses direction, a different
  /// column starts over ascending.
  pub fn toggle_sort(&mut self, column: usize) {
    self.sort = Some(match self.sort {
      Some((current, direction)) if current == column => {
        (column, direction.toggled())
      }
      _ => (column, Direction::Ascending),
    });
  }

  pub fn next_page(&mut self) {
    self.page += 1;
  }

  pub fn prev_page(&mut self) {
    self.page = self.page.saturating_sub(1);
  }
}

// ─── Page size ───────────────────────────────────────────────────────────────

/// Rows per page from the viewport width, by coarse breakpoint.
pub fn page_size(width: u16) -> usize {
  if width < 80 {
    3
  } else if width < 120 {
    4
  } else {
    5
  }
}

// ─── View computation ────────────────────────────────────────────────────────

/// One rendered page plus the figures the pagination footer needs.
#[derive(Debug)]
pub struct Page<'a, T> {
  pub items:         Vec<&'a T>,
  /// Clamped page index; may be smaller than the requested one.
  pub page:          usize,
  pub total_pages:   usize,
  /// Match count after the search stage, before slicing.
  pub total_matches: usize,
}

/// Run the full pipeline for `rows`. `fields` stringifies one row into its
/// displayed columns; both search and sort operate on those strings.
pub fn view<'a, T>(
  rows: &'a [T],
  state: &ListState,
  page_size: usize,
  fields: impl Fn(&T) -> Vec<String>,
) -> Page<'a, T> {
  // Search: case-insensitive substring over every column. An empty term
  // keeps all rows in snapshot order.
  let term = state.search.to_lowercase();
  let mut matched: Vec<&T> = rows
    .iter()
    .filter(|row| {
      term.is_empty()
        || fields(row)
          .iter()
          .any(|field| field.to_lowercase().contains(&term))
    })
    .collect();

  // Sort: stable, so equal keys keep their snapshot order.
  if let Some((column, direction)) = state.sort {
    matched.sort_by(|a, b| {
      let ka = fields(a).get(column).cloned().unwrap_or_default();
      let kb = fields(b).get(column).cloned().unwrap_or_default();
      let ordering = ka.to_lowercase().cmp(&kb.to_lowercase());
      match direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
      }
    });
  }

  // Paginate: clamp the requested page so data is never hidden past the
  // end, then slice.
  let total_matches = matched.len();
  let total_pages = total_matches.div_ceil(page_size).max(1);
  let page = state.page.min(total_pages - 1);
  let items = matched
    .into_iter()
    .skip(page * page_size)
    .take(page_size)
    .collect();

  Page { items, page, total_pages, total_matches }
}
