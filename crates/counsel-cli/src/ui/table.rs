//! Shared table pane: one page of a searched, sorted collection.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::{
  app::View,
  listing::{self, Direction, ListState},
};

/// Render one collection view into `area`.
#[allow(clippy::too_many_arguments)]
pub fn draw<T>(
  f: &mut Frame,
  area: Rect,
  view: View,
  rows: &[T],
  list: &ListState,
  page_size: usize,
  search_active: bool,
  fields: impl Fn(&T) -> Vec<String>,
) {
  let page = listing::view(rows, list, page_size, &fields);

  let title = if list.search.is_empty() {
    format!(" {} ({}) ", view.title(), rows.len())
  } else {
    format!(" {} ({}/{}) ", view.title(), page.total_matches, rows.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Search bar at the bottom of the pane when a term is set or being typed.
  if (search_active || !list.search.is_empty()) && inner.height > 3 {
    let bar = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height -= 1;

    let text = if search_active {
      format!("/{}_", list.search)
    } else {
      format!("/{}", list.search)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      bar,
    );
  }

  // Pagination footer.
  if inner.height > 2 {
    let footer = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height -= 1;

    f.render_widget(
      Paragraph::new(format!(
        "Page {}/{}  ({} match{})",
        page.page + 1,
        page.total_pages,
        page.total_matches,
        if page.total_matches == 1 { "" } else { "es" },
      ))
      .style(Style::default().fg(Color::DarkGray)),
      footer,
    );
  }

  // Header row with sort indicators.
  let header = Row::new(
    view
      .columns()
      .iter()
      .enumerate()
      .map(|(i, name)| {
        let marker = match list.sort {
          Some((column, Direction::Ascending)) if column == i => " ▲",
          Some((column, Direction::Descending)) if column == i => " ▼",
          _ => "",
        };
        Cell::from(format!("{}{marker}", name))
      })
      .collect::<Vec<_>>(),
  )
  .style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let body = page
    .items
    .iter()
    .map(|row| Row::new(fields(row).into_iter().map(Cell::from).collect::<Vec<_>>()))
    .collect::<Vec<_>>();

  let count = view.columns().len().max(1) as u32;
  let widths =
    vec![Constraint::Ratio(1, count); view.columns().len()];

  f.render_widget(
    Table::new(body, widths).header(header).column_spacing(2),
    inner,
  );
}
