//! TUI rendering — orchestrates all panes.

pub mod login;
pub mod profile;
pub mod table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{
  App, Screen, View, document_columns, inquiry_columns,
  own_document_columns, user_columns,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Login => login::draw(f, rows[1], app),
    Screen::Main => draw_body(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  // Tab strip for the main screen, plain banner for login.
  let mut spans = vec![Span::styled(
    " counsel ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for (i, view) in app.views.iter().enumerate() {
    let style = if i == app.active {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(format!(" {} ", view.title()), style));
    spans.push(Span::raw(" "));
  }

  let left_width: usize = spans.iter().map(|s| s.content.len()).sum();
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );
  let pad = area
    .width
    .saturating_sub(left_width as u16)
    .saturating_sub(right.content.len() as u16);
  spans.push(Span::raw(" ".repeat(pad as usize)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let Some(view) = app.active_view() else { return };
  let page_size = app.page_size();

  match view {
    View::Clients => table::draw(
      f,
      area,
      view,
      app.clients.rows(),
      &app.clients_list,
      page_size,
      app.search_active,
      user_columns,
    ),
    View::Documents => table::draw(
      f,
      area,
      view,
      app.documents.rows(),
      &app.documents_list,
      page_size,
      app.search_active,
      document_columns,
    ),
    View::Inquiries => table::draw(
      f,
      area,
      view,
      app.inquiries.rows(),
      &app.inquiries_list,
      page_size,
      app.search_active,
      inquiry_columns,
    ),
    View::MyDocuments => table::draw(
      f,
      area,
      view,
      app.my_documents.rows(),
      &app.my_documents_list,
      page_size,
      app.search_active,
      own_document_columns,
    ),
    View::Profile => profile::draw(f, area, app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::Login => (
      "LOGIN",
      "Type credentials  Tab switch field  Enter sign in  Esc quit",
    ),
    Screen::Main if app.search_active => {
      ("SEARCH", "Type to filter  Esc clear  Enter done")
    }
    Screen::Main if app.active_view() == Some(View::Profile) => {
      ("PROFILE", "Tab views  o sign out  q quit")
    }
    Screen::Main => (
      "NORMAL",
      "Tab views  / search  1-9 sort  ←→ page  r refresh  o sign out  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
