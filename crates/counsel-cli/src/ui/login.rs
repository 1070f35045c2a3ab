//! Login pane: email and password inputs.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, LoginField};

/// Render the login form centered in `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let form = centered(area, 46, 8);

  let block = Block::default()
    .title(" Sign in ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(form);
  f.render_widget(block, form);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Length(2),
      Constraint::Length(1),
      Constraint::Length(2),
    ])
    .split(inner);

  f.render_widget(field_label("Email", app.login.focus == LoginField::Email), rows[0]);
  f.render_widget(
    field_value(&app.login.email, app.login.focus == LoginField::Email),
    rows[1],
  );
  f.render_widget(
    field_label("Password", app.login.focus == LoginField::Password),
    rows[2],
  );
  let masked = "•".repeat(app.login.password.chars().count());
  f.render_widget(
    field_value(&masked, app.login.focus == LoginField::Password),
    rows[3],
  );
}

fn field_label(label: &str, focused: bool) -> Paragraph<'_> {
  let style = if focused {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  Paragraph::new(Line::from(Span::styled(label, style)))
}

fn field_value(value: &str, focused: bool) -> Paragraph<'static> {
  let text = if focused {
    format!("{value}_")
  } else {
    value.to_owned()
  };
  Paragraph::new(text).style(Style::default().fg(Color::White))
}

/// A fixed-size rectangle centered within `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x:      area.x + (area.width - width) / 2,
    y:      area.y + (area.height - height) / 2,
    width,
    height,
  }
}
