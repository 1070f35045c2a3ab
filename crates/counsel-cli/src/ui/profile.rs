//! Profile pane: the logged-in account's own record.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Profile ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(user) = &app.session else {
    return;
  };

  let role = if user.is_admin { "Administrator" } else { "Client" };
  let lines = vec![
    row("Name", &user.name),
    row("Email", &user.email),
    row("Contact", &user.contact),
    row("Role", role),
    row("Practice area", user.practice_area.as_str()),
    row("Member since", &user.created_at.format("%Y-%m-%d").to_string()),
    row("Last updated", &user.updated_at.format("%Y-%m-%d").to_string()),
  ];

  f.render_widget(Paragraph::new(lines), inner);
}

fn row(label: &str, value: &str) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:>14}  "),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(value.to_owned(), Style::default().fg(Color::White)),
  ])
}
