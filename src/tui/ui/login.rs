use super::util::{get_color, title_with_status};
use crate::core::app::App;
use ratatui::{
  layout::{Alignment, Constraint, Flex, Layout},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Borders, Paragraph, Wrap},
  Frame,
};

pub fn draw_login(f: &mut Frame<'_>, app: &App) {
  let theme = app.user_config.theme;
  let keys = &app.user_config.keys;

  let [area] = f
    .area()
    .layout(&Layout::vertical([Constraint::Length(9)]).flex(Flex::Center));
  let [area] = area.layout(&Layout::horizontal([Constraint::Max(64)]).flex(Flex::Center));

  let loading = if app.is_loading { "Checking for a session..." } else { "" };
  let lines = vec![
    Line::from(Span::styled(
      "No Spotify session yet.",
      Style::default().fg(theme.banner).add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from(vec![
      Span::styled(format!("[{}] ", keys.open_login), Style::default().fg(theme.hint)),
      Span::styled("open ", Style::default().fg(theme.text)),
      Span::styled(app.client_config.login_url(), Style::default().fg(theme.active)),
    ]),
    Line::from(vec![
      Span::styled(format!("[{}] ", keys.refresh_token), Style::default().fg(theme.hint)),
      Span::styled("check again after logging in", Style::default().fg(theme.text)),
    ]),
    Line::from(vec![
      Span::styled(format!("[{}] ", keys.back), Style::default().fg(theme.hint)),
      Span::styled("quit", Style::default().fg(theme.text)),
    ]),
    Line::from(Span::styled(loading, Style::default().fg(theme.inactive))),
  ];

  let block = Block::default()
    .borders(Borders::ALL)
    .border_type(BorderType::Rounded)
    .style(theme.base_style())
    .title(title_with_status(
      "Login with Spotify".to_string(),
      get_color((true, false), theme),
      app,
    ))
    .border_style(get_color((true, false), theme));

  let login = Paragraph::new(lines)
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
  f.render_widget(login, area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tui::ui::test_util::{buffer_text, render};

  #[test]
  fn shows_login_url_and_hints() {
    let app = App::default();
    let text = buffer_text(&render(80, 20, |f| draw_login(f, &app)));

    assert!(text.contains("Login with Spotify"));
    assert!(text.contains("http://localhost:5000/auth/login"));
    assert!(text.contains("[o] open"));
    assert!(text.contains("[r] check again"));
  }
}
