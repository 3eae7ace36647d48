use super::search::{draw_input_box, draw_search_results};
use super::util::{
  get_color, title_with_status, transport_button_areas, truncate_text, TRANSPORT_HEIGHT,
};
use crate::core::app::{ActiveBlock, App, TransportButton};
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Borders, Paragraph, Wrap},
  Frame,
};

pub const NO_TRACK_TEXT: &str = "Switch device player in the Spotify App!";

/// Screen regions of the playback view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackLayout {
  pub input: Rect,
  pub now_playing: Rect,
  pub search_results: Option<Rect>,
  pub transport: Rect,
  pub hints: Rect,
}

impl PlaybackLayout {
  pub fn new(area: Rect, show_search_results: bool) -> PlaybackLayout {
    let [input, main, transport, hints] = area.layout(&Layout::vertical([
      Constraint::Length(3),
      Constraint::Min(4),
      Constraint::Length(TRANSPORT_HEIGHT),
      Constraint::Length(1),
    ]));

    let (now_playing, search_results) = if show_search_results {
      let [now_playing, results] = main.layout(&Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
      ]));
      (now_playing, Some(results))
    } else {
      (main, None)
    };

    PlaybackLayout {
      input,
      now_playing,
      search_results,
      transport,
      hints,
    }
  }

  pub fn for_app(area: Rect, app: &App) -> PlaybackLayout {
    let show_results = !app.search_results.is_empty()
      || matches!(
        app.active_block,
        ActiveBlock::SearchInput | ActiveBlock::SearchResults
      );
    PlaybackLayout::new(area, show_results)
  }
}

pub fn draw_playback(f: &mut Frame<'_>, app: &App) {
  let layout = PlaybackLayout::for_app(f.area(), app);

  draw_input_box(f, app, layout.input);
  draw_now_playing(f, app, layout.now_playing);
  if let Some(results_area) = layout.search_results {
    draw_search_results(f, app, results_area);
  }
  draw_transport(f, app, layout.transport);
  draw_hints(f, app, layout.hints);
}

pub fn draw_now_playing(f: &mut Frame<'_>, app: &App, layout_chunk: Rect) {
  let theme = app.user_config.theme;

  let play_title = match (&app.current_track, app.is_paused) {
    (Some(_), false) => "Playing",
    (Some(_), true) => "Paused",
    (None, _) => "Not playing",
  };
  let title = format!(
    "{} ({} | {})",
    play_title,
    app.client_config.device_name,
    app.device_status.label()
  );

  let highlight_state = (app.active_block == ActiveBlock::Transport, false);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_type(BorderType::Rounded)
    .style(Style::default().bg(theme.playbar_background))
    .title(title_with_status(title, get_color(highlight_state, theme), app))
    .border_style(get_color(highlight_state, theme));

  let max_chars = app.client_config.truncate_length;
  let lines = match &app.current_track {
    Some(track) => {
      let cover = track.album_cover_url().unwrap_or("no album art");
      vec![
        Line::from(Span::styled(
          format!("Cover: {}", cover),
          Style::default().fg(theme.inactive),
        )),
        Line::from(""),
        Line::from(Span::styled(
          truncate_text(&track.artists_display(), max_chars),
          Style::default().fg(theme.playbar_text),
        )),
        Line::from(Span::styled(
          truncate_text(&track.name, max_chars),
          Style::default()
            .fg(theme.selected)
            .add_modifier(Modifier::BOLD),
        )),
      ]
    }
    None => vec![Line::from(Span::styled(
      NO_TRACK_TEXT,
      Style::default().fg(theme.hint),
    ))],
  };

  let paragraph = Paragraph::new(lines)
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
  f.render_widget(paragraph, layout_chunk);
}

pub fn toggle_icon(app: &App) -> &str {
  let behavior = &app.user_config.behavior;
  // The button shows what pressing it will do
  if app.is_paused || app.current_track.is_none() {
    &behavior.playing_icon
  } else {
    &behavior.paused_icon
  }
}

pub fn draw_transport(f: &mut Frame<'_>, app: &App, layout_chunk: Rect) {
  let theme = app.user_config.theme;
  let enabled = app.transport_enabled();
  let [previous_area, toggle_area, next_area] = transport_button_areas(layout_chunk);

  let buttons = [
    (
      TransportButton::Previous,
      previous_area,
      app.user_config.behavior.previous_icon.as_str(),
    ),
    (TransportButton::TogglePlay, toggle_area, toggle_icon(app)),
    (
      TransportButton::Next,
      next_area,
      app.user_config.behavior.next_icon.as_str(),
    ),
  ];

  for (button, area, icon) in buttons {
    let style = if enabled {
      get_color((false, app.hovered_button == Some(button)), theme)
        .fg(if app.hovered_button == Some(button) {
          theme.hovered
        } else {
          theme.text
        })
    } else {
      Style::default().fg(theme.inactive).bg(theme.background)
    };

    let widget = Paragraph::new(Span::styled(icon, style))
      .alignment(Alignment::Center)
      .block(
        Block::default()
          .borders(Borders::ALL)
          .border_type(BorderType::Rounded)
          .border_style(style),
      );
    f.render_widget(widget, area);
  }
}

fn draw_hints(f: &mut Frame<'_>, app: &App, layout_chunk: Rect) {
  let theme = app.user_config.theme;
  let keys = &app.user_config.keys;
  let hint = match app.active_block {
    ActiveBlock::UrlInput | ActiveBlock::SearchInput => {
      format!("enter submit | esc cancel | {} paste", keys.paste)
    }
    ActiveBlock::SearchResults => "up/down scroll | esc back".to_string(),
    ActiveBlock::Transport => format!(
      "{} prev | {} play/pause | {} next | {} play url | {} search | {} quit",
      keys.previous_track,
      keys.toggle_playback,
      keys.next_track,
      keys.play_url,
      keys.search,
      keys.back
    ),
  };
  let text = if app.is_loading {
    format!("Loading... | {}", hint)
  } else {
    hint
  };
  f.render_widget(
    Paragraph::new(Span::styled(text, Style::default().fg(theme.hint))),
    layout_chunk,
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::model::PlaybackState;
  use crate::infra::player::{DeviceEvent, PlaybackDevice};
  use crate::tui::ui::test_util::{buffer_text, render, style_at};
  use std::sync::Arc;

  struct IdleDevice;

  impl PlaybackDevice for IdleDevice {
    fn previous_track(&self) {}
    fn toggle_play(&self) {}
    fn next_track(&self) {}
    fn disconnect(&self) {}
  }

  fn playing_app(paused: bool) -> App {
    let mut app = App::default();
    app.set_token("abc".to_string());
    app.attach_device(Arc::new(IdleDevice));
    app.apply_device_event(DeviceEvent::Ready {
      device_id: "dev1".to_string(),
    });
    let track = serde_json::from_value(serde_json::json!({
      "name": "X",
      "artists": [{ "name": "Y" }],
      "album": { "images": [{ "url": "img" }] }
    }))
    .unwrap();
    app.apply_device_event(DeviceEvent::StateChanged(Some(PlaybackState::new(
      track, paused,
    ))));
    app
  }

  #[test]
  fn placeholder_without_track() {
    let app = App::default();
    let text = buffer_text(&render(80, 20, |f| draw_playback(f, &app)));
    assert!(text.contains(NO_TRACK_TEXT));
    assert!(text.contains("No device"));
  }

  #[test]
  fn renders_track_and_pause_button_while_playing() {
    let app = playing_app(false);
    let text = buffer_text(&render(80, 20, |f| draw_playback(f, &app)));

    assert!(text.contains("Cover: img"));
    assert!(text.contains("Playing (Web Playback Device | Active)"));
    assert_eq!(toggle_icon(&app), "⏸");
    assert!(text.contains('⏸'));
    assert!(!text.contains(NO_TRACK_TEXT));
  }

  #[test]
  fn shows_play_icon_while_paused() {
    let app = playing_app(true);
    assert_eq!(toggle_icon(&app), "▶");
  }

  #[test]
  fn truncates_long_names() {
    let mut app = playing_app(false);
    if let Some(track) = app.current_track.as_mut() {
      track.name = "A Very Long Song Title".to_string();
    }
    let text = buffer_text(&render(80, 20, |f| draw_playback(f, &app)));
    assert!(text.contains("A Very Long ..."));
    assert!(!text.contains("Song Title"));
  }

  #[test]
  fn search_results_split_the_main_area() {
    let area = Rect::new(0, 0, 80, 20);
    let plain = PlaybackLayout::new(area, false);
    assert!(plain.search_results.is_none());
    assert_eq!(plain.now_playing.width, 80);

    let split = PlaybackLayout::new(area, true);
    assert_eq!(split.now_playing.width + split.search_results.unwrap().width, 80);
    assert_eq!(split.transport, plain.transport);
  }

  #[test]
  fn errors_use_the_error_color() {
    let mut app = playing_app(false);
    let theme = app.user_config.theme;
    let draw = |app: &App| {
      render(80, 8, |f| {
        let area = f.area();
        draw_now_playing(f, app, area)
      })
    };

    app.handle_error(anyhow::anyhow!("Quota exceeded"));
    let error_style = style_at(&draw(&app), "Quota exceeded").unwrap();
    assert_eq!(error_style.fg, Some(theme.error_text));

    app.set_status_message("Logged in".to_string(), 3);
    let info_style = style_at(&draw(&app), "Logged in").unwrap();
    assert_ne!(info_style.fg, Some(theme.error_text));
  }
}
