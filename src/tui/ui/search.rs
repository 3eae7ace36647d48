use super::util::get_color;
use crate::core::app::{ActiveBlock, App};
use ratatui::{
  layout::Rect,
  style::{Modifier, Style},
  text::{Line, Span, Text},
  widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
  Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_input_box(f: &mut Frame<'_>, app: &App, layout_chunk: Rect) {
  let theme = app.user_config.theme;
  let keys = &app.user_config.keys;

  let (title, is_active) = match app.active_block {
    ActiveBlock::UrlInput => ("Play track URL", true),
    ActiveBlock::SearchInput => ("Search", true),
    ActiveBlock::Transport | ActiveBlock::SearchResults => ("Input", false),
  };
  let highlight_state = (is_active, false);

  let border_type = if app.is_loading {
    BorderType::Double
  } else {
    BorderType::Rounded
  };

  let input_string = app.input_string();
  let text = if is_active {
    Text::from(input_string.clone())
  } else {
    Text::from(Span::styled(
      format!(
        "Press {} to play a track URL or {} to search",
        keys.play_url, keys.search
      ),
      Style::default().fg(theme.inactive),
    ))
  };

  // Keep the cursor visible inside the borders
  let inner_width = layout_chunk.width.saturating_sub(2);
  let cursor_column: String = app
    .input
    .iter()
    .take(app.input_cursor_position)
    .collect();
  let cursor_offset = u16::try_from(cursor_column.width()).unwrap_or(u16::MAX);
  let scroll_offset = if inner_width > 0 && cursor_offset >= inner_width {
    (cursor_offset - inner_width).saturating_add(1)
  } else {
    0
  };

  let input = Paragraph::new(text).scroll((0, scroll_offset)).block(
    Block::default()
      .borders(Borders::ALL)
      .border_type(border_type)
      .title(Span::styled(title, get_color(highlight_state, theme)))
      .style(theme.base_style())
      .border_style(get_color(highlight_state, theme)),
  );
  f.render_widget(input, layout_chunk);

  if is_active {
    f.set_cursor_position((
      layout_chunk
        .x
        .saturating_add(1)
        .saturating_add(cursor_offset - scroll_offset),
      layout_chunk.y.saturating_add(1),
    ));
  }
}

pub fn draw_search_results(f: &mut Frame<'_>, app: &App, layout_chunk: Rect) {
  let theme = app.user_config.theme;
  let highlight_state = (app.active_block == ActiveBlock::SearchResults, false);

  let items: Vec<ListItem> = if app.search_results.is_empty() {
    let placeholder = if app.is_loading {
      "Searching..."
    } else {
      "No results"
    };
    vec![ListItem::new(Span::styled(
      placeholder,
      Style::default().fg(theme.inactive),
    ))]
  } else {
    app
      .search_results
      .iter()
      .map(|item| ListItem::new(Line::from(item.label())))
      .collect()
  };

  let mut state = ListState::default();
  if !app.search_results.is_empty() {
    state.select(app.selected_search_index);
  }

  let title = format!("Results ({})", app.search_results.len());
  let list = List::new(items)
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(title, get_color(highlight_state, theme)))
        .border_style(get_color(highlight_state, theme)),
    )
    .style(theme.base_style())
    .highlight_style(get_color(highlight_state, theme).add_modifier(Modifier::BOLD))
    .highlight_symbol(Line::from("▶ ").style(get_color(highlight_state, theme)));
  f.render_stateful_widget(list, layout_chunk, &mut state);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::model::SearchResultItem;
  use crate::tui::ui::test_util::{buffer_text, render};
  use serde_json::json;

  #[test]
  fn input_box_shows_hint_until_focused() {
    let mut app = App::default();
    let text = buffer_text(&render(60, 3, |f| {
      let area = f.area();
      draw_input_box(f, &app, area)
    }));
    assert!(text.contains("Press u to play a track URL or / to search"));

    app.focus_input(ActiveBlock::UrlInput);
    app.insert_input("https://open.spotify.com");
    let text = buffer_text(&render(60, 3, |f| {
      let area = f.area();
      draw_input_box(f, &app, area)
    }));
    assert!(text.contains("Play track URL"));
    assert!(text.contains("https://open.spotify.com"));
  }

  #[test]
  fn input_box_scrolls_to_a_very_long_paste() {
    let mut app = App::default();
    app.focus_input(ActiveBlock::SearchInput);
    app.insert_input(&"x".repeat(70_000));

    let text = buffer_text(&render(40, 3, |f| {
      let area = f.area();
      draw_input_box(f, &app, area)
    }));
    assert!(text.contains("Search"));
    assert!(text.contains(&"x".repeat(30)));
  }

  #[test]
  fn lists_result_labels() {
    let mut app = App::default();
    app.active_block = ActiveBlock::SearchResults;
    app.set_search_results(vec![
      SearchResultItem(json!({ "name": "One More Time", "artists": [{ "name": "Daft Punk" }] })),
      SearchResultItem(json!({ "name": "Aerodynamic" })),
    ]);

    let text = buffer_text(&render(50, 8, |f| {
      let area = f.area();
      draw_search_results(f, &app, area)
    }));
    assert!(text.contains("Results (2)"));
    assert!(text.contains("One More Time - Daft Punk"));
    assert!(text.contains("Aerodynamic"));
  }

  #[test]
  fn empty_results_show_placeholder() {
    let app = App::default();
    let text = buffer_text(&render(30, 5, |f| {
      let area = f.area();
      draw_search_results(f, &app, area)
    }));
    assert!(text.contains("No results"));
  }
}
