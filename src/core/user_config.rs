use crate::core::config::app_config_dir;
use crate::tui::event::Key;
use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

const FILE_NAME: &str = "config.yml";

#[derive(Default, Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UserTheme {
  pub active: Option<String>,
  pub banner: Option<String>,
  pub error_text: Option<String>,
  pub hint: Option<String>,
  pub hovered: Option<String>,
  pub inactive: Option<String>,
  pub playbar_background: Option<String>,
  pub playbar_text: Option<String>,
  pub selected: Option<String>,
  pub text: Option<String>,
  pub background: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Theme {
  pub active: Color,
  pub banner: Color,
  pub error_text: Color,
  pub hint: Color,
  pub hovered: Color,
  pub inactive: Color,
  pub playbar_background: Color,
  pub playbar_text: Color,
  pub selected: Color,
  pub text: Color,
  pub background: Color,
}

impl Theme {
  pub fn base_style(&self) -> Style {
    Style::default().fg(self.text).bg(self.background)
  }
}

impl Default for Theme {
  fn default() -> Self {
    // RGB rather than named ANSI colors, terminal themes remap the latter
    Theme {
      active: Color::Rgb(0, 180, 180),
      banner: Color::Rgb(30, 215, 96),
      error_text: Color::Rgb(255, 100, 100),
      hint: Color::Rgb(200, 200, 0),
      hovered: Color::Rgb(180, 0, 180),
      inactive: Color::Rgb(128, 128, 128),
      playbar_background: Color::Rgb(20, 20, 20),
      playbar_text: Color::Reset,
      selected: Color::Rgb(0, 200, 200),
      text: Color::Reset,
      background: Color::Reset,
    }
  }
}

fn parse_key(key: String) -> Result<Key> {
  fn get_single_char(string: &str) -> Result<char> {
    string
      .chars()
      .next()
      .ok_or_else(|| anyhow!("Missing character in shortcut"))
  }

  match key.chars().count() {
    1 => Ok(Key::Char(get_single_char(key.as_str())?)),
    _ => {
      let sections: Vec<&str> = key.split('-').collect();

      if sections.len() > 2 {
        return Err(anyhow!(
          "Shortcut can only have 2 keys, \"{}\" has {}",
          key,
          sections.len()
        ));
      }

      match sections[0].to_lowercase().as_str() {
        "ctrl" => Ok(Key::Ctrl(get_single_char(sections.get(1).unwrap_or(&""))?)),
        "alt" => Ok(Key::Alt(get_single_char(sections.get(1).unwrap_or(&""))?)),
        "left" => Ok(Key::Left),
        "right" => Ok(Key::Right),
        "up" => Ok(Key::Up),
        "down" => Ok(Key::Down),
        "backspace" | "delete" => Ok(Key::Backspace),
        "del" => Ok(Key::Delete),
        "esc" | "escape" => Ok(Key::Esc),
        "enter" | "return" => Ok(Key::Enter),
        "tab" => Ok(Key::Tab),
        "home" => Ok(Key::Home),
        "end" => Ok(Key::End),
        "pageup" => Ok(Key::PageUp),
        "pagedown" => Ok(Key::PageDown),
        "space" => Ok(Key::Char(' ')),
        _ => Err(anyhow!("The key \"{}\" is unknown.", sections[0])),
      }
    }
  }
}

fn check_reserved_keys(key: Key) -> Result<()> {
  let reserved = [
    Key::Ctrl('c'),
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Backspace,
    Key::Enter,
    Key::Esc,
    Key::Tab,
  ];
  if reserved.contains(&key) {
    return Err(anyhow!(
      "The key {:?} is reserved and cannot be remapped",
      key
    ));
  }
  Ok(())
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyBindingsString {
  back: Option<String>,
  toggle_playback: Option<String>,
  next_track: Option<String>,
  previous_track: Option<String>,
  search: Option<String>,
  play_url: Option<String>,
  refresh_token: Option<String>,
  open_login: Option<String>,
  paste: Option<String>,
}

#[derive(Clone, Debug)]
pub struct KeyBindings {
  pub back: Key,
  pub toggle_playback: Key,
  pub next_track: Key,
  pub previous_track: Key,
  pub search: Key,
  pub play_url: Key,
  pub refresh_token: Key,
  pub open_login: Key,
  pub paste: Key,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfigString {
  pub tick_rate_milliseconds: Option<u64>,
  pub playing_icon: Option<String>,
  pub paused_icon: Option<String>,
  pub previous_icon: Option<String>,
  pub next_icon: Option<String>,
  pub set_window_title: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct BehaviorConfig {
  pub tick_rate_milliseconds: u64,
  pub playing_icon: String,
  pub paused_icon: String,
  pub previous_icon: String,
  pub next_icon: String,
  pub set_window_title: bool,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserConfigString {
  keybindings: Option<KeyBindingsString>,
  behavior: Option<BehaviorConfigString>,
  theme: Option<UserTheme>,
}

#[derive(Clone, Debug)]
pub struct UserConfig {
  pub keys: KeyBindings,
  pub theme: Theme,
  pub behavior: BehaviorConfig,
  pub path_to_config: Option<PathBuf>,
}

impl Default for UserConfig {
  fn default() -> Self {
    UserConfig::new()
  }
}

impl UserConfig {
  pub fn new() -> UserConfig {
    UserConfig {
      theme: Default::default(),
      keys: KeyBindings {
        back: Key::Char('q'),
        toggle_playback: Key::Char(' '),
        next_track: Key::Char('n'),
        previous_track: Key::Char('p'),
        search: Key::Char('/'),
        play_url: Key::Char('u'),
        refresh_token: Key::Char('r'),
        open_login: Key::Char('o'),
        paste: Key::Ctrl('v'),
      },
      behavior: BehaviorConfig {
        tick_rate_milliseconds: 250,
        playing_icon: "▶".to_string(),
        paused_icon: "⏸".to_string(),
        previous_icon: "⏮".to_string(),
        next_icon: "⏭".to_string(),
        set_window_title: true,
      },
      path_to_config: None,
    }
  }

  pub fn get_or_build_paths(&mut self) -> Result<PathBuf> {
    if let Some(path) = &self.path_to_config {
      return Ok(path.clone());
    }
    let path = app_config_dir()?.join(FILE_NAME);
    self.path_to_config = Some(path.clone());
    Ok(path)
  }

  pub fn load_keybindings(&mut self, keybindings: KeyBindingsString) -> Result<()> {
    macro_rules! to_keys {
      ($name: ident) => {
        if let Some(key_string) = keybindings.$name {
          let key = parse_key(key_string)?;
          check_reserved_keys(key)?;
          self.keys.$name = key;
        }
      };
    }

    to_keys!(back);
    to_keys!(toggle_playback);
    to_keys!(next_track);
    to_keys!(previous_track);
    to_keys!(search);
    to_keys!(play_url);
    to_keys!(refresh_token);
    to_keys!(open_login);
    to_keys!(paste);

    Ok(())
  }

  pub fn load_theme(&mut self, theme: UserTheme) -> Result<()> {
    macro_rules! to_theme_item {
      ($name: ident) => {
        if let Some(theme_item) = theme.$name {
          self.theme.$name = parse_theme_item(&theme_item)?;
        }
      };
    }

    to_theme_item!(active);
    to_theme_item!(banner);
    to_theme_item!(error_text);
    to_theme_item!(hint);
    to_theme_item!(hovered);
    to_theme_item!(inactive);
    to_theme_item!(playbar_background);
    to_theme_item!(playbar_text);
    to_theme_item!(selected);
    to_theme_item!(text);
    to_theme_item!(background);
    Ok(())
  }

  pub fn load_behaviorconfig(&mut self, behavior_config: BehaviorConfigString) -> Result<()> {
    if let Some(tick_rate) = behavior_config.tick_rate_milliseconds {
      self.set_tick_rate(tick_rate)?;
    }

    if let Some(playing_icon) = behavior_config.playing_icon {
      self.behavior.playing_icon = playing_icon;
    }

    if let Some(paused_icon) = behavior_config.paused_icon {
      self.behavior.paused_icon = paused_icon;
    }

    if let Some(previous_icon) = behavior_config.previous_icon {
      self.behavior.previous_icon = previous_icon;
    }

    if let Some(next_icon) = behavior_config.next_icon {
      self.behavior.next_icon = next_icon;
    }

    if let Some(set_window_title) = behavior_config.set_window_title {
      self.behavior.set_window_title = set_window_title;
    }

    Ok(())
  }

  pub fn set_tick_rate(&mut self, tick_rate: u64) -> Result<()> {
    if tick_rate == 0 || tick_rate >= 1000 {
      return Err(anyhow!("Tick rate must be between 1 and 999, is {}", tick_rate));
    }
    self.behavior.tick_rate_milliseconds = tick_rate;
    Ok(())
  }

  pub fn load_config(&mut self) -> Result<()> {
    let path = self.get_or_build_paths()?;
    if !path.exists() {
      return Ok(());
    }

    let config_string = fs::read_to_string(&path)?;
    self.load_from_str(&config_string)
      .with_context(|| format!("Failed to load {}", path.display()))
  }

  pub fn load_from_str(&mut self, config_string: &str) -> Result<()> {
    // serde fails if file is empty
    if config_string.trim().is_empty() {
      return Ok(());
    }

    let config_yml: UserConfigString = serde_yaml::from_str(config_string)?;

    if let Some(keybindings) = config_yml.keybindings {
      self.load_keybindings(keybindings)?;
    }
    if let Some(behavior) = config_yml.behavior {
      self.load_behaviorconfig(behavior)?;
    }
    if let Some(theme) = config_yml.theme {
      self.load_theme(theme)?;
    }

    Ok(())
  }
}

fn parse_theme_item(theme_item: &str) -> Result<Color> {
  let color = match theme_item {
    "Reset" => Color::Reset,
    "Black" => Color::Black,
    "Red" => Color::Red,
    "Green" => Color::Green,
    "Yellow" => Color::Yellow,
    "Blue" => Color::Blue,
    "Magenta" => Color::Magenta,
    "Cyan" => Color::Cyan,
    "Gray" => Color::Gray,
    "DarkGray" => Color::DarkGray,
    "LightRed" => Color::LightRed,
    "LightGreen" => Color::LightGreen,
    "LightYellow" => Color::LightYellow,
    "LightBlue" => Color::LightBlue,
    "LightMagenta" => Color::LightMagenta,
    "LightCyan" => Color::LightCyan,
    "White" => Color::White,
    _ => {
      let colors = theme_item.split(',').collect::<Vec<&str>>();
      if let [r, g, b] = colors.as_slice() {
        Color::Rgb(
          r.trim().parse::<u8>()?,
          g.trim().parse::<u8>()?,
          b.trim().parse::<u8>()?,
        )
      } else {
        return Err(anyhow!("Unexpected color {}", theme_item));
      }
    }
  };

  Ok(color)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_key() {
    assert_eq!(parse_key(String::from("j")).unwrap(), Key::Char('j'));
    assert_eq!(parse_key(String::from("J")).unwrap(), Key::Char('J'));
    assert_eq!(parse_key(String::from("ctrl-j")).unwrap(), Key::Ctrl('j'));
    assert_eq!(parse_key(String::from("alt-x")).unwrap(), Key::Alt('x'));
    assert_eq!(parse_key(String::from("-")).unwrap(), Key::Char('-'));
    assert_eq!(parse_key(String::from("esc")).unwrap(), Key::Esc);
    assert_eq!(parse_key(String::from("space")).unwrap(), Key::Char(' '));
    assert_eq!(parse_key(String::from("⏯")).unwrap(), Key::Char('⏯'));
    assert!(parse_key(String::from("ctrl-")).is_err());
    assert!(parse_key(String::from("hyper-x")).is_err());
    assert!(parse_key(String::from("ctrl-alt-x")).is_err());
  }

  #[test]
  fn parse_theme_item_test() {
    assert_eq!(parse_theme_item("Reset").unwrap(), Color::Reset);
    assert_eq!(parse_theme_item("LightCyan").unwrap(), Color::LightCyan);
    assert_eq!(
      parse_theme_item("23, 43, 45").unwrap(),
      Color::Rgb(23, 43, 45)
    );
    assert!(parse_theme_item("Purplish").is_err());
    assert!(parse_theme_item("300, 0, 0").is_err());
  }

  #[test]
  fn test_reserved_key() {
    assert!(
      check_reserved_keys(Key::Enter).is_err(),
      "Enter key should be reserved"
    );
    assert!(check_reserved_keys(Key::Char('x')).is_ok());
  }

  #[test]
  fn loads_yaml_overrides() {
    let mut config = UserConfig::new();
    config
      .load_from_str(
        "keybindings:\n  next_track: ctrl-n\nbehavior:\n  tick_rate_milliseconds: 100\n  paused_icon: '||'\ntheme:\n  banner: Red\n",
      )
      .unwrap();

    assert_eq!(config.keys.next_track, Key::Ctrl('n'));
    assert_eq!(config.keys.previous_track, Key::Char('p'));
    assert_eq!(config.behavior.tick_rate_milliseconds, 100);
    assert_eq!(config.behavior.paused_icon, "||");
    assert_eq!(config.theme.banner, Color::Red);
  }

  #[test]
  fn rejects_reserved_binding_and_tick_rate() {
    let mut config = UserConfig::new();
    for key in ["enter", "tab", "esc"] {
      let err = config
        .load_from_str(&format!("keybindings:\n  back: {}\n", key))
        .unwrap_err();
      assert!(err.to_string().contains("reserved"), "{}: {}", key, err);
    }
    config
      .load_from_str("keybindings:\n  search: home\n")
      .unwrap();
    assert_eq!(config.keys.search, Key::Home);
    assert!(config
      .load_from_str("behavior:\n  tick_rate_milliseconds: 1000\n")
      .is_err());
    assert!(config.load_from_str("   \n").is_ok());
  }
}
