use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use std::{fmt, sync::mpsc, thread, time::Duration};

/// Represents a key.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum Key {
  Enter,
  Tab,
  Backspace,
  Esc,
  Left,
  Right,
  Up,
  Down,
  Home,
  End,
  PageUp,
  PageDown,
  Delete,
  Char(char),
  Ctrl(char),
  Alt(char),
  Unknown,
}

impl From<KeyEvent> for Key {
  fn from(key_event: KeyEvent) -> Self {
    match key_event {
      KeyEvent {
        code: KeyCode::Esc, ..
      } => Key::Esc,
      KeyEvent {
        code: KeyCode::Backspace,
        ..
      } => Key::Backspace,
      KeyEvent {
        code: KeyCode::Left,
        ..
      } => Key::Left,
      KeyEvent {
        code: KeyCode::Right,
        ..
      } => Key::Right,
      KeyEvent {
        code: KeyCode::Up, ..
      } => Key::Up,
      KeyEvent {
        code: KeyCode::Down,
        ..
      } => Key::Down,
      KeyEvent {
        code: KeyCode::Home,
        ..
      } => Key::Home,
      KeyEvent {
        code: KeyCode::End, ..
      } => Key::End,
      KeyEvent {
        code: KeyCode::PageUp,
        ..
      } => Key::PageUp,
      KeyEvent {
        code: KeyCode::PageDown,
        ..
      } => Key::PageDown,
      KeyEvent {
        code: KeyCode::Delete,
        ..
      } => Key::Delete,
      KeyEvent {
        code: KeyCode::Enter,
        ..
      } => Key::Enter,
      KeyEvent {
        code: KeyCode::Tab, ..
      } => Key::Tab,
      KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::ALT,
        ..
      } => Key::Alt(c),
      KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        ..
      } => Key::Ctrl(c),
      KeyEvent {
        code: KeyCode::Char(c),
        ..
      } => Key::Char(c),
      _ => Key::Unknown,
    }
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::Char(' ') => write!(f, "space"),
      Key::Char(c) => write!(f, "{}", c),
      Key::Ctrl(c) => write!(f, "ctrl-{}", c),
      Key::Alt(c) => write!(f, "alt-{}", c),
      Key::Enter => write!(f, "enter"),
      Key::Tab => write!(f, "tab"),
      Key::Esc => write!(f, "esc"),
      Key::Backspace => write!(f, "backspace"),
      Key::Delete => write!(f, "del"),
      Key::Left => write!(f, "left"),
      Key::Right => write!(f, "right"),
      Key::Up => write!(f, "up"),
      Key::Down => write!(f, "down"),
      Key::Home => write!(f, "home"),
      Key::End => write!(f, "end"),
      Key::PageUp => write!(f, "pageup"),
      Key::PageDown => write!(f, "pagedown"),
      Key::Unknown => write!(f, "unknown"),
    }
  }
}

pub enum Event<I> {
  Input(I),
  Mouse(MouseEvent),
  Tick,
}

/// Terminal input read on its own thread, interleaved with ticks.
pub struct Events {
  rx: mpsc::Receiver<Event<Key>>,
  // Keeps the channel open even if the input thread exits
  _tx: mpsc::Sender<Event<Key>>,
}

impl Events {
  pub fn new(tick_rate: u64) -> Events {
    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(tick_rate);

    let event_tx = tx.clone();
    thread::spawn(move || loop {
      match event::poll(tick_rate) {
        Ok(true) => {
          let forwarded = match event::read() {
            // Windows reports both press and release
            Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
              event_tx.send(Event::Input(Key::from(key)))
            }
            Ok(event::Event::Mouse(mouse)) => event_tx.send(Event::Mouse(mouse)),
            Ok(_) => Ok(()),
            Err(e) => {
              log::error!("failed to read terminal event: {}", e);
              Ok(())
            }
          };
          if forwarded.is_err() {
            break;
          }
        }
        Ok(false) => {}
        Err(e) => {
          log::error!("failed to poll terminal events: {}", e);
          break;
        }
      }
      if event_tx.send(Event::Tick).is_err() {
        break;
      }
    });

    Events { rx, _tx: tx }
  }

  /// Blocks until the next input or tick arrives.
  pub fn next(&self) -> Result<Event<Key>, mpsc::RecvError> {
    self.rx.recv()
  }
}
