mod cli;
mod core;
mod infra;
mod tui;

use crate::core::app::{App, View};
use crate::core::config::ClientConfig;
use crate::core::user_config::UserConfig;
use crate::infra::network::{BackendClient, IoEvent, Network, WebApiClient};
use crate::infra::player::{DeviceBackend, DeviceConfig, PlaybackAdapter, SDK};
use crate::tui::{event, handlers, ui};
use anyhow::{anyhow, Result};
use backtrace::Backtrace;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapApp};
use clap_complete::{generate, Shell};
use crossterm::{
  event::{DisableMouseCapture, EnableMouseCapture},
  execute,
  terminal::SetTitle,
};
use log::{info, LevelFilter};
use std::{
  fs,
  io::{self, stdout, Write},
  panic,
  path::PathBuf,
  sync::Arc,
};
use tokio::sync::{mpsc::UnboundedReceiver, Mutex};

fn setup_logging(debug: bool) -> Result<()> {
  let log_dir = std::env::temp_dir().join("webplayback_logs");
  let log_path = log_dir.join(format!("webplayback{}.log", std::process::id()));

  fs::create_dir_all(&log_dir)
    .map_err(|e| anyhow!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{}[{}][{}] {}",
        chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(if debug {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .chain(fern::log_file(&log_path)?)
    .apply()
    .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

  println!("Logging to: {}", log_path.display());

  Ok(())
}

fn install_panic_hook() {
  let default_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    let panic_log_path = dirs::home_dir().map(|home| {
      home
        .join(crate::core::config::CONFIG_DIR)
        .join(crate::core::config::APP_CONFIG_DIR)
        .join("webplayback_panic.log")
    });

    if let Some(path) = panic_log_path.as_ref() {
      if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
      }
      if let Ok(mut f) = fs::OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(f, "\n==== webplayback panic ====");
        let _ = writeln!(f, "{}", info);
        let _ = writeln!(f, "{:?}", Backtrace::new());
      }
      eprintln!("A crash log was written to: {}", path.to_string_lossy());
    }
    default_hook(info);
  }));
}

fn build_cli() -> ClapApp {
  ClapApp::new(env!("CARGO_PKG_NAME"))
    .version(env!("CARGO_PKG_VERSION"))
    .author(env!("CARGO_PKG_AUTHORS"))
    .about(env!("CARGO_PKG_DESCRIPTION"))
    .after_help(
      "Client settings are read from $HOME/.config/webplayback/client.yml, \
key bindings and theme from $HOME/.config/webplayback/config.yml",
    )
    .arg(
      Arg::new("tick-rate")
        .short('t')
        .long("tick-rate")
        .value_parser(clap::value_parser!(u64))
        .help("Set the tick rate (milliseconds): the lower the number the higher the FPS."),
    )
    .arg(
      Arg::new("config")
        .short('c')
        .long("config")
        .help("Specify configuration file path."),
    )
    .arg(
      Arg::new("backend-url")
        .long("backend-url")
        .value_name("URL")
        .help("Auth backend to fetch the token from (overrides client.yml)"),
    )
    .arg(
      Arg::new("debug")
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Log at debug level"),
    )
    .arg(
      Arg::new("completions")
        .long("completions")
        .help("Generates completions for your preferred shell")
        .value_parser(["bash", "zsh", "fish", "power-shell", "elvish"])
        .value_name("SHELL"),
    )
    // Control playback from the command line
    .subcommand(cli::playback_subcommand())
    .subcommand(cli::play_subcommand())
    .subcommand(cli::search_subcommand())
    .subcommand(cli::token_subcommand())
}

fn load_configs(matches: &ArgMatches) -> Result<(UserConfig, ClientConfig)> {
  let mut user_config = UserConfig::new();
  if let Some(config_file_path) = matches.get_one::<String>("config") {
    user_config.path_to_config = Some(PathBuf::from(config_file_path));
  }
  user_config.load_config()?;
  if let Some(tick_rate) = matches.get_one::<u64>("tick-rate") {
    user_config.set_tick_rate(*tick_rate)?;
  }
  info!("user config loaded successfully");

  let mut client_config = ClientConfig::new();
  client_config.load_config()?;
  if let Some(backend_url) = matches.get_one::<String>("backend-url") {
    client_config.set_backend_url(backend_url)?;
  }
  info!("client config loaded, backend at {}", client_config.backend_url);

  Ok((user_config, client_config))
}

#[tokio::main]
async fn main() -> Result<()> {
  let mut clap_app = build_cli();
  let matches = clap_app.clone().get_matches();

  // Shell completions don't need the backend
  if let Some(s) = matches.get_one::<String>("completions") {
    let shell = match s.as_str() {
      "fish" => Shell::Fish,
      "bash" => Shell::Bash,
      "zsh" => Shell::Zsh,
      "power-shell" => Shell::PowerShell,
      "elvish" => Shell::Elvish,
      _ => return Err(anyhow!("no completions available for '{}'", s)),
    };
    generate(shell, &mut clap_app, env!("CARGO_PKG_NAME"), &mut io::stdout());
    return Ok(());
  }

  setup_logging(matches.get_flag("debug"))?;
  info!("webplayback {} starting up", env!("CARGO_PKG_VERSION"));
  install_panic_hook();

  let (user_config, client_config) = load_configs(&matches)?;
  let backend = BackendClient::new(&client_config.backend_url)?;
  let web_api = WebApiClient::new();

  if let Some((cmd, m)) = matches.subcommand() {
    info!("running in cli mode with command: {}", cmd);
    let cli_app = cli::CliApp::new(backend, web_api, user_config, client_config);
    println!("{}", cli::handle_matches(m, cmd, cli_app).await?);
    return Ok(());
  }

  let device_backend = Arc::new(DeviceBackend::from_config(&client_config)?);
  info!("using the {} playback device", device_backend.name());

  let (io_tx, io_rx) = tokio::sync::mpsc::unbounded_channel::<IoEvent>();
  let app = Arc::new(Mutex::new(App::new(
    io_tx,
    user_config.clone(),
    client_config,
  )));
  info!("app state initialized");

  let network = Network::new(backend, web_api, &app);
  tokio::spawn(start_network(io_rx, network));

  app.lock().await.dispatch(IoEvent::FetchToken);

  info!("launching interactive terminal ui");
  start_ui(user_config, &app, device_backend).await
}

async fn start_network(
  mut io_rx: UnboundedReceiver<IoEvent>,
  mut network: Network<BackendClient, WebApiClient>,
) {
  while let Some(io_event) = io_rx.recv().await {
    network.handle_network_event(io_event).await;
  }
  info!("network task stopped");
}

async fn start_ui(
  user_config: UserConfig,
  app: &Arc<Mutex<App>>,
  device_backend: Arc<DeviceBackend>,
) -> Result<()> {
  let mut terminal = ratatui::init();
  execute!(stdout(), EnableMouseCapture)?;

  if user_config.behavior.set_window_title {
    execute!(stdout(), SetTitle("webplayback"))?;
  }

  let events = event::Events::new(user_config.behavior.tick_rate_milliseconds);
  let mut adapter: Option<PlaybackAdapter> = None;

  loop {
    let terminal_size = terminal.size().ok();
    {
      let mut state = app.lock().await;

      if let Some(size) = terminal_size {
        state.size = size;
      }

      // The device only lives while the playback view is shown
      match (state.view(), adapter.is_some()) {
        (View::Playback, false) => {
          info!("mounting playback device");
          let config = DeviceConfig {
            name: state.client_config.device_name.clone(),
            volume_percent: state.client_config.volume_percent,
            token: state.token.clone(),
          };
          adapter = Some(PlaybackAdapter::mount(
            &SDK,
            Arc::clone(&device_backend),
            config,
            Arc::clone(app),
          ));
        }
        (View::Login, true) => {
          if let Some(mounted) = adapter.take() {
            info!("unmounting playback device");
            mounted.unmount(&mut state);
          }
        }
        _ => {}
      }

      terminal.draw(|f| ui::draw_main_layout(f, &state))?;
    }

    match events.next()? {
      event::Event::Input(key) => {
        let mut app = app.lock().await;
        if handlers::is_quit_key(key, &app) {
          app.close_io_channel();
          break;
        }
        handlers::handle_app(key, &mut app);
      }
      event::Event::Mouse(mouse) => {
        let mut app = app.lock().await;
        handlers::mouse::handler(mouse, &mut app);
      }
      event::Event::Tick => {
        app.lock().await.update_on_tick();
      }
    }
  }

  if let Some(mounted) = adapter.take() {
    mounted.unmount(&mut *app.lock().await);
  }

  execute!(stdout(), DisableMouseCapture)?;
  ratatui::restore();

  Ok(())
}
