use clap::{Arg, ArgAction, ArgGroup, Command};

fn format_arg() -> Arg {
  Arg::new("format")
    .short('f')
    .long("format")
    .value_name("FORMAT")
    .help("Specifies the output format")
    .long_help(
      "There are multiple format specifiers you can use: %a: artist, %t: track, \
%s: playback status, %d: current device. \
Example: webplayback pb -t -f '%s %t on %d'",
    )
}

pub fn playback_subcommand() -> Command {
  Command::new("playback")
    .version(env!("CARGO_PKG_VERSION"))
    .author(env!("CARGO_PKG_AUTHORS"))
    .about("Controls the active Spotify device")
    .long_about(
      "Use `playback` to pause, resume or skip on whichever device is currently \
active for your account. Without options it just displays the current playback. \
After every action the updated playback is displayed. The output format is \
configurable with the `--format` flag.",
    )
    .visible_alias("pb")
    .arg(format_arg().default_value("%s %t - %a"))
    .arg(
      Arg::new("toggle")
        .short('t')
        .long("toggle")
        .action(ArgAction::SetTrue)
        .help("Pauses/resumes the playback"),
    )
    .arg(
      Arg::new("next")
        .short('n')
        .long("next")
        .action(ArgAction::SetTrue)
        .help("Jumps to the next track"),
    )
    .arg(
      Arg::new("previous")
        .short('p')
        .long("previous")
        .action(ArgAction::SetTrue)
        .help("Jumps to the previous track"),
    )
    .group(
      ArgGroup::new("actions")
        .args(["toggle", "next", "previous"])
        .multiple(false),
    )
}

pub fn play_subcommand() -> Command {
  Command::new("play")
    .version(env!("CARGO_PKG_VERSION"))
    .author(env!("CARGO_PKG_AUTHORS"))
    .about("Plays a shared track link")
    .long_about(
      "Resolves a shared Spotify track link through the backend and starts it \
on the active device. Prints the uri of the started track.",
    )
    .visible_alias("p")
    .arg(
      Arg::new("url")
        .required(true)
        .value_name("URL")
        .help("The shared link to play"),
    )
}

pub fn search_subcommand() -> Command {
  Command::new("search")
    .version(env!("CARGO_PKG_VERSION"))
    .author(env!("CARGO_PKG_AUTHORS"))
    .about("Searches through the backend proxy")
    .visible_alias("s")
    .arg(
      Arg::new("search")
        .required(true)
        .value_name("SEARCH")
        .help("Specifies the search query"),
    )
}

pub fn token_subcommand() -> Command {
  Command::new("token")
    .version(env!("CARGO_PKG_VERSION"))
    .author(env!("CARGO_PKG_AUTHORS"))
    .about("Checks whether the backend holds an access token")
}
