//! `pkmn-showdown` reads a Showdown team export and prints it as JSON, with
//! each Pokemon's PokéAPI ID.

use std::fmt::Arguments;
use std::io;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use log::LevelFilter;
use log::Record;
use serde::Serialize;
use tokio::io::AsyncReadExt as _;

use pkmn_showdown::model::ShowdownPokemon;
use pkmn_showdown::parse_showdown_team;
use pkmn_showdown::Api;
use pkmn_showdown::Config;
use pkmn_showdown::Resolver;

/// Import a Pokémon Showdown team export.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
  /// The export to read; reads stdin if absent or `-`.
  file: Option<PathBuf>,

  /// A configuration file to use instead of the default one.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Only parse the team; do not look anything up.
  #[arg(long)]
  no_resolve: bool,

  /// Pretty-print the output.
  #[arg(long)]
  pretty: bool,

  /// Log more; may be repeated.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  name: Option<&'a str>,
  pokemon: Vec<Entry<'a>>,
}

#[derive(Serialize)]
struct Entry<'a> {
  position: usize,
  #[serde(flatten)]
  build: &'a ShowdownPokemon,
  #[serde(skip_serializing_if = "Option::is_none")]
  id: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  init_logger(args.verbose)?;

  let config = match &args.config {
    Some(path) => Config::load(path)?,
    None => Config::load_default()?,
  };

  let text = read_input(args.file.as_deref()).await?;
  let team = parse_showdown_team(&text);
  log::info!("parsed {} Pokemon", team.len());

  let ids = if args.no_resolve {
    vec![None; team.len()]
  } else {
    let api = Api::with_options(config.api_options());
    log::info!("resolving species against {}", api.base_url());
    let resolver = Resolver::new(api)
      .with_cache(config.cache())
      .with_timeout(config.timeout());
    resolver.resolve_team(&team).await
  };

  let report = Report {
    name: team.name.as_deref(),
    pokemon: team
      .pokemon
      .iter()
      .zip(ids)
      .enumerate()
      .map(|(i, (build, id))| {
        if id.is_none() && !args.no_resolve {
          log::warn!("could not find Pokemon: {}", build.species);
        }
        Entry {
          position: i + 1,
          build,
          id,
        }
      })
      .collect(),
  };

  let json = if args.pretty {
    serde_json::to_string_pretty(&report)?
  } else {
    serde_json::to_string(&report)?
  };
  println!("{}", json);
  Ok(())
}

async fn read_input(file: Option<&std::path::Path>) -> anyhow::Result<String> {
  match file {
    Some(path) if path != std::path::Path::new("-") => {
      tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))
    }
    _ => {
      let mut text = String::new();
      tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("could not read stdin")?;
      Ok(text)
    }
  }
}

fn init_logger(verbose: u8) -> anyhow::Result<()> {
  let level = match verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };

  fern::Dispatch::new()
    .format(console_format)
    .level(LevelFilter::Warn)
    .level_for("pkmn_showdown", level)
    .chain(io::stderr())
    .apply()
    .context("could not install logger")
}

fn console_format(cb: fern::FormatCallback, message: &Arguments, record: &Record) {
  cb.finish(format_args!(
    "[{}] {}: {}",
    record.level(),
    record.target(),
    message
  ))
}
