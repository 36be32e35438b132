//! Parsing for the Showdown team export format.
//!
//! An export is a sequence of blocks, one per Pokemon:
//!
//! ```text
//! === Rain Team ===
//!
//! Sandy (Starmie) @ Leftovers
//! Ability: Natural Cure
//! EVs: 252 SpA / 4 SpD / 252 Spe
//! Timid Nature
//! - Hydro Pump
//! - Recover
//! ```
//!
//! Parsing never fails: lines that cannot be understood are skipped, and blocks
//! that never name a species are dropped.

use std::convert::Infallible;
use std::str::FromStr;

use crate::model::Gender;
use crate::model::ShowdownPokemon;
use crate::model::ShowdownTeam;
use crate::model::StatName;
use crate::model::StatTable;

/// Keys that Showdown writes but which carry nothing we keep.
///
/// These must still be recognized, since otherwise they would be mistaken for
/// the header of a new Pokemon.
const IGNORED_KEYS: &[&str] =
  &["Dynamax Level:", "Gigantamax:", "Pokeball:", "Hidden Power:"];

/// Parses a Showdown team export.
///
/// This function is total: any input, including the empty string, produces a
/// (possibly empty) team.
pub fn parse_showdown_team(text: &str) -> ShowdownTeam {
  let mut team = ShowdownTeam::default();
  let mut current: Option<PokemonBuilder> = None;

  let lines = text.split('\n').map(str::trim).filter(|l| !l.is_empty());
  for line in lines {
    match Line::classify(line) {
      Line::TeamName(name) => team.name = Some(name.to_string()),
      Line::Header(header) => {
        if let Some(pokemon) = current.take().and_then(PokemonBuilder::finish) {
          team.pokemon.push(pokemon);
        }
        current = Some(PokemonBuilder::from_header(header));
      }
      Line::Ignored => {}
      attr => {
        // Attributes before the first header have nowhere to go.
        if let Some(builder) = current.as_mut() {
          builder.apply(attr);
        }
      }
    }
  }

  if let Some(pokemon) = current.and_then(PokemonBuilder::finish) {
    team.pokemon.push(pokemon);
  }

  team
}

impl FromStr for ShowdownTeam {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(parse_showdown_team(s))
  }
}

/// A single classified line of an export.
#[derive(Debug, PartialEq)]
enum Line<'a> {
  TeamName(&'a str),
  Header(&'a str),
  Move(&'a str),
  Ability(&'a str),
  Level(Option<u32>),
  Evs(StatTable),
  Ivs(StatTable),
  Happiness(Option<u32>),
  Shiny,
  Gender(Gender),
  TeraType(&'a str),
  Nature(&'a str),
  Ignored,
}

impl<'a> Line<'a> {
  /// Classifies a trimmed, non-empty line.
  ///
  /// Rules are tried in order and the first match wins; anything that matches
  /// nothing else is a header.
  fn classify(line: &'a str) -> Self {
    if line.starts_with("===") && line.ends_with("===") {
      return Line::TeamName(trim_team_name(line));
    }

    if let Some(mov) = line.strip_prefix("- ") {
      return Line::Move(mov.trim());
    }

    if line.starts_with('|') {
      return Line::Ignored;
    }

    if let Some(rest) = line.strip_prefix("Ability:") {
      return Line::Ability(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("Level:") {
      return Line::Level(rest.trim().parse().ok());
    }
    if let Some(rest) = line.strip_prefix("EVs:") {
      return Line::Evs(parse_stats(rest));
    }
    if let Some(rest) = line.strip_prefix("IVs:") {
      return Line::Ivs(parse_stats(rest));
    }
    if let Some(rest) = line.strip_prefix("Happiness:") {
      return Line::Happiness(rest.trim().parse().ok());
    }
    if line.starts_with("Shiny:") {
      return match line {
        "Shiny: Yes" => Line::Shiny,
        _ => Line::Ignored,
      };
    }
    if line.starts_with("Gender:") {
      return match line.strip_prefix("Gender: ").and_then(Gender::from_showdown) {
        Some(gender) => Line::Gender(gender),
        None => Line::Ignored,
      };
    }
    if let Some(rest) = line.strip_prefix("Tera Type:") {
      return Line::TeraType(rest.trim());
    }
    if IGNORED_KEYS.iter().any(|key| line.starts_with(key)) {
      return Line::Ignored;
    }

    if line.ends_with("Nature") {
      let nature = line.split_whitespace().next().unwrap_or_default();
      return Line::Nature(nature);
    }

    if line.starts_with('-') {
      return Line::Ignored;
    }

    Line::Header(line)
  }
}

/// Removes every `===` delimiter from a team name line.
fn trim_team_name(line: &str) -> &str {
  let mut name = line.trim();
  while let Some(rest) = name.strip_prefix("===") {
    name = rest.trim_start();
  }
  while let Some(rest) = name.strip_suffix("===") {
    name = rest.trim_end();
  }
  name
}

/// Parses the body of an `EVs:` or `IVs:` line, e.g. `252 Atk / 4 HP`.
///
/// Pairs with an unknown stat or a malformed value are skipped.
fn parse_stats(body: &str) -> StatTable {
  let mut table = StatTable::new();
  for part in body.split('/') {
    let mut words = part.split_whitespace();
    let (value, abbrev) = match (words.next(), words.next()) {
      (Some(value), Some(abbrev)) => (value, abbrev),
      _ => continue,
    };

    let stat = match StatName::from_showdown(abbrev) {
      Some(stat) => stat,
      None => continue,
    };
    if let Ok(value) = value.parse() {
      table.insert(stat, value);
    }
  }
  table
}

/// Strips a trailing ` (M)` or ` (F)` display-gender marker.
fn strip_gender_marker(s: &str) -> &str {
  s.strip_suffix(" (M)")
    .or_else(|| s.strip_suffix(" (F)"))
    .map(str::trim_end)
    .unwrap_or(s)
}

/// Splits `Nickname (Species)` into its two halves: the text before the first
/// `(`, and the text between it and the final `)`.
///
/// Returns `None` if `s` is not of that form, or if either half is empty.
fn split_nickname(s: &str) -> Option<(&str, &str)> {
  let inner = s.strip_suffix(')')?;
  let open = inner.find('(')?;
  let nickname = inner[..open].trim();
  let species = inner[open + 1..].trim();
  if nickname.is_empty() || species.is_empty() {
    return None;
  }
  Some((nickname, species))
}

/// A Pokemon whose block is still being read.
#[derive(Debug, Default)]
struct PokemonBuilder {
  species: Option<String>,
  nickname: Option<String>,
  item: Option<String>,
  ability: Option<String>,
  nature: Option<String>,
  tera_type: Option<String>,
  level: Option<u32>,
  happiness: Option<u32>,
  evs: Option<StatTable>,
  ivs: Option<StatTable>,
  shiny: Option<bool>,
  gender: Option<Gender>,
  moves: Vec<String>,
}

impl PokemonBuilder {
  /// Starts a new Pokemon from a header line such as
  /// `Sandy (Starmie) (F) @ Leftovers`.
  fn from_header(header: &str) -> Self {
    let mut segments = header.split('@').map(str::trim);
    let who = segments.next().unwrap_or_default();
    let item = segments.next().filter(|item| !item.is_empty());

    let who = strip_gender_marker(who);
    let (nickname, species) = match split_nickname(who) {
      Some((nickname, species)) => (Some(nickname), species),
      None => (None, who),
    };
    let species = strip_gender_marker(species);

    Self {
      species: Some(species.to_string()),
      nickname: nickname.map(str::to_string),
      item: item.map(str::to_string),
      ..Self::default()
    }
  }

  /// Records a single attribute line; later lines overwrite earlier ones.
  fn apply(&mut self, line: Line) {
    match line {
      Line::Move(mov) => self.moves.push(mov.to_string()),
      Line::Ability(ability) => self.ability = Some(ability.to_string()),
      Line::Level(level) => self.level = level.or(self.level),
      Line::Evs(evs) => self.evs = Some(evs),
      Line::Ivs(ivs) => self.ivs = Some(ivs),
      Line::Happiness(happiness) => self.happiness = happiness.or(self.happiness),
      Line::Shiny => self.shiny = Some(true),
      Line::Gender(gender) => self.gender = Some(gender),
      Line::TeraType(ty) => self.tera_type = Some(ty.to_string()),
      Line::Nature(nature) => self.nature = Some(nature.to_string()),
      Line::TeamName(_) | Line::Header(_) | Line::Ignored => {}
    }
  }

  /// Finalizes this Pokemon, or returns `None` if it never got a species.
  fn finish(self) -> Option<ShowdownPokemon> {
    let species = self.species.filter(|s| !s.is_empty())?;
    let name = self.nickname.clone().unwrap_or_else(|| species.clone());
    Some(ShowdownPokemon {
      name,
      species,
      nickname: self.nickname,
      item: self.item,
      ability: self.ability,
      nature: self.nature,
      tera_type: self.tera_type,
      level: self.level,
      happiness: self.happiness,
      evs: self.evs,
      ivs: self.ivs,
      shiny: self.shiny,
      gender: self.gender,
      moves: self.moves,
    })
  }
}

#[cfg(test)]
mod parse_test {
  use pretty_assertions::assert_eq;

  use super::parse_showdown_team;
  use super::split_nickname;
  use super::strip_gender_marker;
  use super::trim_team_name;
  use super::Line;
  use crate::model::Gender;
  use crate::model::StatName;
  use crate::model::StatTable;

  #[test]
  fn classifies_attribute_lines() {
    assert_eq!(Line::classify("Ability: Levitate"), Line::Ability("Levitate"));
    assert_eq!(Line::classify("Level: 50"), Line::Level(Some(50)));
    assert_eq!(Line::classify("Level: fifty"), Line::Level(None));
    assert_eq!(Line::classify("Happiness: 0"), Line::Happiness(Some(0)));
    assert_eq!(Line::classify("Shiny: Yes"), Line::Shiny);
    assert_eq!(Line::classify("Shiny: No"), Line::Ignored);
    assert_eq!(Line::classify("Gender: F"), Line::Gender(Gender::Female));
    assert_eq!(Line::classify("Gender: X"), Line::Ignored);
    assert_eq!(Line::classify("Tera Type: Fairy"), Line::TeraType("Fairy"));
    assert_eq!(Line::classify("Gigantamax: Yes"), Line::Ignored);
    assert_eq!(Line::classify("Adamant Nature"), Line::Nature("Adamant"));
    assert_eq!(Line::classify("- Surf"), Line::Move("Surf"));
    assert_eq!(Line::classify("-Surf"), Line::Ignored);
    assert_eq!(Line::classify("|packed|line"), Line::Ignored);
    assert_eq!(Line::classify("=== Team ==="), Line::TeamName("Team"));
    assert_eq!(Line::classify("Pikachu @ Light Ball"), Line::Header("Pikachu @ Light Ball"));
  }

  #[test]
  fn trims_team_names() {
    assert_eq!(trim_team_name("=== Rain ==="), "Rain");
    assert_eq!(trim_team_name("===Rain==="), "Rain");
    assert_eq!(trim_team_name("==="), "");
    assert_eq!(trim_team_name("======"), "");
  }

  #[test]
  fn empty_team_name_still_overwrites() {
    let team = parse_showdown_team("=== A ===\nPikachu\n======");
    assert_eq!(team.name.as_deref(), Some(""));
    assert_eq!(team.pokemon.len(), 1);

    assert_eq!(parse_showdown_team("======").name.as_deref(), Some(""));
  }

  #[test]
  fn nickname_without_space() {
    let team = parse_showdown_team("Sandy(Starmie) @ Leftovers");
    assert_eq!(team.pokemon[0].nickname.as_deref(), Some("Sandy"));
    assert_eq!(team.pokemon[0].species, "Starmie");
  }

  #[test]
  fn strips_gender_markers() {
    assert_eq!(strip_gender_marker("Nidoran (M)"), "Nidoran");
    assert_eq!(strip_gender_marker("Gardevoir (F)"), "Gardevoir");
    assert_eq!(strip_gender_marker("Gardevoir(F)"), "Gardevoir(F)");
    assert_eq!(strip_gender_marker("Gardevoir"), "Gardevoir");
  }

  #[test]
  fn splits_nicknames() {
    assert_eq!(split_nickname("Sandy (Starmie)"), Some(("Sandy", "Starmie")));
    assert_eq!(
      split_nickname("Big Guy (Snorlax)"),
      Some(("Big Guy", "Snorlax"))
    );
    assert_eq!(split_nickname("Sandy(Starmie)"), Some(("Sandy", "Starmie")));
    assert_eq!(split_nickname("Starmie"), None);
    assert_eq!(split_nickname("(Starmie)"), None);
    assert_eq!(split_nickname("Sandy ()"), None);
  }

  #[test]
  fn nickname_with_gender_marker() {
    let team = parse_showdown_team("Sandy (Starmie) (F) @ Leftovers");
    let starmie = &team.pokemon[0];
    assert_eq!(starmie.nickname.as_deref(), Some("Sandy"));
    assert_eq!(starmie.species, "Starmie");
    assert_eq!(starmie.name, "Sandy");
    assert_eq!(starmie.gender, None);
  }

  #[test]
  fn empty_item_is_absent() {
    let team = parse_showdown_team("Pikachu @");
    assert_eq!(team.pokemon[0].item, None);
  }

  #[test]
  fn later_attributes_overwrite_earlier_ones() {
    let team = parse_showdown_team(
      "Pikachu\nAbility: Static\nAbility: Lightning Rod\nEVs: 4 HP\nEVs: 252 Spe",
    );
    let pikachu = &team.pokemon[0];
    assert_eq!(pikachu.ability.as_deref(), Some("Lightning Rod"));

    let mut evs = StatTable::new();
    evs.insert(StatName::Speed, 252);
    assert_eq!(pikachu.evs, Some(evs));
  }

  #[test]
  fn malformed_numbers_are_absent() {
    let team = parse_showdown_team(
      "Pikachu\nLevel: high\nHappiness: ???\nEVs: lots Atk / 252 Spe",
    );
    let pikachu = &team.pokemon[0];
    assert_eq!(pikachu.level, None);
    assert_eq!(pikachu.happiness, None);

    let mut evs = StatTable::new();
    evs.insert(StatName::Speed, 252);
    assert_eq!(pikachu.evs, Some(evs));
  }

  #[test]
  fn attributes_before_any_header_are_dropped() {
    let team = parse_showdown_team("Ability: Static\n- Thunderbolt\nPikachu");
    assert_eq!(team.pokemon.len(), 1);
    assert_eq!(team.pokemon[0].ability, None);
    assert!(team.pokemon[0].moves.is_empty());
  }

  #[test]
  fn block_without_species_is_dropped() {
    let team = parse_showdown_team("@ Leftovers\n- Tackle\nPikachu\n- Surf");
    assert_eq!(team.pokemon.len(), 1);
    assert_eq!(team.pokemon[0].species, "Pikachu");
    assert_eq!(team.pokemon[0].moves, vec!["Surf".to_string()]);
  }

  #[test]
  fn handles_crlf_line_endings() {
    let team = parse_showdown_team("Pikachu @ Light Ball\r\nAbility: Static\r\n");
    assert_eq!(team.pokemon[0].item.as_deref(), Some("Light Ball"));
    assert_eq!(team.pokemon[0].ability.as_deref(), Some("Static"));
  }

  #[test]
  fn from_str_matches_parse() {
    let text = "=== T ===\nPikachu\n- Surf";
    let team: crate::model::ShowdownTeam = text.parse().unwrap();
    assert_eq!(team, parse_showdown_team(text));
  }
}
