//! Teams and Pokemon builds, as described by a Showdown export.

use serde::Deserialize;
use serde::Serialize;

use crate::model::stat::StatTable;

/// A Pokemon's gender, as set by a `Gender:` line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
  /// Written as `M`.
  #[serde(rename = "M")]
  Male,
  /// Written as `F`.
  #[serde(rename = "F")]
  Female,
}

impl Gender {
  /// Parses the single-letter Showdown spelling of a gender.
  pub fn from_showdown(s: &str) -> Option<Self> {
    match s {
      "M" => Some(Self::Male),
      "F" => Some(Self::Female),
      _ => None,
    }
  }
}

/// A single Pokemon build within a [`ShowdownTeam`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownPokemon {
  /// The name shown for this Pokemon: its nickname if it has one, and its
  /// species otherwise.
  pub name: String,
  /// The species name as written, minus any nickname or gender marker.
  ///
  /// This is never empty.
  pub species: String,
  /// The nickname, if the header used the `Nickname (Species)` form.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nickname: Option<String>,

  /// The held item.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub item: Option<String>,
  /// The ability.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ability: Option<String>,
  /// The nature, e.g. `Modest`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nature: Option<String>,
  /// The Terastal type.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tera_type: Option<String>,

  /// The level.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub level: Option<u32>,
  /// The happiness value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub happiness: Option<u32>,
  /// Effort values; unlisted stats are absent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub evs: Option<StatTable>,
  /// Individual values; unlisted stats are absent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ivs: Option<StatTable>,

  /// `Some(true)` if the export explicitly marked this Pokemon as shiny.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub shiny: Option<bool>,
  /// The gender, if set by a `Gender:` line.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gender: Option<Gender>,

  /// Moves, in the order they were listed.
  #[serde(default)]
  pub moves: Vec<String>,
}

/// A team parsed from a Showdown export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownTeam {
  /// The team name from the last `=== name ===` line, if any.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// The team's Pokemon, in the order they were listed.
  #[serde(default)]
  pub pokemon: Vec<ShowdownPokemon>,
}

impl ShowdownTeam {
  /// Returns the number of Pokemon in this team.
  pub fn len(&self) -> usize {
    self.pokemon.len()
  }

  /// Returns whether this team has no Pokemon.
  pub fn is_empty(&self) -> bool {
    self.pokemon.is_empty()
  }
}

#[cfg(test)]
mod team_test {
  use pretty_assertions::assert_eq;

  use super::Gender;
  use super::ShowdownPokemon;
  use super::ShowdownTeam;

  #[test]
  fn gender_uses_single_letters() {
    assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), r#""F""#);
    assert_eq!(Gender::from_showdown("M"), Some(Gender::Male));
    assert_eq!(Gender::from_showdown("N"), None);
  }

  #[test]
  fn skips_absent_fields() {
    let team = ShowdownTeam {
      name: None,
      pokemon: vec![ShowdownPokemon {
        name: "Pikachu".to_string(),
        species: "Pikachu".to_string(),
        moves: vec!["Thunderbolt".to_string()],
        ..ShowdownPokemon::default()
      }],
    };
    assert_eq!(
      serde_json::to_string(&team).unwrap(),
      r#"{"pokemon":[{"name":"Pikachu","species":"Pikachu","moves":["Thunderbolt"]}]}"#
    );
  }
}
