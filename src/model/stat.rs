//! Pokemon battle statistics, as they appear in `EVs:` and `IVs:` lines.

use std::collections::BTreeMap;

well_known! {
  /// A name for a Pokemon battle statistic.
  ///
  /// The API names match PokeAPI's stat names.
  #[derive(PartialOrd, Ord)]
  pub enum StatName {
    /// Hit Points determine how much damage a Pokemon can take in battle.
    HitPoints => "hp",
    /// Attack determines the power of a Pokemon's physical moves.
    Attack => "attack",
    /// Defense determines the effectiveness of a physical move on a Pokemon.
    Defense => "defense",
    /// Special Attack determines the power of a Pokemon's special moves.
    SpAttack => "special-attack",
    /// Special Defense determines the effectiveness of a special move on a
    /// Pokemon.
    SpDefense => "special-defense",
    /// Speed determines which Pokemon moves first in a turn.
    Speed => "speed",
  }
}

impl StatName {
  /// Parses the abbreviation Showdown uses for this stat, such as `SpA`.
  ///
  /// Abbreviations are case-sensitive; anything unrecognized is `None`.
  pub fn from_showdown(abbrev: &str) -> Option<Self> {
    match abbrev {
      "HP" => Some(Self::HitPoints),
      "Atk" => Some(Self::Attack),
      "Def" => Some(Self::Defense),
      "SpA" => Some(Self::SpAttack),
      "SpD" => Some(Self::SpDefense),
      "Spe" => Some(Self::Speed),
      _ => None,
    }
  }

  /// Returns the abbreviation Showdown uses for this stat.
  pub fn showdown_abbrev(self) -> &'static str {
    match self {
      Self::HitPoints => "HP",
      Self::Attack => "Atk",
      Self::Defense => "Def",
      Self::SpAttack => "SpA",
      Self::SpDefense => "SpD",
      Self::Speed => "Spe",
    }
  }
}

/// A partial table of stat values, such as a spread of EVs.
///
/// Stats which were not listed are absent rather than zero.
pub type StatTable = BTreeMap<StatName, u32>;

#[cfg(test)]
mod stat_name_test {
  use pretty_assertions::assert_eq;

  use super::StatName;
  use super::StatTable;

  #[test]
  fn showdown_abbreviations_round_trip() {
    for &stat in StatName::ALL {
      assert_eq!(StatName::from_showdown(stat.showdown_abbrev()), Some(stat));
    }
  }

  #[test]
  fn rejects_unknown_abbreviations() {
    assert_eq!(StatName::from_showdown("Foo"), None);
    assert_eq!(StatName::from_showdown("atk"), None);
    assert_eq!(StatName::from_showdown(""), None);
  }

  #[test]
  fn serializes_to_api_name() {
    let mut table = StatTable::new();
    table.insert(StatName::SpAttack, 252);
    table.insert(StatName::HitPoints, 4);
    assert_eq!(
      serde_json::to_string(&table).unwrap(),
      r#"{"hp":4,"special-attack":252}"#
    );
  }

  #[test]
  fn deserializes_from_api_name() {
    let stat: StatName = serde_json::from_str(r#""special-defense""#).unwrap();
    assert_eq!(stat, StatName::SpDefense);
    assert!(serde_json::from_str::<StatName>(r#""SpD""#).is_err());
  }
}
