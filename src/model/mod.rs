//! Structs describing imported Showdown teams.

/// Defines an enum of names with a fixed API spelling, such as the names of
/// stats.
///
/// The generated enum serializes as its API name and can be recovered from it
/// with `from_name()`.
macro_rules! well_known {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $(
        $(#[$vmeta:meta])*
        $variant:ident => $str:literal,
      )*
    }
  ) => {
    $(#[$meta])*
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub enum $name {
      $(
        $(#[$vmeta])*
        $variant,
      )*
    }

    impl $name {
      /// Every value of this enum, in declaration order.
      pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

      /// Returns the API name for this value.
      pub fn name(self) -> &'static str {
        match self {
          $(Self::$variant => $str,)*
        }
      }

      /// Parses an API name into a value, if it is one of the known names.
      pub fn from_name(name: &str) -> Option<Self> {
        match name {
          $($str => Some(Self::$variant),)*
          _ => None,
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
      }
    }

    impl serde::Serialize for $name {
      fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
      where
        S: serde::Serializer,
      {
        s.serialize_str(self.name())
      }
    }

    impl<'de> serde::Deserialize<'de> for $name {
      fn deserialize<D>(d: D) -> Result<Self, D::Error>
      where
        D: serde::Deserializer<'de>,
      {
        let name = <String as serde::Deserialize>::deserialize(d)?;
        Self::from_name(&name).ok_or_else(|| {
          serde::de::Error::unknown_variant(&name, &[$($str,)*])
        })
      }
    }
  };
}

pub mod stat;
pub mod team;

pub use stat::StatName;
pub use stat::StatTable;
pub use team::Gender;
pub use team::ShowdownPokemon;
pub use team::ShowdownTeam;
