//! Importing teams from Pokémon Showdown.
//!
//! Importing happens in two separate steps. [`parse_showdown_team()`] turns
//! export text into a [`ShowdownTeam`](crate::model::ShowdownTeam) and cannot
//! fail; a [`Resolver`] then maps each species name to a PokéAPI ID, which is
//! slow and may fail for any individual Pokemon.

pub mod parse;
pub mod resolve;

pub use parse::parse_showdown_team;
pub use resolve::find_pokemon_by_showdown_name;
pub use resolve::normalize_species_name;
pub use resolve::species_slug;
pub use resolve::Resolver;
pub use resolve::SpeciesLookup;
