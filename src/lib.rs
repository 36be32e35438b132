//! `pkmn_showdown` imports Pokémon Showdown team exports and resolves their
//! species against PokéAPI.

#![deny(warnings, missing_docs, unused)]

pub mod api;
pub mod config;
pub mod model;
pub mod showdown;

pub use api::Api;
pub use config::Config;
pub use showdown::parse_showdown_team;
pub use showdown::Resolver;
