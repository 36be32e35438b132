//! Resolution of Showdown species names to PokéAPI IDs.
//!
//! Resolution is fail-soft: every failure (unknown species, transport error,
//! malformed response, timeout) is logged and reported as `None`.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::api::Api;
use crate::api::Cache;
use crate::api::Error;
use crate::api::PokemonRef;
use crate::model::ShowdownTeam;

/// How long a single lookup may take before it is treated as not found.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Slugs whose normalized Showdown spelling differs from PokéAPI's.
///
/// Most of these are species whose base form has no bare `pokemon` entry.
const SPECIAL_CASES: &[(&str, &str)] = &[
  ("nidoran-m", "nidoran-male"),
  ("nidoran-f", "nidoran-female"),
  ("farfetch-d", "farfetchd"),
  ("farfetch-d-galar", "farfetchd-galar"),
  ("sirfetch-d", "sirfetchd"),
  ("flab-b", "flabebe"),
  ("deoxys", "deoxys-normal"),
  ("wormadam", "wormadam-plant"),
  ("giratina", "giratina-altered"),
  ("shaymin", "shaymin-land"),
  ("basculin", "basculin-red-striped"),
  ("darmanitan", "darmanitan-standard"),
  ("darmanitan-galar", "darmanitan-galar-standard"),
  ("tornadus", "tornadus-incarnate"),
  ("thundurus", "thundurus-incarnate"),
  ("landorus", "landorus-incarnate"),
  ("enamorus", "enamorus-incarnate"),
  ("keldeo", "keldeo-ordinary"),
  ("meloetta", "meloetta-aria"),
  ("meowstic", "meowstic-male"),
  ("meowstic-f", "meowstic-female"),
  ("aegislash", "aegislash-shield"),
  ("pumpkaboo", "pumpkaboo-average"),
  ("gourgeist", "gourgeist-average"),
  ("zygarde", "zygarde-50"),
  ("oricorio", "oricorio-baile"),
  ("lycanroc", "lycanroc-midday"),
  ("wishiwashi", "wishiwashi-solo"),
  ("minior", "minior-red-meteor"),
  ("mimikyu", "mimikyu-disguised"),
  ("necrozma-dusk-mane", "necrozma-dusk"),
  ("necrozma-dawn-wings", "necrozma-dawn"),
  ("toxtricity", "toxtricity-amped"),
  ("eiscue", "eiscue-ice"),
  ("indeedee", "indeedee-male"),
  ("indeedee-f", "indeedee-female"),
  ("morpeko", "morpeko-full-belly"),
  ("urshifu", "urshifu-single-strike"),
  ("basculegion", "basculegion-male"),
  ("basculegion-f", "basculegion-female"),
  ("oinkologne", "oinkologne-male"),
  ("oinkologne-f", "oinkologne-female"),
  ("maushold", "maushold-family-of-four"),
  ("squawkabilly", "squawkabilly-green-plumage"),
  ("palafin", "palafin-zero"),
  ("tatsugiri", "tatsugiri-curly"),
  ("dudunsparce", "dudunsparce-two-segment"),
  ("tauros-paldea-combat", "tauros-paldea-combat-breed"),
  ("tauros-paldea-blaze", "tauros-paldea-blaze-breed"),
  ("tauros-paldea-aqua", "tauros-paldea-aqua-breed"),
];

/// Normalizes a species name into slug form: lowercase ASCII letters and
/// digits separated by single hyphens.
///
/// Every other character, including accented letters, becomes a separator.
pub fn normalize_species_name(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  for c in name.chars().flat_map(char::to_lowercase) {
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
      slug.push(c);
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  if slug.ends_with('-') {
    slug.pop();
  }
  slug
}

/// Returns the PokéAPI slug for a Showdown species name.
///
/// This is [`normalize_species_name()`] followed by a fixed table of
/// overrides, e.g. `Nidoran-M` becomes `nidoran-male`.
pub fn species_slug(name: &str) -> String {
  let slug = normalize_species_name(name);
  match SPECIAL_CASES.iter().find(|(from, _)| *from == slug) {
    Some((_, to)) => to.to_string(),
    None => slug,
  }
}

/// A source of species IDs, keyed by PokéAPI slug.
#[async_trait]
pub trait SpeciesLookup: Send + Sync {
  /// Looks up the numeric ID of the Pokemon named by `slug`.
  async fn species_id(&self, slug: &str) -> Result<u32, Error>;

  /// Returns the key a [`Cache`] should file the answer for `slug` under.
  ///
  /// Lookups backed by different catalogs must return different keys, so that
  /// they can share a cache directory.
  fn cache_key(&self, slug: &str) -> String {
    slug.to_string()
  }
}

#[async_trait]
impl SpeciesLookup for Api {
  async fn species_id(&self, slug: &str) -> Result<u32, Error> {
    Ok(self.by_name::<PokemonRef>(slug).await?.id)
  }

  fn cache_key(&self, slug: &str) -> String {
    self.url_for::<PokemonRef>(slug)
  }
}

/// Finds the PokéAPI ID of a Pokemon by its Showdown species name.
///
/// This performs exactly one lookup, with no caching or timeout; see
/// [`Resolver`] for those. Failures are logged and collapse to `None`.
pub async fn find_pokemon_by_showdown_name<L>(
  lookup: &L,
  name: &str,
) -> Option<u32>
where
  L: SpeciesLookup + ?Sized,
{
  let slug = species_slug(name);
  if slug.is_empty() {
    log::warn!("could not find Pokemon {:?}: empty name", name);
    return None;
  }

  report(name, &slug, lookup.species_id(&slug).await)
}

fn report(name: &str, slug: &str, result: Result<u32, Error>) -> Option<u32> {
  match result {
    Ok(id) => {
      log::debug!("resolved {:?} ({}) to #{}", name, slug, id);
      Some(id)
    }
    Err(e) if e.is_not_found() => {
      log::warn!("no Pokemon named {:?} ({})", name, slug);
      None
    }
    Err(e) => {
      log::warn!("could not look up Pokemon {:?} ({}): {}", name, slug, e);
      None
    }
  }
}

/// Resolves species names through a [`SpeciesLookup`], with a per-call
/// timeout and an optional [`Cache`] of previous successes.
pub struct Resolver<L> {
  lookup: L,
  cache: Option<Cache>,
  timeout: Duration,
}

impl<L: SpeciesLookup> Resolver<L> {
  /// Creates a new [`Resolver`] with no cache and the default timeout.
  pub fn new(lookup: L) -> Self {
    Self {
      lookup,
      cache: None,
      timeout: DEFAULT_TIMEOUT,
    }
  }

  /// Caches successful resolutions in `cache`.
  pub fn with_cache(mut self, cache: Cache) -> Self {
    self.cache = Some(cache);
    self
  }

  /// Sets the per-lookup timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Returns the underlying lookup.
  pub fn lookup(&self) -> &L {
    &self.lookup
  }

  /// Finds the PokéAPI ID of a Pokemon by its Showdown species name.
  ///
  /// Cached IDs are returned without a lookup. Failures, including timeouts,
  /// are logged, never cached, and collapse to `None`.
  pub async fn find_pokemon_by_showdown_name(&self, name: &str) -> Option<u32> {
    let slug = species_slug(name);
    if slug.is_empty() {
      log::warn!("could not find Pokemon {:?}: empty name", name);
      return None;
    }

    let key = self.lookup.cache_key(&slug);
    if let Some(cache) = &self.cache {
      match cache.get(&key) {
        Ok(Some(id)) => {
          log::debug!("cache hit for {}", slug);
          return Some(id);
        }
        Ok(None) => log::debug!("cache miss for {}", slug),
        Err(e) => log::error!("failed to read cache for {}: {}", slug, e),
      }
    }

    let result =
      match tokio::time::timeout(self.timeout, self.lookup.species_id(&slug))
        .await
      {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout { slug: slug.clone() }),
      };

    let id = report(name, &slug, result)?;
    if let Some(cache) = &self.cache {
      if let Err(e) = cache.insert(&key, id) {
        log::error!("failed to write cache for {}: {}", slug, e);
      }
    }
    Some(id)
  }

  /// Resolves every Pokemon in `team` concurrently.
  ///
  /// The result lines up with `team.pokemon`: entry `i` is the ID for the
  /// `i`th Pokemon, or `None` if it could not be resolved.
  pub async fn resolve_team(&self, team: &ShowdownTeam) -> Vec<Option<u32>> {
    join_all(
      team
        .pokemon
        .iter()
        .map(|pokemon| self.find_pokemon_by_showdown_name(&pokemon.species)),
    )
    .await
  }
}
