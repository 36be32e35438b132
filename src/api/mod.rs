//! A PokéAPI client.

use std::io;

use reqwest::Client;
use reqwest::StatusCode;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

mod cache;
pub use cache::Cache;

/// The default PokéAPI base URL.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// An API client.
///
/// This type is the entrypoint for looking things up in PokéAPI. It does no
/// caching of its own; see [`crate::showdown::Resolver`] for that.
#[derive(Clone, Debug)]
pub struct Api {
  base_url: String,
  client: Client,
}

/// Options for constructing an [`Api`].
#[derive(Clone, Debug)]
pub struct Options {
  /// The base URL to point the client at.
  pub base_url: String,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
    }
  }
}

/// An [`Api`] client error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Http(#[from] reqwest::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error("no resource at {url}")]
  NotFound { url: String },

  #[error("unexpected status {status} from {url}")]
  Status { url: String, status: u16 },

  #[error("timed out looking up {slug:?}")]
  Timeout { slug: String },
}

impl Error {
  /// Returns whether this error means the resource simply does not exist, as
  /// opposed to the lookup failing.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}

impl Api {
  /// Creates a new [`Api`] with the default URL.
  pub fn new() -> Self {
    Self::with_options(Options::default())
  }

  /// Creates a new [`Api`] with the given options.
  pub fn with_options(opts: Options) -> Self {
    Self {
      base_url: opts.base_url.trim_end_matches('/').to_string(),
      client: Client::new(),
    }
  }

  /// Returns the base URL this client points at.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Base request-generating function.
  ///
  /// The body is decoded separately from the transfer so that a malformed
  /// response surfaces as [`Error::Json`] rather than [`Error::Http`].
  async fn request_json<T: DeserializeOwned>(
    &self,
    url: &str,
  ) -> Result<T, Error> {
    log::debug!("GET {}", url);
    let response = self.client.get(url).send().await?;

    match response.status() {
      StatusCode::NOT_FOUND => {
        return Err(Error::NotFound {
          url: url.to_string(),
        })
      }
      status if !status.is_success() => {
        return Err(Error::Status {
          url: url.to_string(),
          status: status.as_u16(),
        })
      }
      _ => {}
    }

    let buf = response.bytes().await?;
    Ok(serde_json::from_slice(&buf)?)
  }

  /// Returns the URL of the resource of type `T` with the given name.
  pub fn url_for<T: Endpoint>(&self, name: &str) -> String {
    format!("{}/{}/{}", self.base_url, T::NAME, name)
  }

  /// Try to get the specific resource of type `T` with the given name.
  pub async fn by_name<T: Endpoint>(&self, name: &str) -> Result<T, Error> {
    self.request_json(&self.url_for::<T>(name)).await
  }
}

impl Default for Api {
  fn default() -> Self {
    Self::new()
  }
}

/// An endpoint type, representing a type that can be requested directly from
/// an [`Api`].
pub trait Endpoint: DeserializeOwned {
  /// The name of the endpoint, used to construct the request.
  const NAME: &'static str;
}

/// The identifying part of a PokéAPI `pokemon` resource.
///
/// Everything else in the response is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRef {
  /// This Pokemon's numeric ID.
  pub id: u32,
  /// This Pokemon's API name.
  pub name: String,
}

impl Endpoint for PokemonRef {
  const NAME: &'static str = "pokemon";
}
