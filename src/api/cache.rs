//! Caching utilities.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::api::Error;

#[cfg(doc)]
use crate::showdown::Resolver;

/// A hybrid memory/disk cache, for caching resolved species IDs.
///
/// This cache works by maintaining a fixed-size LRU cache in memory; every
/// new entry is also written through to disk in a chosen directory, so that
/// entries evicted from memory can still be recovered.
///
/// When looking things up in the cache, cache misses go to disk before the
/// caller falls back to a network request.
///
/// A [`Cache`] is shared by reference between concurrent lookups in a
/// [`Resolver`]; the lock is only held for in-memory bookkeeping.
pub struct Cache {
  lru: Mutex<Lru>,
  file_root: Option<PathBuf>,
}

struct Lru {
  map: HashMap<String, Entry>,
  capacity: usize,
  clock: u64,
}

struct Entry {
  val: u32,
  last_used: u64,
}

impl Cache {
  /// Creates a new [`Cache`] with the given in-memory capacity.
  ///
  /// The returned [`Cache`] will use a default location for the disk cache,
  /// or none at all if there is no home directory.
  #[inline]
  pub fn new(capacity: usize) -> Self {
    Self::ctor(capacity, Self::default_dir())
  }

  /// Creates a new [`Cache`] with the given in-memory capacity.
  ///
  /// The returned [`Cache`] will not cache to disk.
  #[inline]
  pub fn no_disk(capacity: usize) -> Self {
    Self::ctor(capacity, None)
  }

  /// Creates a new [`Cache`] with the given in-memory capacity.
  ///
  /// The returned [`Cache`] will cache to disk at the specified location.
  #[inline]
  pub fn with_dir(capacity: usize, cache_dir: PathBuf) -> Self {
    Self::ctor(capacity, Some(cache_dir))
  }

  /// Returns the default disk cache location, `~/.pkmn-cache`.
  pub fn default_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|mut path| {
      path.push(".pkmn-cache");
      path
    })
  }

  /// Constructs a new `Cache`.
  fn ctor(capacity: usize, file_root: Option<PathBuf>) -> Self {
    Self {
      lru: Mutex::new(Lru {
        map: HashMap::new(),
        capacity,
        clock: 0,
      }),
      file_root,
    }
  }

  /// Returns the directory this cache writes to, if any.
  pub fn dir(&self) -> Option<&Path> {
    self.file_root.as_deref()
  }

  /// Looks up the value for `k`.
  ///
  /// First, this function checks the in-memory cache; then it checks the disk
  /// cache. A disk hit is promoted back into memory.
  pub fn get(&self, k: &str) -> Result<Option<u32>, Error> {
    if let Some(val) = self.lock().touch(k) {
      return Ok(Some(val));
    }

    let val = match self.unearth(k)? {
      Some(val) => val,
      None => return Ok(None),
    };
    self.lock().insert(k, val);
    Ok(Some(val))
  }

  /// Records a value for `k`, in memory and on disk.
  pub fn insert(&self, k: &str, v: u32) -> Result<(), Error> {
    self.lock().insert(k, v);
    self.bury(k, v)
  }

  /// Returns the number of entries currently held in memory.
  pub fn len(&self) -> usize {
    self.lock().map.len()
  }

  /// Returns whether nothing is currently held in memory.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> MutexGuard<'_, Lru> {
    // Every update is a single map operation, so poisoning is harmless.
    match self.lru.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }

  /// Writes a key/value pair to the disk cache.
  fn bury(&self, k: &str, v: u32) -> Result<(), Error> {
    let path = match self.key_path(k) {
      Some(path) => path,
      None => return Ok(()),
    };

    fs::write(&path, serde_json::to_vec(&v)?)?;
    Ok(())
  }

  /// Try to pull a value out of the disk cache.
  fn unearth(&self, k: &str) -> Result<Option<u32>, Error> {
    let path = match self.key_path(k) {
      Some(path) => path,
      None => return Ok(None),
    };
    if !path.exists() {
      return Ok(None);
    }

    let val = serde_json::from_slice(&fs::read(path)?)?;
    Ok(Some(val))
  }

  /// Returns the file backing `k`, creating the cache directory if needed.
  fn key_path(&self, k: &str) -> Option<PathBuf> {
    let mut path = self.file_root.clone()?;
    if !path.exists() && fs::create_dir_all(&path).is_err() {
      return None;
    }
    path.push(&Self::encode_key(k));
    Some(path)
  }

  /// Encodes `key` for the purposes of being a file name for the disk cache.
  fn encode_key(key: &str) -> String {
    base64::encode_config(key.as_bytes(), base64::URL_SAFE)
  }
}

impl Lru {
  /// Looks up `k`, marking it as most recently used.
  fn touch(&mut self, k: &str) -> Option<u32> {
    self.clock += 1;
    let clock = self.clock;
    self.map.get_mut(k).map(|entry| {
      entry.last_used = clock;
      entry.val
    })
  }

  fn insert(&mut self, k: &str, v: u32) {
    // If the capacity is zero, do nothing.
    if self.capacity == 0 {
      return;
    }

    self.clock += 1;
    if !self.map.contains_key(k) && self.map.len() >= self.capacity {
      // If the cache is full, we need to evict the least recent entry.
      let oldest = self
        .map
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(key, _)| key.clone());
      if let Some(oldest) = oldest {
        self.map.remove(&oldest);
      }
    }

    self.map.insert(
      k.to_string(),
      Entry {
        val: v,
        last_used: self.clock,
      },
    );
  }
}

#[cfg(test)]
mod cache_test {
  use pretty_assertions::assert_eq;

  use super::Cache;

  #[test]
  fn memory_hit() {
    let cache = Cache::no_disk(4);
    cache.insert("pikachu", 25).unwrap();
    assert_eq!(cache.get("pikachu").unwrap(), Some(25));
    assert_eq!(cache.get("raichu").unwrap(), None);
  }

  #[test]
  fn evicts_least_recently_used() {
    let cache = Cache::no_disk(2);
    cache.insert("bulbasaur", 1).unwrap();
    cache.insert("ivysaur", 2).unwrap();
    assert_eq!(cache.get("bulbasaur").unwrap(), Some(1));

    cache.insert("venusaur", 3).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("ivysaur").unwrap(), None);
    assert_eq!(cache.get("bulbasaur").unwrap(), Some(1));
    assert_eq!(cache.get("venusaur").unwrap(), Some(3));
  }

  #[test]
  fn zero_capacity_keeps_nothing_in_memory() {
    let cache = Cache::no_disk(0);
    cache.insert("pikachu", 25).unwrap();
    assert!(cache.is_empty());
    assert_eq!(cache.get("pikachu").unwrap(), None);
  }

  #[test]
  fn evicted_entries_come_back_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::with_dir(1, dir.path().to_path_buf());
    cache.insert("nidoran-male", 32).unwrap();
    cache.insert("nidoran-female", 29).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("nidoran-male").unwrap(), Some(32));
    assert_eq!(cache.get("nidoran-female").unwrap(), Some(29));
  }

  #[test]
  fn disk_survives_a_new_cache() {
    let dir = tempfile::tempdir().unwrap();
    Cache::with_dir(8, dir.path().to_path_buf())
      .insert("mr-mime", 122)
      .unwrap();

    let cache = Cache::with_dir(8, dir.path().to_path_buf());
    assert_eq!(cache.get("mr-mime").unwrap(), Some(122));
  }
}
