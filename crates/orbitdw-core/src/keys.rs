//! Fetched dimension maps and the natural-to-surrogate key mappings built
//! from them.

use std::collections::{BTreeMap, HashMap};

use crate::record::{Dimension, Launch, Launchpad, Rocket};

/// A storage-assigned integer key. Stable for the lifetime of its row.
pub type SurrogateKey = i64;

/// Natural key -> surrogate key for one dimension table.
pub type KeyMap = HashMap<String, SurrogateKey>;

// ─── Dimension maps ──────────────────────────────────────────────────────────

/// Dimension records fetched during one run, keyed by the natural key the
/// launches referenced them with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionSet {
  pub rockets:    BTreeMap<String, Rocket>,
  pub launchpads: BTreeMap<String, Launchpad>,
}

// ─── Key mappings ────────────────────────────────────────────────────────────

/// Surrogate keys for every row present in each dimension table, including
/// rows inserted by earlier runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMappings {
  pub rockets:    KeyMap,
  pub launchpads: KeyMap,
}

impl KeyMappings {
  pub fn get(&self, dim: Dimension) -> &KeyMap {
    match dim {
      Dimension::Rocket => &self.rockets,
      Dimension::Launchpad => &self.launchpads,
    }
  }

  /// Resolve a reference to its surrogate key. Absent references and
  /// references with no row resolve to `None`.
  pub fn resolve(&self, dim: Dimension, natural_id: Option<&str>) -> Option<SurrogateKey> {
    natural_id.and_then(|id| self.get(dim).get(id).copied())
  }

  /// Resolve every reference on `launch` into a row ready for insertion.
  pub fn resolve_launch(&self, launch: &Launch) -> ResolvedLaunch {
    let rocket_key = self.resolve(Dimension::Rocket, launch.reference(Dimension::Rocket));
    let launchpad_key =
      self.resolve(Dimension::Launchpad, launch.reference(Dimension::Launchpad));

    let orphans = [(Dimension::Rocket, rocket_key), (Dimension::Launchpad, launchpad_key)]
      .into_iter()
      .filter(|&(dim, key)| {
        key.is_none() && launch.reference(dim).is_some_and(|id| !id.is_empty())
      })
      .count();

    ResolvedLaunch {
      spacex_id: launch.id.clone(),
      name: launch.name.clone(),
      date_utc: launch.date_utc.clone(),
      success: launch.success,
      rocket_key,
      launchpad_key,
      details: launch.details.clone(),
      orphans,
    }
  }
}

/// A launch with its references replaced by surrogate keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLaunch {
  pub spacex_id:     String,
  pub name:          Option<String>,
  pub date_utc:      Option<String>,
  pub success:       Option<bool>,
  pub rocket_key:    Option<SurrogateKey>,
  pub launchpad_key: Option<SurrogateKey>,
  pub details:       Option<String>,
  /// References that were present on the launch but did not resolve.
  pub orphans:       usize,
}
