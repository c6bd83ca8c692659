//! Identifier extraction: the distinct foreign keys a fact stream references.
//!
//! The returned sets are owned by a single run. They decide which dimension
//! entities get fetched and are dropped once those fetches complete.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::{Dimension, Launch};

/// A fact record that carries references to dimension entities.
pub trait FactRecord {
  /// The natural key referenced for `dim`, if the field is present.
  fn reference(&self, dim: Dimension) -> Option<&str>;
}

impl FactRecord for Launch {
  fn reference(&self, dim: Dimension) -> Option<&str> { Launch::reference(self, dim) }
}

/// Distinct referenced identifiers, per dimension.
pub type ReferencedIds = BTreeMap<Dimension, BTreeSet<String>>;

/// Collect the distinct, non-empty identifiers each fact references through
/// `fields`. Every requested field gets an entry, even when no fact uses it.
pub fn extract_ids<F: FactRecord>(facts: &[F], fields: &[Dimension]) -> ReferencedIds {
  let mut ids: ReferencedIds =
    fields.iter().map(|&dim| (dim, BTreeSet::new())).collect();

  for fact in facts {
    for &dim in fields {
      if let Some(id) = fact.reference(dim).filter(|id| !id.is_empty())
        && let Some(set) = ids.get_mut(&dim)
      {
        set.insert(id.to_owned());
      }
    }
  }

  ids
}
