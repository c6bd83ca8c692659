//! Typed records decoded from upstream payloads.
//!
//! The upstream API returns loosely-typed JSON objects. Each entity gets an
//! explicit struct here; unknown fields are ignored and absent optional fields
//! decode to `None`.

use std::fmt;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result};

// ─── Resources ───────────────────────────────────────────────────────────────

/// A collection exposed by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
  Launches,
  Rockets,
  Launchpads,
}

impl Resource {
  /// Path segment of the collection endpoint.
  pub fn path(self) -> &'static str {
    match self {
      Resource::Launches => "launches",
      Resource::Rockets => "rockets",
      Resource::Launchpads => "launchpads",
    }
  }

  /// Endpoint of a single entity, e.g. `rockets/5e9d0d95eda69955f709d1eb`.
  pub fn item_path(self, id: &str) -> String { format!("{}/{id}", self.path()) }
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.path())
  }
}

/// A dimension referenced by launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
  Rocket,
  Launchpad,
}

impl Dimension {
  pub const ALL: [Dimension; 2] = [Dimension::Rocket, Dimension::Launchpad];

  /// Name of the reference field on a launch payload.
  pub fn field(self) -> &'static str {
    match self {
      Dimension::Rocket => "rocket",
      Dimension::Launchpad => "launchpad",
    }
  }

  pub fn resource(self) -> Resource {
    match self {
      Dimension::Rocket => Resource::Rockets,
      Dimension::Launchpad => Resource::Launchpads,
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.field())
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A launch — the fact record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Launch {
  /// Natural key assigned upstream.
  pub id:        String,
  #[serde(default)]
  pub name:      Option<String>,
  /// Launch time as sent upstream; stored verbatim.
  #[serde(default)]
  pub date_utc:  Option<String>,
  /// `None` means the outcome is unknown, which is distinct from a failure.
  #[serde(default, deserialize_with = "truthy")]
  pub success:   Option<bool>,
  /// Natural key of the rocket, if any.
  #[serde(default)]
  pub rocket:    Option<String>,
  /// Natural key of the launchpad, if any.
  #[serde(default)]
  pub launchpad: Option<String>,
  #[serde(default)]
  pub details:   Option<String>,
}

impl Launch {
  /// The natural key stored in the launch's reference field for `dim`.
  pub fn reference(&self, dim: Dimension) -> Option<&str> {
    match dim {
      Dimension::Rocket => self.rocket.as_deref(),
      Dimension::Launchpad => self.launchpad.as_deref(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rocket {
  #[serde(default)]
  pub name:   Option<String>,
  #[serde(default, rename = "type")]
  pub kind:   Option<String>,
  #[serde(default, deserialize_with = "truthy")]
  pub active: Option<bool>,
}

impl Rocket {
  /// Two-valued form of `active`; an absent flag counts as inactive.
  pub fn is_active(&self) -> bool { self.active.unwrap_or(false) }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Launchpad {
  #[serde(default)]
  pub name:      Option<String>,
  #[serde(default)]
  pub region:    Option<String>,
  #[serde(default)]
  pub latitude:  Option<f64>,
  #[serde(default)]
  pub longitude: Option<f64>,
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Decode one raw payload fetched from `endpoint` into a typed record.
pub fn decode<T: DeserializeOwned>(endpoint: &str, raw: Value) -> Result<T> {
  serde_json::from_value(raw).map_err(|e| Error::format(endpoint, e))
}

/// Decode every element of a raw collection, failing on the first bad one.
pub fn decode_all<T: DeserializeOwned>(
  endpoint: &str,
  raw: &[Value],
) -> Result<Vec<T>> {
  raw
    .iter()
    .enumerate()
    .map(|(idx, value)| {
      serde_json::from_value(value.clone())
        .map_err(|e| Error::format(endpoint, format!("element {idx}: {e}")))
    })
    .collect()
}

/// Read a boolean-like value by truthiness. `null` and absent stay `None`.
fn truthy<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| match v {
    Value::Null => None,
    Value::Bool(b) => Some(b),
    Value::Number(n) => Some(n.as_f64() != Some(0.0)),
    Value::String(s) => Some(!s.is_empty()),
    Value::Array(a) => Some(!a.is_empty()),
    Value::Object(o) => Some(!o.is_empty()),
  }))
}
