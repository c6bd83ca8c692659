//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Booleans are stored as `0`/`1`; the launch outcome keeps `NULL` for
//! "unknown". Launch dates are stored exactly as received.

use orbitdw_core::{
  record::{Launchpad, Rocket},
  warehouse::{LaunchRow, LaunchpadRow, RocketRow},
};

// ─── Insert parameters ───────────────────────────────────────────────────────

/// Owned column values for one `rockets` insert.
pub struct RocketInsert {
  pub spacex_id: String,
  pub name:      Option<String>,
  pub kind:      Option<String>,
  pub active:    bool,
}

impl RocketInsert {
  pub fn new(spacex_id: &str, rocket: &Rocket) -> Self {
    Self {
      spacex_id: spacex_id.to_owned(),
      name:      rocket.name.clone(),
      kind:      rocket.kind.clone(),
      active:    rocket.is_active(),
    }
  }
}

/// Owned column values for one `launchpads` insert.
pub struct LaunchpadInsert {
  pub spacex_id: String,
  pub name:      Option<String>,
  pub region:    Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
}

impl LaunchpadInsert {
  pub fn new(spacex_id: &str, pad: &Launchpad) -> Self {
    Self {
      spacex_id: spacex_id.to_owned(),
      name:      pad.name.clone(),
      region:    pad.region.clone(),
      latitude:  pad.latitude,
      longitude: pad.longitude,
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub fn rocket_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RocketRow> {
  Ok(RocketRow {
    key:       row.get(0)?,
    spacex_id: row.get(1)?,
    name:      row.get(2)?,
    kind:      row.get(3)?,
    active:    row.get(4)?,
  })
}

pub fn launchpad_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LaunchpadRow> {
  Ok(LaunchpadRow {
    key:       row.get(0)?,
    spacex_id: row.get(1)?,
    name:      row.get(2)?,
    region:    row.get(3)?,
    latitude:  row.get(4)?,
    longitude: row.get(5)?,
  })
}

pub fn launch_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LaunchRow> {
  Ok(LaunchRow {
    key:           row.get(0)?,
    spacex_id:     row.get(1)?,
    name:          row.get(2)?,
    date_utc:      row.get(3)?,
    success:       row.get(4)?,
    rocket_key:    row.get(5)?,
    launchpad_key: row.get(6)?,
    details:       row.get(7)?,
  })
}
