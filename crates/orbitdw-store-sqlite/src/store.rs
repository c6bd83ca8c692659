//! [`SqliteWarehouse`] — the SQLite implementation of [`Warehouse`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use orbitdw_core::{
  keys::{DimensionSet, KeyMap, KeyMappings, ResolvedLaunch},
  record::Launch,
  warehouse::{FactLoad, LaunchRow, LaunchpadRow, RocketRow, Warehouse},
};

use crate::{
  Error, Result,
  encode::{
    LaunchpadInsert, RocketInsert, launch_row, launchpad_row, rocket_row,
  },
  schema::{LAUNCHPADS, ROCKETS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A launch warehouse backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The schema
/// flag is shared between clones.
#[derive(Clone)]
pub struct SqliteWarehouse {
  conn:         tokio_rusqlite::Connection,
  schema_ready: Arc<AtomicBool>,
}

impl SqliteWarehouse {
  /// Open (or create) a warehouse at `path`, creating parent directories.
  ///
  /// The schema is not touched; call [`Warehouse::ensure_schema`] before
  /// loading.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
      })?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::configure(conn).await
  }

  /// Open an in-memory warehouse — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::configure(conn).await
  }

  async fn configure(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, schema_ready: Arc::new(AtomicBool::new(false)) })
  }

  fn require_schema(&self) -> Result<()> {
    if self.schema_ready.load(Ordering::Acquire) {
      Ok(())
    } else {
      Err(Error::SchemaNotReady)
    }
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

/// Insert rockets absent by natural key in one transaction. Returns the
/// number of new rows.
fn insert_rockets(
  conn: &mut rusqlite::Connection,
  rows: &[RocketInsert],
) -> rusqlite::Result<usize> {
  let tx = conn.transaction()?;
  let mut inserted = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO rockets (spacex_id, name, type, active)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT (spacex_id) DO NOTHING",
    )?;
    for r in rows {
      inserted += stmt.execute(rusqlite::params![r.spacex_id, r.name, r.kind, r.active])?;
    }
  }
  tx.commit()?;
  Ok(inserted)
}

fn insert_launchpads(
  conn: &mut rusqlite::Connection,
  rows: &[LaunchpadInsert],
) -> rusqlite::Result<usize> {
  let tx = conn.transaction()?;
  let mut inserted = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO launchpads (spacex_id, name, region, latitude, longitude)
       VALUES (?1, ?2, ?3, ?4, ?5)
       ON CONFLICT (spacex_id) DO NOTHING",
    )?;
    for p in rows {
      inserted += stmt.execute(rusqlite::params![
        p.spacex_id,
        p.name,
        p.region,
        p.latitude,
        p.longitude,
      ])?;
    }
  }
  tx.commit()?;
  Ok(inserted)
}

/// Read the whole natural-to-surrogate mapping of a dimension table.
fn read_key_map(conn: &rusqlite::Connection, table: &str) -> rusqlite::Result<KeyMap> {
  let mut stmt = conn.prepare(&format!("SELECT spacex_id, id FROM {table}"))?;
  stmt
    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
    .collect()
}

// ─── Warehouse impl ──────────────────────────────────────────────────────────

impl Warehouse for SqliteWarehouse {
  type Error = Error;

  async fn ensure_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    self.schema_ready.store(true, Ordering::Release);
    Ok(())
  }

  async fn load_dimensions<'a>(&'a self, dims: &'a DimensionSet) -> Result<KeyMappings> {
    self.require_schema()?;

    let rockets: Vec<RocketInsert> = dims
      .rockets
      .iter()
      .map(|(id, rocket)| RocketInsert::new(id, rocket))
      .collect();
    let launchpads: Vec<LaunchpadInsert> = dims
      .launchpads
      .iter()
      .map(|(id, pad)| LaunchpadInsert::new(id, pad))
      .collect();
    let (rockets_fetched, launchpads_fetched) = (rockets.len(), launchpads.len());

    let (keys, rockets_inserted, launchpads_inserted) = self
      .conn
      .call(move |conn| {
        let rockets_inserted = insert_rockets(conn, &rockets)?;
        let launchpads_inserted = insert_launchpads(conn, &launchpads)?;

        let keys = KeyMappings {
          rockets:    read_key_map(conn, ROCKETS)?,
          launchpads: read_key_map(conn, LAUNCHPADS)?,
        };
        Ok((keys, rockets_inserted, launchpads_inserted))
      })
      .await?;

    tracing::info!(
      fetched = rockets_fetched,
      inserted = rockets_inserted,
      present = rockets_fetched - rockets_inserted,
      "loaded rockets"
    );
    tracing::info!(
      fetched = launchpads_fetched,
      inserted = launchpads_inserted,
      present = launchpads_fetched - launchpads_inserted,
      "loaded launchpads"
    );

    Ok(keys)
  }

  async fn load_facts<'a>(
    &'a self,
    launches: &'a [Launch],
    keys: &'a KeyMappings,
  ) -> Result<FactLoad> {
    self.require_schema()?;

    let rows: Vec<ResolvedLaunch> =
      launches.iter().map(|launch| keys.resolve_launch(launch)).collect();
    let orphans = rows.iter().map(|row| row.orphans).sum();
    let total = rows.len();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO launches (
               spacex_id, name, date_utc, success,
               rocket_id, launchpad_id, details
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (spacex_id) DO NOTHING",
          )?;
          for row in &rows {
            inserted += stmt.execute(rusqlite::params![
              row.spacex_id,
              row.name,
              row.date_utc,
              row.success,
              row.rocket_key,
              row.launchpad_key,
              row.details,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(FactLoad { inserted, skipped: total - inserted, orphans })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn rockets(&self) -> Result<Vec<RocketRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, spacex_id, name, type, active FROM rockets ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], rocket_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn launchpads(&self) -> Result<Vec<LaunchpadRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, spacex_id, name, region, latitude, longitude
           FROM launchpads ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], launchpad_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn launches(&self) -> Result<Vec<LaunchRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, spacex_id, name, date_utc, success,
                  rocket_id, launchpad_id, details
           FROM launches ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], launch_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}
