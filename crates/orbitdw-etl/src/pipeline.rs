//! The run driver: extract, archive, then load through a [`Warehouse`].
//!
//! A run walks `Uninitialized -> SchemaReady -> DimensionsLoaded ->
//! FactsLoaded -> Done`. Any error moves it to `Failed` and no later stage is
//! attempted. Every await is sequential; one request is in flight at a time.

use std::collections::{BTreeMap, BTreeSet};

use orbitdw_core::{
  Error, Result,
  ids::{ReferencedIds, extract_ids},
  keys::DimensionSet,
  record::{self, Dimension, Launch, Resource},
  source::LaunchSource,
  warehouse::{FactLoad, Warehouse},
};
use serde_json::{Map, Value};

use crate::snapshot::SnapshotSink;

// ─── Stages ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Uninitialized,
  SchemaReady,
  DimensionsLoaded,
  FactsLoaded,
  Done,
  Failed,
}

impl Stage {
  pub fn name(self) -> &'static str {
    match self {
      Stage::Uninitialized => "uninitialized",
      Stage::SchemaReady => "schema-ready",
      Stage::DimensionsLoaded => "dimensions-loaded",
      Stage::FactsLoaded => "facts-loaded",
      Stage::Done => "done",
      Stage::Failed => "failed",
    }
  }

  /// The only stage reachable from `self` on success.
  pub fn successor(self) -> Option<Stage> {
    match self {
      Stage::Uninitialized => Some(Stage::SchemaReady),
      Stage::SchemaReady => Some(Stage::DimensionsLoaded),
      Stage::DimensionsLoaded => Some(Stage::FactsLoaded),
      Stage::FactsLoaded => Some(Stage::Done),
      Stage::Done | Stage::Failed => None,
    }
  }
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Everything fetched from upstream during one run.
#[derive(Debug, Clone, Default)]
pub struct Extract {
  pub raw_launches:   Vec<Value>,
  pub launches:       Vec<Launch>,
  pub ids:            ReferencedIds,
  /// Raw dimension payloads keyed by the id they were requested with.
  pub raw_dimensions: BTreeMap<Dimension, Map<String, Value>>,
  pub dimensions:     DimensionSet,
}

/// Fetch the launch collection and every distinct entity it references.
/// Each identifier is requested exactly once; the first failure aborts.
pub async fn extract<S: LaunchSource>(source: &S) -> Result<Extract> {
  let raw_launches = source.fetch_collection(Resource::Launches).await?;
  let launches: Vec<Launch> = record::decode_all(Resource::Launches.path(), &raw_launches)?;
  let ids = extract_ids(&launches, &Dimension::ALL);

  tracing::info!(
    launches = launches.len(),
    rockets = ids[&Dimension::Rocket].len(),
    launchpads = ids[&Dimension::Launchpad].len(),
    "fetched launches"
  );

  let mut raw_dimensions = BTreeMap::new();
  let mut dimensions = DimensionSet::default();

  for (&dim, wanted) in &ids {
    let raw = fetch_dimension(source, dim, wanted).await?;
    for (id, value) in &raw {
      let endpoint = dim.resource().item_path(id);
      match dim {
        Dimension::Rocket => {
          dimensions
            .rockets
            .insert(id.clone(), record::decode(&endpoint, value.clone())?);
        }
        Dimension::Launchpad => {
          dimensions
            .launchpads
            .insert(id.clone(), record::decode(&endpoint, value.clone())?);
        }
      }
    }
    raw_dimensions.insert(dim, raw);
  }

  Ok(Extract { raw_launches, launches, ids, raw_dimensions, dimensions })
}

async fn fetch_dimension<S: LaunchSource>(
  source: &S,
  dim: Dimension,
  ids: &BTreeSet<String>,
) -> Result<Map<String, Value>> {
  let mut fetched = Map::new();
  for id in ids {
    let value = source.fetch_by_id(dim.resource(), id).await?;
    fetched.insert(id.clone(), value);
  }
  tracing::debug!(dimension = %dim, count = fetched.len(), "fetched dimension records");
  Ok(fetched)
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
  pub launches:      usize,
  pub rocket_ids:    usize,
  pub launchpad_ids: usize,
  pub facts:         FactLoad,
  pub stage:         Stage,
}

/// One run of the pipeline against a source and a warehouse.
///
/// A `Pipeline` is single-use: once it reaches `Done` or `Failed`, running
/// it again fails with [`Error::Stage`].
pub struct Pipeline<'a, S, W> {
  source:    &'a S,
  warehouse: &'a W,
  snapshots: Option<SnapshotSink>,
  stage:     Stage,
}

impl<'a, S, W> Pipeline<'a, S, W>
where
  S: LaunchSource,
  W: Warehouse,
{
  pub fn new(source: &'a S, warehouse: &'a W) -> Self {
    Self { source, warehouse, snapshots: None, stage: Stage::Uninitialized }
  }

  /// Archive raw payloads into `sink` before loading.
  pub fn with_snapshots(mut self, sink: SnapshotSink) -> Self {
    self.snapshots = Some(sink);
    self
  }

  pub fn stage(&self) -> Stage { self.stage }

  pub async fn run(&mut self) -> Result<RunSummary> {
    if self.stage != Stage::Uninitialized {
      return Err(Error::Stage {
        expected: Stage::Uninitialized.name(),
        found:    self.stage.name(),
      });
    }

    match self.run_stages().await {
      Ok(summary) => Ok(summary),
      Err(err) => {
        tracing::error!(stage = self.stage.name(), error = %err, "run failed");
        self.stage = Stage::Failed;
        Err(err)
      }
    }
  }

  async fn run_stages(&mut self) -> Result<RunSummary> {
    let fetched = extract(self.source).await?;

    if let Some(sink) = &self.snapshots {
      archive(sink, &fetched);
    }

    self.warehouse.ensure_schema().await.map_err(Error::storage)?;
    self.advance(Stage::SchemaReady)?;
    tracing::info!("schema ready");

    let keys = self
      .warehouse
      .load_dimensions(&fetched.dimensions)
      .await
      .map_err(Error::storage)?;
    self.advance(Stage::DimensionsLoaded)?;

    let facts = self
      .warehouse
      .load_facts(&fetched.launches, &keys)
      .await
      .map_err(Error::storage)?;
    self.advance(Stage::FactsLoaded)?;

    if facts.orphans > 0 {
      tracing::warn!(orphans = facts.orphans, "unresolved references stored as null");
    }
    tracing::info!(inserted = facts.inserted, skipped = facts.skipped, "loaded launches");

    self.advance(Stage::Done)?;

    Ok(RunSummary {
      launches: fetched.launches.len(),
      rocket_ids: fetched.ids[&Dimension::Rocket].len(),
      launchpad_ids: fetched.ids[&Dimension::Launchpad].len(),
      facts,
      stage: self.stage,
    })
  }

  fn advance(&mut self, to: Stage) -> Result<()> {
    if self.stage.successor() != Some(to) {
      return Err(Error::Stage {
        expected: self.stage.successor().unwrap_or(Stage::Failed).name(),
        found:    to.name(),
      });
    }
    tracing::debug!(from = self.stage.name(), to = to.name(), "stage");
    self.stage = to;
    Ok(())
  }
}

/// Run the pipeline once against `warehouse`, then close it whatever the
/// outcome. A run error takes precedence over a close error.
pub async fn run_with<S, W>(
  source: &S,
  warehouse: W,
  snapshots: Option<SnapshotSink>,
) -> Result<RunSummary>
where
  S: LaunchSource,
  W: Warehouse,
{
  let result = {
    let mut pipeline = Pipeline::new(source, &warehouse);
    if let Some(sink) = snapshots {
      pipeline = pipeline.with_snapshots(sink);
    }
    pipeline.run().await
  };

  let closed = warehouse.close().await.map_err(Error::storage);
  match (result, closed) {
    (Ok(summary), Ok(())) => Ok(summary),
    (Ok(_), Err(err)) => Err(err),
    (Err(err), closed) => {
      if let Err(close_err) = closed {
        tracing::warn!(error = %close_err, "failed to close warehouse after failed run");
      }
      Err(err)
    }
  }
}

/// Best-effort archive of the raw payloads; failures are only logged.
fn archive(sink: &SnapshotSink, extract: &Extract) {
  let documents: [(&str, Value); 3] = [
    ("launches", Value::Array(extract.raw_launches.clone())),
    ("rockets", raw_dimension(extract, Dimension::Rocket)),
    ("launchpads", raw_dimension(extract, Dimension::Launchpad)),
  ];

  for (name, doc) in &documents {
    match sink.write(name, doc) {
      Ok(path) => tracing::debug!(path = %path.display(), "wrote snapshot"),
      Err(err) => tracing::warn!(error = %err, "snapshot skipped"),
    }
  }
}

fn raw_dimension(extract: &Extract, dim: Dimension) -> Value {
  Value::Object(extract.raw_dimensions.get(&dim).cloned().unwrap_or_default())
}
