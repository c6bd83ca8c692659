//! Integration tests for `SqliteWarehouse` against an in-memory database.

use std::collections::BTreeMap;

use orbitdw_core::{
  keys::{DimensionSet, KeyMappings},
  record::{Launch, Launchpad, Rocket, decode},
  warehouse::Warehouse,
};
use serde_json::json;

use crate::{Error, SqliteWarehouse};

async fn warehouse() -> SqliteWarehouse {
  let w = SqliteWarehouse::open_in_memory()
    .await
    .expect("in-memory warehouse");
  w.ensure_schema().await.expect("schema");
  w
}

fn rocket(name: &str, active: Option<bool>) -> Rocket {
  Rocket { name: Some(name.into()), kind: Some("rocket".into()), active }
}

fn launchpad(name: &str) -> Launchpad {
  Launchpad {
    name:      Some(name.into()),
    region:    Some("Florida".into()),
    latitude:  Some(28.5618571),
    longitude: Some(-80.577366),
  }
}

fn dims(rockets: &[&str], launchpads: &[&str]) -> DimensionSet {
  DimensionSet {
    rockets:    rockets
      .iter()
      .map(|id| (id.to_string(), rocket(&format!("rocket {id}"), Some(true))))
      .collect(),
    launchpads: launchpads
      .iter()
      .map(|id| (id.to_string(), launchpad(&format!("pad {id}"))))
      .collect(),
  }
}

fn launch(id: &str, rocket: Option<&str>, launchpad: Option<&str>) -> Launch {
  Launch {
    id:        id.into(),
    name:      Some(format!("launch {id}")),
    date_utc:  None,
    success:   Some(true),
    rocket:    rocket.map(Into::into),
    launchpad: launchpad.map(Into::into),
    details:   None,
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_schema_is_repeatable_and_keeps_data() {
  let w = warehouse().await;
  let keys = w.load_dimensions(&dims(&["r1"], &["p1"])).await.unwrap();
  w.load_facts(&[launch("l1", Some("r1"), Some("p1"))], &keys)
    .await
    .unwrap();

  w.ensure_schema().await.unwrap();
  w.ensure_schema().await.unwrap();

  assert_eq!(w.rockets().await.unwrap().len(), 1);
  assert_eq!(w.launchpads().await.unwrap().len(), 1);
  assert_eq!(w.launches().await.unwrap().len(), 1);
}

#[tokio::test]
async fn loaders_require_schema() {
  let w = SqliteWarehouse::open_in_memory().await.unwrap();

  let err = w.load_dimensions(&DimensionSet::default()).await.unwrap_err();
  assert!(matches!(err, Error::SchemaNotReady));

  let err = w.load_facts(&[], &KeyMappings::default()).await.unwrap_err();
  assert!(matches!(err, Error::SchemaNotReady));
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_dimensions_maps_every_fetched_id() {
  let w = warehouse().await;
  let keys = w
    .load_dimensions(&dims(&["r1", "r2"], &["p1"]))
    .await
    .unwrap();

  assert_eq!(keys.rockets.len(), 2);
  assert_eq!(keys.launchpads.len(), 1);

  let stored = w.rockets().await.unwrap();
  for row in stored {
    assert_eq!(keys.rockets[&row.spacex_id], row.key);
  }
}

#[tokio::test]
async fn earlier_rows_still_resolve() {
  let w = warehouse().await;
  let first = w.load_dimensions(&dims(&["r1"], &[])).await.unwrap();
  let r1 = first.rockets["r1"];

  let second = w.load_dimensions(&dims(&["r2"], &[])).await.unwrap();

  assert_eq!(second.rockets["r1"], r1);
  assert!(second.rockets.contains_key("r2"));
  assert_ne!(second.rockets["r2"], r1);
  assert_eq!(w.rockets().await.unwrap().len(), 2);
}

#[tokio::test]
async fn reloading_a_dimension_keeps_its_key_and_columns() {
  let w = warehouse().await;
  let first = w.load_dimensions(&dims(&["r1"], &[])).await.unwrap();

  let renamed = DimensionSet {
    rockets: BTreeMap::from([("r1".to_owned(), rocket("renamed", Some(false)))]),
    ..Default::default()
  };
  let second = w.load_dimensions(&renamed).await.unwrap();

  assert_eq!(first, second);
  let rows = w.rockets().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].name.as_deref(), Some("rocket r1"));
  assert!(rows[0].active);
}

#[tokio::test]
async fn missing_active_flag_is_stored_as_false() {
  let w = warehouse().await;
  let set = DimensionSet {
    rockets: BTreeMap::from([
      ("r1".to_owned(), rocket("Falcon 1", None)),
      ("r2".to_owned(), rocket("Falcon 9", Some(true))),
    ]),
    ..Default::default()
  };
  w.load_dimensions(&set).await.unwrap();

  let rows = w.rockets().await.unwrap();
  let active: BTreeMap<_, _> =
    rows.iter().map(|r| (r.spacex_id.as_str(), r.active)).collect();
  assert!(!active["r1"]);
  assert!(active["r2"]);
}

#[tokio::test]
async fn launchpad_columns_roundtrip() {
  let w = warehouse().await;
  let set = DimensionSet {
    launchpads: BTreeMap::from([(
      "p1".to_owned(),
      Launchpad {
        name:      Some("VAFB SLC 4E".into()),
        region:    None,
        latitude:  None,
        longitude: Some(-120.6),
      },
    )]),
    ..Default::default()
  };
  w.load_dimensions(&set).await.unwrap();

  let rows = w.launchpads().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].spacex_id, "p1");
  assert_eq!(rows[0].region, None);
  assert_eq!(rows[0].latitude, None);
  assert_eq!(rows[0].longitude, Some(-120.6));
}

// ─── Facts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn facts_reference_surrogate_keys() {
  let w = warehouse().await;
  let keys = w.load_dimensions(&dims(&["r1", "r2"], &["p1"])).await.unwrap();

  let report = w
    .load_facts(&[launch("l1", Some("r2"), Some("p1"))], &keys)
    .await
    .unwrap();
  assert_eq!(report.inserted, 1);

  let rows = w.launches().await.unwrap();
  assert_eq!(rows[0].rocket_key, Some(keys.rockets["r2"]));
  assert_eq!(rows[0].launchpad_key, Some(keys.launchpads["p1"]));
}

#[tokio::test]
async fn orphan_and_absent_references_store_null() {
  let w = warehouse().await;
  let keys = w.load_dimensions(&dims(&["r1"], &[])).await.unwrap();

  let report = w
    .load_facts(
      &[
        launch("orphan", Some("missing"), Some("also-missing")),
        launch("absent", None, None),
      ],
      &keys,
    )
    .await
    .unwrap();

  assert_eq!(report.inserted, 2);
  assert_eq!(report.orphans, 2);
  for row in w.launches().await.unwrap() {
    assert_eq!(row.rocket_key, None);
    assert_eq!(row.launchpad_key, None);
  }
}

#[tokio::test]
async fn duplicate_fact_is_inserted_once() {
  let w = warehouse().await;
  let keys = w.load_dimensions(&dims(&["r1"], &[])).await.unwrap();
  let facts = [launch("l1", Some("r1"), None)];

  let first = w.load_facts(&facts, &keys).await.unwrap();
  let second = w.load_facts(&facts, &keys).await.unwrap();

  assert_eq!((first.inserted, first.skipped), (1, 0));
  assert_eq!((second.inserted, second.skipped), (0, 1));
  assert_eq!(w.launches().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_within_one_batch_is_inserted_once() {
  let w = warehouse().await;
  let facts = [launch("l1", None, None), launch("l1", None, None)];

  let report = w.load_facts(&facts, &KeyMappings::default()).await.unwrap();

  assert_eq!((report.inserted, report.skipped), (1, 1));
}

#[tokio::test]
async fn success_keeps_three_states() {
  let w = warehouse().await;
  let facts: Vec<Launch> = [
    json!({ "id": "ok", "success": true }),
    json!({ "id": "failed", "success": false }),
    json!({ "id": "unknown" }),
  ]
  .into_iter()
  .map(|raw| decode("launches", raw).unwrap())
  .collect();

  w.load_facts(&facts, &KeyMappings::default()).await.unwrap();

  let stored: BTreeMap<_, _> = w
    .launches()
    .await
    .unwrap()
    .into_iter()
    .map(|row| (row.spacex_id, row.success))
    .collect();
  assert_eq!(stored["ok"], Some(true));
  assert_eq!(stored["failed"], Some(false));
  assert_eq!(stored["unknown"], None);
}

#[tokio::test]
async fn launch_date_is_stored_unchanged() {
  let w = warehouse().await;
  let facts: Vec<Launch> = [
    json!({ "id": "precise", "date_utc": "2006-03-24T22:30:00.123456Z", "details": "Ratsat" }),
    json!({ "id": "day-only", "date_utc": "2006-03-24" }),
  ]
  .into_iter()
  .map(|raw| decode("launches", raw).unwrap())
  .collect();

  w.load_facts(&facts, &KeyMappings::default()).await.unwrap();

  let rows = w.launches().await.unwrap();
  assert_eq!(rows[0].date_utc.as_deref(), Some("2006-03-24T22:30:00.123456Z"));
  assert_eq!(rows[0].details.as_deref(), Some("Ratsat"));
  assert_eq!(rows[1].date_utc.as_deref(), Some("2006-03-24"));
}

#[tokio::test]
async fn full_reload_is_a_noop() {
  let w = warehouse().await;
  let set = dims(&["r1", "r2"], &["p1"]);
  let facts = [
    launch("l1", Some("r1"), Some("p1")),
    launch("l2", Some("r2"), None),
  ];

  let keys = w.load_dimensions(&set).await.unwrap();
  w.load_facts(&facts, &keys).await.unwrap();
  let before = (
    w.rockets().await.unwrap(),
    w.launchpads().await.unwrap(),
    w.launches().await.unwrap(),
  );

  let keys_again = w.load_dimensions(&set).await.unwrap();
  let report = w.load_facts(&facts, &keys_again).await.unwrap();
  let after = (
    w.rockets().await.unwrap(),
    w.launchpads().await.unwrap(),
    w.launches().await.unwrap(),
  );

  assert_eq!(keys, keys_again);
  assert_eq!(report.inserted, 0);
  assert_eq!(before, after);
}

// ─── On-disk ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn keys_survive_reopening_the_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("warehouse.db");

  let first = {
    let w = SqliteWarehouse::open(&path).await.unwrap();
    w.ensure_schema().await.unwrap();
    let keys = w.load_dimensions(&dims(&["r1"], &["p1"])).await.unwrap();
    w.close().await.unwrap();
    keys
  };

  let w = SqliteWarehouse::open(&path).await.unwrap();
  w.ensure_schema().await.unwrap();
  let second = w.load_dimensions(&dims(&["r2"], &[])).await.unwrap();

  assert_eq!(second.rockets["r1"], first.rockets["r1"]);
  assert_eq!(second.launchpads["p1"], first.launchpads["p1"]);
  assert_eq!(second.rockets.len(), 2);
}
