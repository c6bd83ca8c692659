//! SQL schema for the launch warehouse.
//!
//! Two dimension tables and one fact table. Every table carries an
//! `AUTOINCREMENT` surrogate key, so keys are never reused, and a unique
//! natural key (`spacex_id`) that makes every insert idempotent.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rockets (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    spacex_id  TEXT NOT NULL UNIQUE,
    name       TEXT,
    type       TEXT,
    active     INTEGER NOT NULL CHECK (active IN (0, 1))
);

CREATE TABLE IF NOT EXISTS launchpads (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    spacex_id  TEXT NOT NULL UNIQUE,
    name       TEXT,
    region     TEXT,
    latitude   REAL,
    longitude  REAL
);

-- success: 1 = succeeded, 0 = failed, NULL = unknown.
CREATE TABLE IF NOT EXISTS launches (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    spacex_id     TEXT NOT NULL UNIQUE,
    name          TEXT,
    date_utc      TEXT,            -- verbatim upstream value
    success       INTEGER CHECK (success IN (0, 1)),
    rocket_id     INTEGER REFERENCES rockets(id),
    launchpad_id  INTEGER REFERENCES launchpads(id),
    details       TEXT
);

CREATE INDEX IF NOT EXISTS launches_rocket_idx    ON launches(rocket_id);
CREATE INDEX IF NOT EXISTS launches_launchpad_idx ON launches(launchpad_id);
";

/// Dimension tables whose natural keys are read back after loading.
pub const ROCKETS: &str = "rockets";
pub const LAUNCHPADS: &str = "launchpads";
