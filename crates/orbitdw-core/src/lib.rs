//! Core types and trait definitions for the orbitdw launch warehouse.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! fetcher (`orbitdw-source-http`) and the warehouse (`orbitdw-store-sqlite`)
//! implement the traits defined here; the driver in `orbitdw-etl` only talks
//! to those traits.

pub mod error;
pub mod ids;
pub mod keys;
pub mod record;
pub mod source;
pub mod warehouse;

pub use error::{Error, Result};
