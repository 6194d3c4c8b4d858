//! The Store Gateway (spec §4.7): schema, prepared statements, checkpoint,
//! and reorg rewind over an embedded `rusqlite` database. `rusqlite` does
//! not appear in the reference corpus this crate's siblings are grounded
//! on; it is the real, idiomatic choice for an embedded relational store in
//! Rust, and is introduced deliberately (see `DESIGN.md`) rather than
//! hand-rolling a page format.

pub mod error;
pub use error::StoreError;

mod schema;

pub mod snapshot;
pub use snapshot::BlockSnapshot;

pub mod gateway;
pub use gateway::StoreGateway;

pub mod dex_cache;
pub use dex_cache::SqliteDurableDexCache;
