//! SQLite I/O for merged tables.
//!
//! This module handles:
//! - Full-refresh writes inside a single transaction
//! - Typed reads of persisted tables
//! - Content fingerprints for run-to-run comparison

mod hash;
mod load;
mod save;

pub use hash::fingerprint;
pub use load::load_table;
pub use save::{PersistReport, persist, write_table};
