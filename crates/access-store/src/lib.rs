//! Persistence for the merged accessibility dataset.
//!
//! # Features
//!
//! - **Full-refresh writes**: the target table is dropped, recreated and
//!   filled inside one transaction
//! - **Typed reads**: tables are read back with column types taken from
//!   their values or declared affinities
//! - **Fingerprints**: SHA-256 over schema and values, so two runs can be
//!   compared without diffing tables
//! - **Profile staging**: a profile CSV can be loaded into SQLite once and
//!   read from there on later runs
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use access_store::{load_table, persist};
//!
//! let report = persist(Path::new("access_project.db"), "merged_access_data", &merged)?;
//! let reloaded = load_table(Path::new("access_project.db"), "merged_access_data")?;
//! ```

mod error;
mod io;
mod staging;

pub use error::{Result, StoreError};
pub use io::{PersistReport, fingerprint, load_table, persist, write_table};
pub use staging::stage_profiles;
