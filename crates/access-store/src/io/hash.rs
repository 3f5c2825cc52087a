//! Content fingerprints for persisted frames.

use polars::prelude::{AnyValue, DataFrame};
use sha2::{Digest, Sha256};

use access_ingest::any_to_string;

const NULL_MARKER: &[u8] = b"\x00null";

/// Compute the SHA-256 fingerprint of a frame.
///
/// Covers column names, dtypes and every value in row order, so two frames
/// share a fingerprint exactly when they would persist identically.
pub fn fingerprint(df: &DataFrame) -> String {
    let mut hasher = Sha256::new();
    for column in df.get_columns() {
        hasher.update(column.name().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(column.dtype().to_string().as_bytes());
        hasher.update(b"\x1e");
    }
    hasher.update(df.height().to_le_bytes());
    for row in 0..df.height() {
        for column in df.get_columns() {
            match column.get(row) {
                Ok(AnyValue::Null) | Err(_) => hasher.update(NULL_MARKER),
                Ok(value) => hasher.update(any_to_string(value).as_bytes()),
            }
            hasher.update(b"\x1f");
        }
        hasher.update(b"\x1e");
    }
    hex::encode(hasher.finalize())
}
