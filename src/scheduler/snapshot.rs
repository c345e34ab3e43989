//! Snapshot Codec
//!
//! JSON mapping of decimal-string timestamps to reminder lists.
//!
//! ```json
//! { "1700000000": [ {"channel": "1", "message": "hi", "author": "2"} ] }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::SchedulerError;
use crate::scheduler::Reminder;

/// Pending buckets keyed by Unix timestamp in seconds.
pub type Buckets = BTreeMap<i64, Vec<Reminder>>;

// == Encode ==
/// Encodes buckets with four-space indentation.
pub fn encode(buckets: &Buckets) -> Result<Vec<u8>, SchedulerError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    buckets.serialize(&mut serializer)?;
    Ok(out)
}

// == Decode ==
/// Decodes a snapshot. Any deviation from the layout is a `PersistenceFailure`.
pub fn decode(bytes: &[u8]) -> Result<Buckets, SchedulerError> {
    serde_json::from_slice(bytes).map_err(|err| {
        SchedulerError::PersistenceFailure(format!("malformed reminder snapshot: {}", err))
    })
}

// == Load ==
/// Reads and decodes a snapshot file.
///
/// Returns `Ok(None)` when the file does not exist.
pub async fn load(path: &Path) -> Result<Option<Buckets>, SchedulerError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => decode(&bytes).map(Some),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(SchedulerError::PersistenceFailure(format!(
            "failed to read {}: {}",
            path.display(),
            err
        ))),
    }
}

// == Write ==
/// Writes bytes through a sibling temporary file and a rename, so readers
/// never see a partially written snapshot.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SchedulerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
