//! On-disk replay store.
//!
//! The file holds one `RecordTables` encoded with `bincode`. Saving
//! overwrites the whole file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

use super::records::RecordTables;
use crate::error::Result;
use crate::replay::Replay;

/// Write `replays` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be created or written and `Encoding` if
/// the tables cannot be encoded.
pub fn save_replays(path: impl AsRef<Path>, replays: &[Replay]) -> Result<()> {
    let path = path.as_ref();
    save_tables(path, &RecordTables::export(replays))?;
    info!(path = %path.display(), count = replays.len(), "Replays saved");
    Ok(())
}

/// Write raw record tables to `path`.
///
/// # Errors
///
/// See [`save_replays`].
pub fn save_tables(path: impl AsRef<Path>, tables: &RecordTables) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, tables)?;
    writer.flush()?;
    Ok(())
}

/// Read raw record tables from `path`.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened and `Encoding` if it does not
/// hold record tables.
pub fn load_tables(path: impl AsRef<Path>) -> Result<RecordTables> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// Read every loadable replay from `path`.
///
/// A missing or unreadable file yields an empty list. Individual records
/// that fail validation are skipped.
#[must_use]
pub fn load_replays(path: impl AsRef<Path>) -> Vec<Replay> {
    let path = path.as_ref();
    match load_tables(path) {
        Ok(tables) => tables.load_replays(),
        Err(err) => {
            warn!(path = %path.display(), %err, "Replay file unreadable, starting empty");
            Vec::new()
        }
    }
}
