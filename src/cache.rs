use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

#[derive(Debug, Deserialize, Serialize)]
struct CacheRow {
    link: String,
    facebook_id: String,
}

/// Persisted link -> id mapping. Loaded fully at startup, appended to as new
/// ids are resolved over the network. Rows are never rewritten in place.
pub struct IdCache {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl IdCache {
    /// The cache file must exist, even if it holds no data rows.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| ExportError::CacheOpen {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file);

        let mut entries = HashMap::new();
        for row in rdr.deserialize() {
            let row: CacheRow = row.map_err(|e| ExportError::CacheParse {
                path: path.display().to_string(),
                source: e,
            })?;
            // A link can appear twice if an earlier run appended and then
            // crashed; the later row wins.
            entries.insert(row.link, row.facebook_id);
        }

        info!("Loaded {} cached ids from '{}'.", entries.len(), path.display());
        Ok(IdCache { path, entries })
    }

    pub fn get(&self, link: &str) -> Option<&str> {
        self.entries.get(link).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends one row to the file and mirrors it in memory. No dedup check:
    /// calling twice for the same link grows the file by two rows.
    pub fn append(&mut self, link: &str, id: &str) -> Result<(), ExportError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| ExportError::CacheOpen {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let append_err = |e: csv::Error| ExportError::CacheAppend {
            path: self.path.display().to_string(),
            source: e,
        };

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.serialize(CacheRow {
            link: link.to_string(),
            facebook_id: id.to_string(),
        })
        .map_err(append_err)?;
        wtr.flush().map_err(|e| append_err(csv::Error::from(e)))?;

        self.entries.insert(link.to_string(), id.to_string());
        Ok(())
    }
}
