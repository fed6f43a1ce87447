//! Static station directory and canonical-identity resolution.
//!
//! The directory is materialized offline from the provider's stop list
//! and loaded once at startup; it is read-only afterward. Its job is to
//! answer identity questions the live feed cannot: which physical
//! platforms share one rider-facing station name (a "complex"), and
//! which lines serve that complex as a whole.
//!
//! A lookup miss is a normal empty result, never an error: not every
//! stop the feed mentions has to appear in the directory.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{Line, StopId};

/// Errors from loading the station directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Reading the directory file failed.
    #[error("failed to read station directory: {0}")]
    Io(#[from] std::io::Error),

    /// The directory file is not valid JSON of the expected shape.
    #[error("failed to parse station directory: {0}")]
    Json(#[from] serde_json::Error),
}

/// One platform record in the static directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationEntry {
    /// Base stop id of this platform (no directional suffix).
    pub id: StopId,

    /// Rider-facing name; the canonical station identity.
    pub name: String,

    /// Lines serving this platform.
    pub lines: Vec<Line>,
}

/// Raw JSON shape of a directory entry.
#[derive(Debug, Deserialize)]
struct StationEntryDto {
    id: String,
    name: String,
    lines: Vec<String>,
}

/// Read-only lookup tables over the static station directory.
///
/// Built once, then shared by handle; no rebuilding after startup.
pub struct StationDirectory {
    entries: Vec<StationEntry>,
    by_id: HashMap<StopId, usize>,
    by_name: HashMap<String, Vec<usize>>,
}

impl StationDirectory {
    /// Build the lookup tables from parsed entries.
    pub fn from_entries(entries: Vec<StationEntry>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            by_id.entry(entry.id.clone()).or_insert(i);
            by_name.entry(entry.name.clone()).or_default().push(i);
        }

        Self {
            entries,
            by_id,
            by_name,
        }
    }

    /// Load the directory from a JSON reader.
    ///
    /// Entries with an unparseable line code drop that code rather than
    /// failing the whole load; the feed is messier than the directory.
    pub fn from_reader(reader: impl Read) -> Result<Self, DirectoryError> {
        let dtos: Vec<StationEntryDto> = serde_json::from_reader(reader)?;
        let entries = dtos
            .into_iter()
            .map(|dto| StationEntry {
                id: StopId::new(dto.id),
                name: dto.name,
                lines: dto
                    .lines
                    .iter()
                    .filter_map(|l| Line::parse(l).ok())
                    .collect(),
            })
            .collect();
        Ok(Self::from_entries(entries))
    }

    /// Load the directory from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Resolve a raw, possibly direction-suffixed stop id to its
    /// directory entry.
    ///
    /// Tries an exact id match first, then retries with a single
    /// trailing directional suffix stripped. `None` if still unmatched.
    pub fn resolve(&self, raw: &StopId) -> Option<&StationEntry> {
        if let Some(&i) = self.by_id.get(raw) {
            return Some(&self.entries[i]);
        }
        let base = raw.base();
        if base != *raw {
            if let Some(&i) = self.by_id.get(&base) {
                return Some(&self.entries[i]);
            }
        }
        None
    }

    /// Every platform entry sharing the given rider-facing name.
    ///
    /// Multiple entries with one name represent co-located platforms of
    /// a station complex. Order follows the directory file.
    pub fn platforms_sharing_name(&self, name: &str) -> Vec<&StationEntry> {
        self.by_name
            .get(name)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Union of lines across every platform co-located with `raw`.
    ///
    /// Empty if the id does not resolve. Sorted in display order.
    pub fn lines_at(&self, raw: &StopId) -> Vec<Line> {
        let Some(entry) = self.resolve(raw) else {
            return Vec::new();
        };
        let mut lines: Vec<Line> = self
            .platforms_sharing_name(&entry.name)
            .into_iter()
            .flat_map(|platform| platform.lines.iter().cloned())
            .collect();
        lines.sort();
        lines.dedup();
        lines
    }

    /// The first platform of the named complex served by `line`.
    pub fn station_for_line(&self, name: &str, line: &Line) -> Option<&StationEntry> {
        self.platforms_sharing_name(name)
            .into_iter()
            .find(|entry| entry.lines.contains(line))
    }

    /// Number of platform entries in the directory.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the directory holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
