//! JSON file backed memory store.
//!
//! Layout on disk:
//!
//! ```json
//! {
//!   "version": 1,
//!   "slots": {
//!     "one": { "value": 8.0, "saved_at": "2024-05-01T10:00:00Z" },
//!     "two": { "value": "inf", "saved_at": "2024-05-01T10:00:05Z" }
//!   }
//! }
//! ```
//!
//! A slot missing from `slots` has never been saved. Non-finite values are
//! written as strings since JSON has no literal for them.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{MemoryStore, Slot};
use crate::error::{MemoryError, MemoryResult};

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// File used when no path is configured
pub const DEFAULT_MEMORY_FILE: &str = ".memcalc.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MemoryDocument {
    version: u32,
    #[serde(default)]
    slots: Slots,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            slots: Slots::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Slots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    one: Option<SlotRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    two: Option<SlotRecord>,
}

impl Slots {
    fn get(&self, slot: Slot) -> Option<&SlotRecord> {
        match slot {
            Slot::One => self.one.as_ref(),
            Slot::Two => self.two.as_ref(),
        }
    }

    fn set(&mut self, slot: Slot, record: SlotRecord) {
        match slot {
            Slot::One => self.one = Some(record),
            Slot::Two => self.two = Some(record),
        }
    }
}

/// A saved value together with when it was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    #[serde(with = "stored_number")]
    pub value: f64,
    pub saved_at: DateTime<Utc>,
}

/// Memory store persisted as a JSON document.
///
/// The document is read once by [`JsonFileStore::open`]; every save rewrites
/// the whole file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: MemoryDocument,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> MemoryResult<Self> {
        let path = path.as_ref().to_path_buf();

        let document = match fs::read_to_string(&path) {
            Ok(content) => parse_document(&content)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "memory file absent, starting empty");
                MemoryDocument::default()
            }
            Err(err) => return Err(MemoryError::io(path, err)),
        };

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record for a slot, including its timestamp
    pub fn record(&self, slot: Slot) -> Option<&SlotRecord> {
        self.document.slots.get(slot)
    }

    /// Forget both slots and remove the backing file
    pub fn clear(&mut self) -> MemoryResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "memory file removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(MemoryError::io(&self.path, err)),
        }

        self.document = MemoryDocument::default();
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_document(&self, document: &MemoryDocument) -> MemoryResult<()> {
        let content = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();

        fs::write(&temp, content).map_err(|err| MemoryError::io(&temp, err))?;
        fs::rename(&temp, &self.path).map_err(|err| MemoryError::io(&self.path, err))?;

        Ok(())
    }
}

impl MemoryStore for JsonFileStore {
    fn save(&mut self, slot: Slot, value: f64) -> MemoryResult<()> {
        let mut document = self.document.clone();
        document.slots.set(
            slot,
            SlotRecord {
                value,
                saved_at: Utc::now(),
            },
        );
        self.write_document(&document)?;
        self.document = document;
        debug!(%slot, slot_id = slot.id(), value, path = %self.path.display(), "slot saved");
        Ok(())
    }

    fn load(&self, slot: Slot) -> MemoryResult<Option<f64>> {
        Ok(self.document.slots.get(slot).map(|record| record.value))
    }
}

fn parse_document(content: &str) -> MemoryResult<MemoryDocument> {
    let raw: serde_json::Value = serde_json::from_str(content)?;

    // Check the version before the shape so newer layouts are reported as such
    if let Some(found) = raw.get("version").and_then(serde_json::Value::as_u64) {
        if found != u64::from(FORMAT_VERSION) {
            return Err(MemoryError::UnsupportedVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                expected: FORMAT_VERSION,
            });
        }
    }

    Ok(serde_json::from_value(raw)?)
}

/// Serde adapter writing finite numbers as JSON numbers and the rest as text
mod stored_number {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!(
                    "invalid stored number '{other}'"
                ))),
            },
        }
    }
}
