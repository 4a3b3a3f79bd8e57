//! Recent-colors storage.
//!
//! Each target slot keeps its own most-recent-first list of up to
//! [`MAX_RECENT`](crate::constants::MAX_RECENT) hex colors. The session
//! only talks to the [`SwatchStore`] trait; the JSON-file implementation
//! below is what hosts normally inject, and persistence is strictly
//! best-effort — a failed read degrades to an empty list and a failed
//! write is logged and dropped.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_RECENT;
use crate::math;

/// Keyed store of per-slot recent-color lists.
pub trait SwatchStore {
    /// Recent colors for `key`, most recent first. Missing or unreadable
    /// data yields an empty list.
    fn get(&self, key: &str) -> Vec<String>;

    /// Replace the list stored under `key`.
    fn put(&self, key: &str, colors: &[String]);
}

/// Move `hex` to the front of `list`, dropping any older occurrence and
/// truncating to [`MAX_RECENT`].
pub(crate) fn record(list: &mut Vec<String>, hex: &str) {
    list.retain(|c| c != hex);
    list.insert(0, hex.to_string());
    list.truncate(MAX_RECENT);
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("swatch file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("swatch file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SwatchFile {
    slots: BTreeMap<String, Vec<String>>,
}

/// Durable [`SwatchStore`] backed by a single JSON file.
///
/// The file holds one flat map of slot key → hex list. The host picks the
/// path; the crate never decides where snapshots live.
pub struct JsonSwatchStore {
    path: PathBuf,
}

impl JsonSwatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<SwatchFile, StoreError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load, treating a missing file as empty and logging anything else.
    fn load_or_empty(&self) -> SwatchFile {
        match self.load() {
            Ok(file) => file,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                SwatchFile::default()
            }
            Err(e) => {
                warn!("ignoring unreadable swatch file {:?}: {e}", self.path);
                SwatchFile::default()
            }
        }
    }
}

impl SwatchStore for JsonSwatchStore {
    fn get(&self, key: &str) -> Vec<String> {
        let mut colors = self
            .load_or_empty()
            .slots
            .get(key)
            .cloned()
            .unwrap_or_default();
        // A hand-edited or truncated file may hold junk entries.
        colors.retain(|c| math::is_strict_hex(c));
        colors.truncate(MAX_RECENT);
        colors
    }

    fn put(&self, key: &str, colors: &[String]) {
        let mut file = self.load_or_empty();
        file.slots.insert(key.to_string(), colors.to_vec());
        let json = match serde_json::to_string_pretty(&file) {
            Ok(json) => json,
            Err(e) => {
                warn!("could not serialize swatch file: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!("could not write swatch file {:?}: {e}", self.path);
        }
    }
}

/// In-memory [`SwatchStore`], for tests and hosts that opt out of
/// persistence.
#[derive(Default)]
pub struct MemorySwatchStore {
    slots: RefCell<BTreeMap<String, Vec<String>>>,
}

impl MemorySwatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SwatchStore for MemorySwatchStore {
    fn get(&self, key: &str) -> Vec<String> {
        self.slots.borrow().get(key).cloned().unwrap_or_default()
    }

    fn put(&self, key: &str, colors: &[String]) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), colors.to_vec());
    }
}
