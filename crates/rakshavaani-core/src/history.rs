//! Sled-backed append-only history of completed results.
//! Best effort only: the request pipeline never reads it back and never fails because of it.

use serde::Serialize;
use std::path::Path;

use crate::error::HistoryError;

pub const DEFAULT_HISTORY_PATH: &str = "./data/history";

/// Which pipeline produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    VoiceDetection,
    Chat,
    CallAnalysis,
}

pub struct HistoryStore {
    db: sled::Db,
}

impl HistoryStore {
    /// Open (or create) the store at `path`, or at the default location.
    pub fn open(path: Option<impl AsRef<Path>>) -> Result<Self, HistoryError> {
        let p = path
            .map(|x| x.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new(DEFAULT_HISTORY_PATH).to_path_buf());
        let db = sled::open(p)?;
        Ok(Self { db })
    }

    /// Append a record under the next arrival id. Returns that id.
    pub fn append<T: Serialize>(&self, kind: RecordKind, record: &T) -> Result<u64, HistoryError> {
        let id = self.db.generate_id()?;
        let entry = serde_json::json!({
            "id": id,
            "kind": kind,
            "recorded_at": chrono::Utc::now().to_rfc3339(),
            "record": record,
        });
        self.db.insert(id.to_be_bytes(), serde_json::to_vec(&entry)?)?;
        Ok(id)
    }

    /// Append, logging instead of failing.
    pub fn record_best_effort<T: Serialize>(&self, kind: RecordKind, record: &T) {
        if let Err(e) = self.append(kind, record) {
            tracing::warn!("[HISTORY] Could not persist {:?} record: {}", kind, e);
        }
    }

    /// Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> Result<Vec<serde_json::Value>, HistoryError> {
        let mut out = Vec::new();
        for item in self.db.iter().rev().take(limit) {
            let (_, v) = item?;
            out.push(serde_json::from_slice(&v)?);
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}
