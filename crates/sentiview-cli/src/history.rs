//! JSON-file-backed analysis history, newest entry first.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sentiview_client::types::AnalysisResponse;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no history entry at index {index} (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One saved analysis: the input text, the full model response and when it
/// was saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub result: AnalysisResponse,
    pub saved_at: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(text: String, result: AnalysisResponse) -> Self {
        Self {
            text,
            result,
            saved_at: Utc::now(),
        }
    }
}

/// Persists analysis history as a JSON array on disk.
///
/// The whole file is read and rewritten on every mutation; history stays
/// small enough that this beats carrying an open handle around.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads all entries, newest first.
    ///
    /// A missing file means no history yet. A file that no longer parses is
    /// treated the same way, with a warning, so one corrupt write never
    /// bricks the command.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history file unreadable, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Prepends an entry so the most recent analysis lists first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] or [`HistoryError::Serde`] if the file
    /// cannot be rewritten.
    pub fn add(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.load()?;
        entries.insert(0, entry);
        self.save(&entries)
    }

    /// Removes and returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::IndexOutOfRange`] for a bad index, otherwise
    /// the same failure modes as [`HistoryStore::add`].
    pub fn remove(&self, index: usize) -> Result<HistoryEntry, HistoryError> {
        let mut entries = self.load()?;
        if index >= entries.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.save(&entries)?;
        Ok(removed)
    }

    /// Drops all history.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`HistoryStore::add`].
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.save(&[])
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiview_client::types::{SentimentLabel, SentimentProbabilities};

    fn sample_response(comment: &str, sentiment: SentimentLabel) -> AnalysisResponse {
        AnalysisResponse {
            success: true,
            comment: comment.to_string(),
            sentiment,
            confidence: 0.9,
            confidence_level: None,
            probabilities: SentimentProbabilities {
                negative: 0.05,
                neutral: 0.05,
                positive: 0.9,
            },
            features: None,
            timestamp: None,
            error: None,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("history.json"))
    }

    #[test]
    fn missing_file_loads_as_empty_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn entries_round_trip_through_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .add(HistoryEntry::new(
                "great teachers".to_string(),
                sample_response("great teachers", SentimentLabel::Positive),
            ))
            .expect("add");

        let entries = store.load().expect("load");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "great teachers");
        assert_eq!(entries[0].result.sentiment, SentimentLabel::Positive);
        assert!((entries[0].result.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn newest_entry_lists_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .add(HistoryEntry::new(
                "older".to_string(),
                sample_response("older", SentimentLabel::Neutral),
            ))
            .expect("add older");
        store
            .add(HistoryEntry::new(
                "newer".to_string(),
                sample_response("newer", SentimentLabel::Negative),
            ))
            .expect("add newer");

        let entries = store.load().expect("load");
        assert_eq!(entries[0].text, "newer");
        assert_eq!(entries[1].text, "older");
    }

    #[test]
    fn remove_drops_the_indexed_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        for text in ["first", "second", "third"] {
            store
                .add(HistoryEntry::new(
                    text.to_string(),
                    sample_response(text, SentimentLabel::Neutral),
                ))
                .expect("add");
        }

        let removed = store.remove(1).expect("remove");
        assert_eq!(removed.text, "second");
        let remaining = store.load().expect("load");
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].text, "third");
        assert_eq!(remaining[1].text, "first");
    }

    #[test]
    fn remove_rejects_out_of_range_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let result = store.remove(0);
        assert!(matches!(
            result,
            Err(HistoryError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn clear_leaves_empty_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .add(HistoryEntry::new(
                "anything".to_string(),
                sample_response("anything", SentimentLabel::Positive),
            ))
            .expect("add");
        store.clear().expect("clear");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").expect("write garbage");

        let store = HistoryStore::new(&path);
        assert!(store.load().expect("load").is_empty());
    }
}
