use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::app_dirs::AppDirs;
use crate::util::{max_or_zero, mean, round2, std_dev};

/// Oldest records are dropped once the log grows past this.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Snapshot of one finished session. Created once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Local wall clock time, ISO-8601 without offset.
    pub timestamp: NaiveDateTime,
    pub wpm: f64,
    pub accuracy: f64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    /// Configured test length in seconds.
    pub duration: u64,
}

impl ResultRecord {
    /// Rounds `wpm` and `accuracy` to the stored precision.
    pub fn new(
        wpm: f64,
        accuracy: f64,
        correct_chars: usize,
        incorrect_chars: usize,
        total_chars: usize,
        duration: u64,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            wpm: round2(wpm),
            accuracy: round2(accuracy),
            correct_chars,
            incorrect_chars,
            total_chars,
            duration,
        }
    }
}

/// Aggregates over the whole log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub count: usize,
    pub average_wpm: f64,
    pub average_accuracy: f64,
    pub best_wpm: f64,
    pub best_accuracy: f64,
    pub total_chars: usize,
    /// Spread of WPM across sessions; lower is more consistent.
    pub wpm_std_dev: f64,
}

/// Where the log is loaded from and flushed to.
pub trait HistoryBackend {
    fn load(&self) -> Result<Vec<ResultRecord>, HistoryError>;
    fn save(&self, records: &[ResultRecord]) -> Result<(), HistoryError>;
}

/// Pretty printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::history_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparsable log is moved: `<path>.bak`.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn set_aside(&self) {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!(backup = %backup.display(), "moved unreadable history aside"),
            Err(e) => warn!(error = %e, "could not move unreadable history aside"),
        }
    }

    fn io_err(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for JsonFileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<ResultRecord>, HistoryError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        // A bad file is kept as a backup so the next save cannot destroy it.
        serde_json::from_slice(&bytes).map_err(|source| {
            self.set_aside();
            HistoryError::Malformed {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn save(&self, records: &[ResultRecord]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let data = serde_json::to_vec_pretty(records).map_err(|source| HistoryError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(|e| self.io_err(e))
    }
}

/// Capped, chronological log of results, flushed after every mutation.
#[derive(Debug)]
pub struct HistoryStore<B: HistoryBackend = JsonFileBackend> {
    backend: B,
    log: Vec<ResultRecord>,
}

impl<B: HistoryBackend> HistoryStore<B> {
    /// Loads the log. A missing or unreadable store starts empty.
    pub fn open(backend: B) -> Self {
        let mut log = match backend.load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "discarding unreadable history");
                Vec::new()
            }
        };
        evict_oldest(&mut log);
        info!(records = log.len(), "history loaded");

        Self { backend, log }
    }

    /// Appends and flushes. On a failed flush the record is still kept in
    /// memory and the error is returned.
    pub fn append(&mut self, record: ResultRecord) -> Result<(), HistoryError> {
        self.log.push(record);
        evict_oldest(&mut self.log);
        self.backend.save(&self.log)
    }

    /// Last `min(n, len)` records, oldest first.
    pub fn recent(&self, n: usize) -> &[ResultRecord] {
        let start = self.log.len().saturating_sub(n);
        &self.log[start..]
    }

    pub fn all(&self) -> &[ResultRecord] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn statistics(&self) -> Statistics {
        if self.log.is_empty() {
            return Statistics::default();
        }

        let wpms: Vec<f64> = self.log.iter().map(|r| r.wpm).collect();
        let accuracies: Vec<f64> = self.log.iter().map(|r| r.accuracy).collect();

        Statistics {
            count: self.log.len(),
            average_wpm: round2(mean(&wpms).unwrap_or(0.0)),
            average_accuracy: round2(mean(&accuracies).unwrap_or(0.0)),
            best_wpm: round2(max_or_zero(&wpms)),
            best_accuracy: round2(max_or_zero(&accuracies)),
            total_chars: self.log.iter().map(|r| r.total_chars).sum(),
            wpm_std_dev: round2(std_dev(&wpms).unwrap_or(0.0)),
        }
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.log.clear();
        info!("history cleared");
        self.backend.save(&self.log)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn evict_oldest(log: &mut Vec<ResultRecord>) {
    if log.len() > HISTORY_CAPACITY {
        let excess = log.len() - HISTORY_CAPACITY;
        log.drain(..excess);
    }
}
