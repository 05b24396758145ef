use include_dir::{include_dir, Dir};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::app_dirs::AppDirs;

static BUNDLED_DICTS: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/dicts");

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary '{0}' not found")]
    NotFound(String),
    #[error("dictionary '{name}' could not be read: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dictionary '{0}' contains no words")]
    Empty(String),
}

/// Anything that can turn a dictionary name into a word list.
pub trait WordSource {
    fn words(&self, name: &str) -> Result<Vec<String>, DictionaryError>;
}

/// Looks in a user directory first, then in the dictionaries compiled into
/// the binary.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    user_dir: Option<PathBuf>,
}

impl Dictionaries {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            user_dir: AppDirs::dictionary_dir(),
        }
    }

    pub fn with_user_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            user_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    pub fn bundled_only() -> Self {
        Self { user_dir: None }
    }

    /// Names of the dictionaries shipped with the binary, sorted.
    pub fn bundled_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = BUNDLED_DICTS
            .files()
            .filter_map(|f| f.path().file_name()?.to_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn read_user(&self, name: &str) -> Option<Result<String, DictionaryError>> {
        let path = self.user_dir.as_ref()?.join(name);
        if !path.is_file() {
            return None;
        }
        debug!(path = %path.display(), "loading user dictionary");
        Some(
            fs::read_to_string(&path).map_err(|source| DictionaryError::Unreadable {
                name: name.to_string(),
                source,
            }),
        )
    }

    fn read_bundled(name: &str) -> Option<&'static str> {
        BUNDLED_DICTS.get_file(name)?.contents_utf8()
    }
}

impl WordSource for Dictionaries {
    fn words(&self, name: &str) -> Result<Vec<String>, DictionaryError> {
        // Keep lookups inside the dictionary directories.
        if name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return Err(DictionaryError::NotFound(name.to_string()));
        }

        let contents = match self.read_user(name) {
            Some(result) => result?,
            None => Self::read_bundled(name)
                .ok_or_else(|| DictionaryError::NotFound(name.to_string()))?
                .to_string(),
        };

        let words = parse_words(&contents);
        if words.is_empty() {
            return Err(DictionaryError::Empty(name.to_string()));
        }
        Ok(words)
    }
}

/// One word per line; surrounding whitespace and blank lines are dropped.
pub fn parse_words(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
