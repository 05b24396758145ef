use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typeclock";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Where the results log lives unless overridden on the command line.
    pub fn history_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().join("history.json"))
            .unwrap_or_else(|| PathBuf::from("typeclock_history.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::project().map(|pd| pd.data_local_dir().join("typeclock.log"))
    }

    /// User dictionaries, checked before the bundled ones.
    pub fn dictionary_dir() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().join("dicts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_path_is_a_json_file() {
        let path = AppDirs::history_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn dictionary_dir_ends_with_dicts() {
        if let Some(dir) = AppDirs::dictionary_dir() {
            assert!(dir.ends_with("dicts"));
        }
    }
}
