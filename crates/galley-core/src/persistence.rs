use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::error::PersistenceError;

pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub onboarding_complete: bool,
}

/// The one durable slot Galley keeps between runs.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files read as defaults; the next write replaces them.
    pub fn load(&self) -> Preferences {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Preferences::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "preferences unreadable");
                return Preferences::default();
            }
        };
        match serde_json::from_slice::<Preferences>(&bytes) {
            Ok(preferences) => preferences,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "preferences corrupt");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let encoded = serde_json::to_vec_pretty(preferences)?;
        std::fs::write(&self.path, encoded).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn set_onboarding_complete(&self, complete: bool) -> Result<(), PersistenceError> {
        let mut preferences = self.load();
        preferences.onboarding_complete = complete;
        self.save(&preferences)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_reads_as_not_onboarded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PreferenceStore::in_dir(dir.path());
        assert_eq!(store.load(), Preferences::default());
        assert!(!store.load().onboarding_complete);
    }

    #[test]
    fn onboarding_flag_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PreferenceStore::in_dir(dir.path().join("nested"));
        store.set_onboarding_complete(true).expect("save");

        let reopened = PreferenceStore::in_dir(dir.path().join("nested"));
        assert!(reopened.load().onboarding_complete);

        reopened.set_onboarding_complete(false).expect("save");
        assert!(!store.load().onboarding_complete);
    }

    #[test]
    fn corrupt_file_is_treated_as_default_and_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PreferenceStore::in_dir(dir.path());
        std::fs::write(store.path(), b"{not json").expect("write");

        assert!(!store.load().onboarding_complete);
        store.set_onboarding_complete(true).expect("save");
        assert!(store.load().onboarding_complete);
    }
}
