//! Dashboard settings
//!
//! The settings record lives in the host process; the dashboard only asks
//! for it and hands it back. [`SettingsBackend`] is that request/response
//! seam, and [`JsonFileBackend`] is the local implementation used by the CLI
//! (`<data_dir>/settings.json`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::CoreError;

const SETTINGS_FILE: &str = "settings.json";

/// Settings record exchanged with the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub id: i64,
    /// Storefront partner API key
    pub steam_api_key: Option<String>,
    /// Seconds between background syncs
    pub poll_interval: i64,
    /// Storefront change cursor; "0" means never synced
    pub highwatermark: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: 0,
            steam_api_key: None,
            poll_interval: 0,
            highwatermark: "0".to_string(),
        }
    }
}

impl Settings {
    /// An API key is present and polling is enabled
    pub fn is_configured(&self) -> bool {
        self.steam_api_key.is_some() && self.poll_interval > 0
    }
}

/// Request/response access to the host's settings
pub trait SettingsBackend {
    fn get_settings(&self) -> Result<Settings>;
    fn set_settings(&self, settings: &Settings) -> Result<()>;
}

/// Settings persisted as pretty JSON under a data directory
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Backend rooted at `<local data dir>/steamboard`
    pub fn default_location() -> Result<Self, CoreError> {
        let base = dirs::data_local_dir().ok_or(CoreError::DataDirNotFound)?;
        Ok(Self::new(base.join("steamboard")))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

impl SettingsBackend for JsonFileBackend {
    fn get_settings(&self) -> Result<Settings> {
        let path = self.path();
        let content = std::fs::read_to_string(&path).map_err(|source| CoreError::FileRead {
            path: path.clone(),
            source,
        })?;
        let settings = serde_json::from_str(&content).map_err(|source| CoreError::JsonParse {
            path: path.clone(),
            message: source.to_string(),
            source,
        })?;
        Ok(settings)
    }

    fn set_settings(&self, settings: &Settings) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| CoreError::FileWrite {
            path: self.data_dir.clone(),
            source,
        })?;
        let path = self.path();
        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        std::fs::write(&path, content).map_err(|source| CoreError::FileWrite { path, source })?;
        Ok(())
    }
}

/// First run: nothing has been saved yet
fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<CoreError>(),
        Some(CoreError::FileRead { source, .. }) if source.kind() == std::io::ErrorKind::NotFound
    )
}

/// Settings as seen by the dashboard, backed by a host [`SettingsBackend`]
#[derive(Debug)]
pub struct SettingsStore<B> {
    backend: B,
    settings: Settings,
    loaded: bool,
}

impl<B: SettingsBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            settings: Settings::default(),
            loaded: false,
        }
    }

    /// Fetch settings from the backend.
    ///
    /// A failing backend is not an error for the dashboard: the current
    /// values (defaults on first load) are kept and a warning is logged.
    pub fn load(&mut self) {
        match self.backend.get_settings() {
            Ok(settings) => {
                self.loaded = settings.is_configured();
                self.settings = settings;
            }
            Err(e) if is_not_found(&e) => {
                debug!("No settings stored yet, using defaults: {:#}", e);
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {:#}", e);
            }
        }
    }

    /// Hand the current settings back to the backend
    pub fn save(&self) -> Result<()> {
        self.backend.set_settings(&self.settings)?;
        info!("Settings saved");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// True once a load returned a usable API key and poll interval
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Backend that never answers, like a host that is not running
    struct UnreachableBackend;

    impl SettingsBackend for UnreachableBackend {
        fn get_settings(&self) -> Result<Settings> {
            anyhow::bail!("host not reachable")
        }

        fn set_settings(&self, _settings: &Settings) -> Result<()> {
            anyhow::bail!("host not reachable")
        }
    }

    #[derive(Default)]
    struct MemoryBackend {
        stored: RefCell<Option<Settings>>,
    }

    impl SettingsBackend for MemoryBackend {
        fn get_settings(&self) -> Result<Settings> {
            self.stored
                .borrow()
                .clone()
                .context("nothing stored yet")
        }

        fn set_settings(&self, settings: &Settings) -> Result<()> {
            *self.stored.borrow_mut() = Some(settings.clone());
            Ok(())
        }
    }

    #[test]
    fn test_load_failure_keeps_defaults() {
        let mut store = SettingsStore::new(UnreachableBackend);
        store.load();
        assert_eq!(store.settings(), &Settings::default());
        assert!(!store.is_loaded());
        assert!(store.save().is_err());
    }

    #[test]
    fn test_loaded_requires_key_and_interval() {
        let backend = MemoryBackend::default();
        backend
            .set_settings(&Settings {
                steam_api_key: Some("KEY".to_string()),
                ..Settings::default()
            })
            .unwrap();

        let mut store = SettingsStore::new(backend);
        store.load();
        assert_eq!(store.settings().steam_api_key.as_deref(), Some("KEY"));
        assert!(!store.is_loaded(), "poll interval 0 means not configured");

        store.settings_mut().poll_interval = 600;
        store.save().unwrap();
        store.load();
        assert!(store.is_loaded());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested"));

        let mut store = SettingsStore::new(backend.clone());
        store.load();
        assert!(!store.is_loaded());

        *store.settings_mut() = Settings {
            id: 1,
            steam_api_key: Some("abc".to_string()),
            poll_interval: 600,
            highwatermark: "12345".to_string(),
        };
        store.save().unwrap();
        assert!(backend.path().exists());

        let mut reloaded = SettingsStore::new(backend);
        reloaded.load();
        assert!(reloaded.is_loaded());
        assert_eq!(reloaded.settings().highwatermark, "12345");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("never-saved"));

        let err = backend.get_settings().unwrap_err();
        assert!(is_not_found(&err));

        let mut store = SettingsStore::new(backend);
        store.load();
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_other_failures_are_not_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        std::fs::write(backend.path(), "{ not json").unwrap();

        assert!(!is_not_found(&backend.get_settings().unwrap_err()));
        assert!(!is_not_found(&anyhow::anyhow!("host not reachable")));
    }

    #[test]
    fn test_unwritable_dir_reports_file_write() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let backend = JsonFileBackend::new(blocker.join("steamboard"));

        let err = backend.set_settings(&Settings::default()).unwrap_err();
        let core = err.downcast_ref::<CoreError>();
        assert!(matches!(core, Some(CoreError::FileWrite { .. })));
        assert!(core.and_then(CoreError::suggestion).is_some());
    }

    #[test]
    fn test_corrupt_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        std::fs::write(backend.path(), "{ not json").unwrap();

        let err = backend.get_settings().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::JsonParse { .. })
        ));
    }
}
