//! Tap-Dial Core
//!
//! Layered architecture:
//! - domain: Contact entity, phone classification, errors
//! - repository: Key-value storage and the contact list on top of it
//! - dialing: Double-tap confirmation, feedback and the dialer
//! - commands: Entry points used by the screens

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod dialing;
pub mod domain;
pub mod repository;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use config::Settings;
use dialing::{Clock, DeviceServices, DialGate, PhoneCaller};
use domain::{DomainError, DomainResult};
use repository::{init_db, ContactRepository, KeyValueStore, SqliteStore};

pub const DB_FILE: &str = "tap_dial.db";

/// Application state shared across commands
pub struct AppState {
    pub settings: Settings,
    pub repo: Arc<ContactRepository>,
    pub caller: Arc<PhoneCaller>,
    pub gate: Arc<DialGate>,
    pub clock: Arc<dyn Clock>,
    pub db_path: Option<PathBuf>,
}

impl AppState {
    /// Open everything under `app_dir`: settings file and SQLite database.
    pub async fn init(app_dir: &Path, device: DeviceServices) -> DomainResult<Self> {
        std::fs::create_dir_all(app_dir)
            .map_err(|e| DomainError::Storage(format!("{}: {}", app_dir.display(), e)))?;

        let settings = Settings::load(app_dir)?;
        let db_path = app_dir.join(DB_FILE);
        let db = init_db(&db_path).await?;

        let mut state = Self::with_store(settings, Arc::new(SqliteStore::new(db)), device);
        state.db_path = Some(db_path);
        log::info!("App state ready in {}", app_dir.display());
        Ok(state)
    }

    /// Build the state over any key-value store
    pub fn with_store(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        device: DeviceServices,
    ) -> Self {
        let repo = Arc::new(ContactRepository::with_key(store, settings.storage_key.clone()));
        let caller = Arc::new(PhoneCaller::new(
            settings.platform,
            device.dialer,
            device.permission,
        ));
        let gate = Arc::new(DialGate::new(
            settings.dial.clone(),
            repo.clone(),
            device.feedback,
            caller.clone(),
            device.clock.clone(),
        ));

        Self {
            settings,
            repo,
            caller,
            gate,
            clock: device.clock,
            db_path: None,
        }
    }
}
