//! Settings
//!
//! Tunables for the dialing flow, read from `settings.json` in the app data
//! directory. Every field has a default, so a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use crate::repository::CONTACTS_STORAGE_KEY;

pub const SETTINGS_FILE: &str = "settings.json";

/// Platform dial policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Android,
    Ios,
}

/// Haptic feedback: a single buzz or an on/off pattern in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vibration {
    Duration(u64),
    Pattern(Vec<u64>),
}

impl Vibration {
    /// Total time the pattern takes
    pub fn total_ms(&self) -> u64 {
        match self {
            Vibration::Duration(ms) => *ms,
            Vibration::Pattern(steps) => steps.iter().sum(),
        }
    }
}

/// Speech voice parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language: "zh".to_string(),
            rate: 0.4,
            pitch: 1.1,
        }
    }
}

/// Double-tap dialing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialSettings {
    /// Maximum time between a completed first tap and the confirming tap
    pub confirm_window_ms: u64,
    /// Pause between the final buzz and the dial
    pub dial_delay_ms: u64,
    pub voice: VoiceSettings,
    pub arm_vibration: Vibration,
    pub confirm_vibration: Vibration,
    pub final_vibration: Vibration,
    /// `{name}` is replaced by the contact's name
    pub arm_prompt: String,
    pub confirm_prompt: String,
}

impl Default for DialSettings {
    fn default() -> Self {
        Self {
            confirm_window_ms: 8000,
            dial_delay_ms: 1000,
            voice: VoiceSettings::default(),
            arm_vibration: Vibration::Duration(200),
            confirm_vibration: Vibration::Pattern(vec![0, 100, 50, 100]),
            final_vibration: Vibration::Duration(300),
            arm_prompt: "这是{name}的电话，再次点击可以拨打".to_string(),
            confirm_prompt: "拨打{name}的电话".to_string(),
        }
    }
}

impl DialSettings {
    pub fn confirm_window(&self) -> Duration {
        Duration::from_millis(self.confirm_window_ms)
    }

    pub fn dial_delay(&self) -> Duration {
        Duration::from_millis(self.dial_delay_ms)
    }

    pub fn arm_text(&self, name: &str) -> String {
        self.arm_prompt.replace("{name}", name)
    }

    pub fn confirm_text(&self, name: &str) -> String {
        self.confirm_prompt.replace("{name}", name)
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage_key: String,
    pub platform: Platform,
    pub dial: DialSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: CONTACTS_STORAGE_KEY.to_string(),
            platform: Platform::default(),
            dial: DialSettings::default(),
        }
    }
}

impl Settings {
    /// Load `settings.json` from `dir`. A missing file means defaults.
    pub fn load(dir: &Path) -> DomainResult<Self> {
        let path = dir.join(SETTINGS_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No {} in {}, using defaults", SETTINGS_FILE, dir.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(DomainError::Config(format!("{}: {}", path.display(), e))),
        };
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> DomainResult<Self> {
        let settings: Settings =
            serde_json::from_str(raw).map_err(|e| DomainError::Config(e.to_string()))?;
        settings.check()?;
        Ok(settings)
    }

    /// Write the settings next to the database
    pub fn save(&self, dir: &Path) -> DomainResult<()> {
        let raw =
            serde_json::to_string_pretty(self).map_err(|e| DomainError::Config(e.to_string()))?;
        std::fs::write(dir.join(SETTINGS_FILE), raw)
            .map_err(|e| DomainError::Config(e.to_string()))
    }

    fn check(&self) -> DomainResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(DomainError::Config("storage_key must not be empty".to_string()));
        }
        if self.dial.confirm_window_ms == 0 {
            return Err(DomainError::Config("confirm_window_ms must be positive".to_string()));
        }
        Ok(())
    }
}
