//! Console Device Adapters
//!
//! Stand-ins for the phone's speech engine, vibrator and dialer when the
//! app runs as a terminal shell. Speech is printed and paced so the
//! double-tap window behaves as it would with a real voice.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use tap_dial_lib::config::{Vibration, VoiceSettings};
use tap_dial_lib::dialing::{
    CallPermission, DeviceServices, Dialer, Feedback, PermissionStatus, SystemClock,
};
use tap_dial_lib::domain::{DomainError, DomainResult};

const MS_PER_CHAR: f32 = 120.0;
const MAX_SPEECH: Duration = Duration::from_secs(6);

/// How long `text` takes to say at `rate` (1.0 = normal)
pub fn speech_duration(text: &str, rate: f32) -> Duration {
    let rate = if rate > 0.0 { rate } else { 1.0 };
    let ms = text.chars().count() as f32 * MS_PER_CHAR / rate;
    Duration::from_millis(ms as u64).min(MAX_SPEECH)
}

pub struct ConsoleFeedback {
    /// Skip the pacing delay
    instant: bool,
}

impl ConsoleFeedback {
    pub fn new() -> Self {
        Self { instant: false }
    }

    pub fn instant() -> Self {
        Self { instant: true }
    }
}

impl Default for ConsoleFeedback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Feedback for ConsoleFeedback {
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> DomainResult<()> {
        log::info!(
            "Speak [{} rate={} pitch={}]: {}",
            voice.language,
            voice.rate,
            voice.pitch,
            text
        );
        println!("🔊 {}", text);
        if !self.instant {
            tokio::time::sleep(speech_duration(text, voice.rate)).await;
        }
        Ok(())
    }

    fn vibrate(&self, vibration: &Vibration) {
        log::debug!("Vibrate {:?} ({} ms)", vibration, vibration.total_ms());
    }
}

/// Hands dial URLs to the system URL handler
#[derive(Debug, Default)]
pub struct SystemDialer;

#[async_trait]
impl Dialer for SystemDialer {
    async fn open_url(&self, url: &str) -> DomainResult<()> {
        let target = url.to_string();
        tokio::task::spawn_blocking(move || open::that(&target))
            .await
            .map_err(|e| DomainError::Dialer(e.to_string()))?
            .map_err(|e| DomainError::Dialer(format!("{}: {}", url, e)))
    }
}

/// Permission answer fixed at startup
#[derive(Debug, Clone, Copy)]
pub struct FixedPermission(pub PermissionStatus);

impl FixedPermission {
    /// `denied` (any case) denies, anything else grants
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("denied") => Self(PermissionStatus::Denied),
            _ => Self(PermissionStatus::Granted),
        }
    }
}

#[async_trait]
impl CallPermission for FixedPermission {
    async fn request_call_permission(&self) -> DomainResult<PermissionStatus> {
        Ok(self.0)
    }
}

/// Services for the terminal shell
pub fn console_services(permission: FixedPermission) -> DeviceServices {
    DeviceServices {
        feedback: Arc::new(ConsoleFeedback::new()),
        dialer: Arc::new(SystemDialer),
        permission: Arc::new(permission),
        clock: Arc::new(SystemClock),
    }
}
