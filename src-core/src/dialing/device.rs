//! Device Services
//!
//! What the dialing flow needs from the phone: speech and vibration, a way
//! to open a dial URL, the call permission, and a wall clock.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Vibration, VoiceSettings};
use crate::domain::DomainResult;

/// Text-to-speech and haptics
#[async_trait]
pub trait Feedback: Send + Sync {
    /// Speak `text`. Resolves once playback is done.
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> DomainResult<()>;

    /// Fire-and-forget vibration
    fn vibrate(&self, vibration: &Vibration);
}

/// Opens `scheme:number` URLs
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn open_url(&self, url: &str) -> DomainResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Runtime permission to place calls directly
#[async_trait]
pub trait CallPermission: Send + Sync {
    async fn request_call_permission(&self) -> DomainResult<PermissionStatus>;
}

/// Milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Everything the platform provides, bundled for `AppState::init`
#[derive(Clone)]
pub struct DeviceServices {
    pub feedback: Arc<dyn Feedback>,
    pub dialer: Arc<dyn Dialer>,
    pub permission: Arc<dyn CallPermission>,
    pub clock: Arc<dyn Clock>,
}
