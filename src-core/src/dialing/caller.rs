//! Phone Caller
//!
//! Turns a number into a dial URL according to the platform policy and
//! opens it.

use std::sync::Arc;

use super::device::{CallPermission, Dialer, PermissionStatus};
use crate::config::Platform;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialScheme {
    /// Dials straight away
    Tel,
    /// Shows the system confirmation first
    TelPrompt,
}

impl DialScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialScheme::Tel => "tel",
            DialScheme::TelPrompt => "telprompt",
        }
    }

    pub fn url(&self, phone_number: &str) -> String {
        format!("{}:{}", self.as_str(), phone_number)
    }
}

pub struct PhoneCaller {
    platform: Platform,
    dialer: Arc<dyn Dialer>,
    permission: Arc<dyn CallPermission>,
}

impl PhoneCaller {
    pub fn new(
        platform: Platform,
        dialer: Arc<dyn Dialer>,
        permission: Arc<dyn CallPermission>,
    ) -> Self {
        Self {
            platform,
            dialer,
            permission,
        }
    }

    /// Pick the scheme. Android asks for the call permission and falls back
    /// to the prompt scheme without it; iOS always prompts.
    pub async fn scheme(&self) -> DialScheme {
        match self.platform {
            Platform::Ios => DialScheme::TelPrompt,
            Platform::Android => match self.permission.request_call_permission().await {
                Ok(PermissionStatus::Granted) => DialScheme::Tel,
                Ok(PermissionStatus::Denied) => {
                    let denied = DomainError::PermissionDenied("CALL_PHONE".to_string());
                    log::warn!("{}, falling back to dial prompt", denied);
                    DialScheme::TelPrompt
                }
                Err(e) => {
                    log::warn!(
                        "Call permission request failed: {}, falling back to dial prompt",
                        e
                    );
                    DialScheme::TelPrompt
                }
            },
        }
    }

    /// Place the call. Returns the URL that was opened.
    pub async fn call(&self, phone_number: &str) -> DomainResult<String> {
        let url = self.scheme().await.url(phone_number);
        log::info!("Dialing {}", url);

        match self.dialer.open_url(&url).await {
            Ok(()) => Ok(url),
            Err(e) => {
                log::error!("无法拨打电话: {} ({})", url, e);
                Err(match e {
                    DomainError::Dialer(_) => e,
                    other => DomainError::Dialer(other.to_string()),
                })
            }
        }
    }
}
