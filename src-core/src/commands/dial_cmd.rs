//! Dialing Commands

use super::get_contact;
use crate::dialing::TapOutcome;
use crate::domain::DomainResult;
use crate::AppState;

/// Avatar tap: announce first, dial on the confirming tap
pub async fn tap_contact(state: &AppState, id: &str) -> DomainResult<TapOutcome> {
    let contact = get_contact(state, id).await?;
    state.gate.on_tap(&contact).await
}

/// Call button: dial right away. Returns the URL that was opened.
pub async fn call_contact(state: &AppState, id: &str) -> DomainResult<String> {
    let contact = get_contact(state, id).await?;
    state.caller.call(&contact.phone_number).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add_contact;
    use crate::config::{Platform, Settings};
    use crate::domain::{ContactDraft, DomainError};
    use crate::repository::MemoryStore;
    use crate::testing::FakeDevice;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_tap_twice_then_dial() {
        let device = FakeDevice::new();
        let state = AppState::with_store(
            Settings::default(),
            Arc::new(MemoryStore::new()),
            device.services(),
        );
        let draft = ContactDraft {
            name: "张三".to_string(),
            phone_number: "13800138000".to_string(),
            avatar_uri: None,
        };
        let contact = add_contact(&state, &draft).await.unwrap();

        device.clock.set(300);
        assert_eq!(tap_contact(&state, &contact.id).await.unwrap(), TapOutcome::Armed);
        device.clock.set(2000);
        assert_eq!(
            tap_contact(&state, &contact.id).await.unwrap(),
            TapOutcome::Dialed { url: "tel:13800138000".to_string() }
        );
    }

    #[tokio::test]
    async fn test_call_button_skips_confirmation() {
        let device = FakeDevice::new();
        let mut settings = Settings::default();
        settings.platform = Platform::Ios;
        let state = AppState::with_store(settings, Arc::new(MemoryStore::new()), device.services());
        let draft = ContactDraft {
            name: "李四".to_string(),
            phone_number: "010-12345678".to_string(),
            avatar_uri: None,
        };
        let contact = add_contact(&state, &draft).await.unwrap();

        assert_eq!(call_contact(&state, &contact.id).await.unwrap(), "telprompt:010-12345678");
        assert_eq!(device.dialer.opened(), vec!["telprompt:010-12345678"]);
        assert!(device.feedback.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_contact() {
        let device = FakeDevice::new();
        let state = AppState::with_store(
            Settings::default(),
            Arc::new(MemoryStore::new()),
            device.services(),
        );
        assert!(matches!(tap_contact(&state, "x").await, Err(DomainError::NotFound(_))));
        assert!(matches!(call_contact(&state, "x").await, Err(DomainError::NotFound(_))));
    }
}
