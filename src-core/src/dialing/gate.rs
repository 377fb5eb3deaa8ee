//! Dial Gate
//!
//! Drives the double-tap flow for an avatar: the first tap announces the
//! contact, a second tap inside the window announces and dials.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::caller::PhoneCaller;
use super::device::{Clock, Feedback};
use super::press_tracker::{PressState, PressTracker, TapDecision};
use crate::config::DialSettings;
use crate::domain::{Contact, ContactPatch, DomainResult};
use crate::repository::{ContactRepository, Repository};

/// Result of one avatar tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Prompt played, contact armed and acknowledged
    Armed,
    /// Prompt played but a later tap took over; nothing recorded
    Superseded,
    /// The number was dialed with this URL
    Dialed { url: String },
}

pub struct DialGate {
    tracker: Mutex<PressTracker>,
    repo: Arc<ContactRepository>,
    feedback: Arc<dyn Feedback>,
    caller: Arc<PhoneCaller>,
    clock: Arc<dyn Clock>,
    settings: DialSettings,
}

impl DialGate {
    pub fn new(
        settings: DialSettings,
        repo: Arc<ContactRepository>,
        feedback: Arc<dyn Feedback>,
        caller: Arc<PhoneCaller>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tracker: Mutex::new(PressTracker::new(settings.confirm_window())),
            repo,
            feedback,
            caller,
            clock,
            settings,
        }
    }

    pub async fn state(&self, contact_id: &str) -> PressState {
        self.tracker.lock().await.state(contact_id, self.clock.now_ms())
    }

    /// Handle a tap on the contact's avatar.
    ///
    /// A failed prompt or dial returns the error without arming the contact
    /// or clearing an existing arm. Once the arm prompt has played, the arm
    /// stands: a failure to persist `acknowledged` is logged and the tap
    /// still reports `Armed`. A dial only clears the arm when no later tap
    /// on the contact happened meanwhile.
    pub async fn on_tap(&self, contact: &Contact) -> DomainResult<TapOutcome> {
        let now = self.clock.now_ms();
        let decision = self.tracker.lock().await.tap(&contact.id, now);

        match decision {
            TapDecision::Arm(ticket) => {
                log::debug!("Arming contact {} (generation {})", contact.id, ticket.generation);
                self.feedback.vibrate(&self.settings.arm_vibration);
                self.feedback
                    .speak(&self.settings.arm_text(&contact.name), &self.settings.voice)
                    .await?;

                // The window starts when the prompt ends, not at the tap
                let done = self.clock.now_ms();
                if !self.tracker.lock().await.complete_arm(&ticket, done) {
                    log::debug!("Arm of contact {} superseded by a later tap", contact.id);
                    return Ok(TapOutcome::Superseded);
                }

                match self.repo.update(&contact.id, ContactPatch::acknowledge()).await {
                    Ok(true) => {}
                    Ok(false) => log::warn!("Armed contact {} is no longer stored", contact.id),
                    Err(e) => {
                        log::error!("Failed to save acknowledged contact {}: {}", contact.id, e)
                    }
                }
                Ok(TapOutcome::Armed)
            }
            TapDecision::Confirm { generation } => {
                log::debug!("Confirming contact {} (generation {})", contact.id, generation);
                self.feedback.vibrate(&self.settings.confirm_vibration);
                self.feedback
                    .speak(&self.settings.confirm_text(&contact.name), &self.settings.voice)
                    .await?;
                self.feedback.vibrate(&self.settings.final_vibration);
                tokio::time::sleep(self.settings.dial_delay()).await;

                let url = self.caller.call(&contact.phone_number).await?;
                if !self.tracker.lock().await.reset(&contact.id, generation) {
                    log::debug!("Contact {} was tapped again while dialing", contact.id);
                }
                Ok(TapOutcome::Dialed { url })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Platform, Vibration};
    use crate::domain::DomainError;
    use crate::repository::{KeyValueStore, MemoryStore};
    use async_trait::async_trait;
    use crate::testing::{FakeDialer, FakePermission, ManualClock, ScriptedFeedback};
    use std::time::Duration;

    struct Harness {
        gate: Arc<DialGate>,
        repo: Arc<ContactRepository>,
        feedback: Arc<ScriptedFeedback>,
        dialer: Arc<FakeDialer>,
        clock: Arc<ManualClock>,
        contact: Contact,
    }

    async fn harness(feedback: ScriptedFeedback, dialer: FakeDialer) -> Harness {
        let harness = harness_over(Arc::new(MemoryStore::new()), feedback, dialer);
        harness.repo.add(&harness.contact).await.unwrap();
        harness
    }

    fn harness_over(
        store: Arc<dyn KeyValueStore>,
        feedback: ScriptedFeedback,
        dialer: FakeDialer,
    ) -> Harness {
        let repo = Arc::new(ContactRepository::new(store));
        let contact = Contact::new("1".into(), "张三".into(), "13800138000".into(), None);

        let feedback = Arc::new(feedback);
        let dialer = Arc::new(dialer);
        let clock = Arc::new(ManualClock::new(0));
        let caller = Arc::new(PhoneCaller::new(
            Platform::Android,
            dialer.clone(),
            Arc::new(FakePermission::granted()),
        ));
        let gate = Arc::new(DialGate::new(
            DialSettings::default(),
            repo.clone(),
            feedback.clone(),
            caller,
            clock.clone(),
        ));

        Harness {
            gate,
            repo,
            feedback,
            dialer,
            clock,
            contact,
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get_item(&self, _key: &str) -> DomainResult<Option<String>> {
            Err(DomainError::Storage("disk unavailable".to_string()))
        }

        async fn set_item(&self, _key: &str, _value: &str) -> DomainResult<()> {
            Err(DomainError::Storage("disk unavailable".to_string()))
        }
    }

    async fn acknowledged(h: &Harness) -> bool {
        h.repo.find_by_id(&h.contact.id).await.unwrap().unwrap().acknowledged
    }

    #[tokio::test]
    async fn test_first_tap_arms_and_acknowledges() {
        let h = harness(ScriptedFeedback::immediate(), FakeDialer::new()).await;
        h.clock.set(0);

        assert_eq!(h.gate.on_tap(&h.contact).await.unwrap(), TapOutcome::Armed);
        assert_eq!(h.feedback.spoken(), vec!["这是张三的电话，再次点击可以拨打"]);
        assert_eq!(h.feedback.vibrations(), vec![Vibration::Duration(200)]);
        assert!(h.dialer.opened().is_empty());
        assert!(acknowledged(&h).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_tap_inside_window_dials() {
        let h = harness(ScriptedFeedback::immediate(), FakeDialer::new()).await;
        h.clock.set(0);
        h.gate.on_tap(&h.contact).await.unwrap();

        h.clock.set(2000);
        let started = tokio::time::Instant::now();
        let outcome = h.gate.on_tap(&h.contact).await.unwrap();

        assert_eq!(outcome, TapOutcome::Dialed { url: "tel:13800138000".to_string() });
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(h.dialer.opened(), vec!["tel:13800138000"]);
        assert_eq!(h.feedback.spoken()[1], "拨打张三的电话");
        assert_eq!(
            h.feedback.vibrations()[1..].to_vec(),
            vec![Vibration::Pattern(vec![0, 100, 50, 100]), Vibration::Duration(300)]
        );
        // A dial closes the cycle
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Unset);
    }

    #[tokio::test]
    async fn test_second_tap_after_window_rearms() {
        let h = harness(ScriptedFeedback::immediate(), FakeDialer::new()).await;
        h.clock.set(300);
        h.gate.on_tap(&h.contact).await.unwrap();

        h.clock.set(10_000);
        assert_eq!(h.gate.on_tap(&h.contact).await.unwrap(), TapOutcome::Armed);
        assert!(h.dialer.opened().is_empty());
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 10_000 });
    }

    #[tokio::test]
    async fn test_arm_time_is_taken_when_prompt_ends() {
        let h = harness(ScriptedFeedback::gated(), FakeDialer::new()).await;
        h.clock.set(0);

        let gate = h.gate.clone();
        let contact = h.contact.clone();
        let tap = tokio::spawn(async move { gate.on_tap(&contact).await });
        h.feedback.wait_pending(1).await;

        // Nothing recorded while the prompt is playing
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Unset);
        assert!(!acknowledged(&h).await);

        h.clock.set(300);
        h.feedback.finish_next();
        assert_eq!(tap.await.unwrap().unwrap(), TapOutcome::Armed);
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 300 });
    }

    #[tokio::test]
    async fn test_overlapping_taps_keep_only_the_latest_arm() {
        let h = harness(ScriptedFeedback::gated(), FakeDialer::new()).await;

        h.clock.set(0);
        let (gate, contact) = (h.gate.clone(), h.contact.clone());
        let first = tokio::spawn(async move { gate.on_tap(&contact).await });
        h.feedback.wait_pending(1).await;

        h.clock.set(500);
        let (gate, contact) = (h.gate.clone(), h.contact.clone());
        let second = tokio::spawn(async move { gate.on_tap(&contact).await });
        h.feedback.wait_pending(2).await;

        // First prompt ends late; its tap is stale
        h.clock.set(700);
        h.feedback.finish_next();
        assert_eq!(first.await.unwrap().unwrap(), TapOutcome::Superseded);
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Unset);
        assert!(!acknowledged(&h).await);

        h.clock.set(900);
        h.feedback.finish_next();
        assert_eq!(second.await.unwrap().unwrap(), TapOutcome::Armed);
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 900 });
        assert!(acknowledged(&h).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dial_failure_keeps_state() {
        let h = harness(ScriptedFeedback::immediate(), FakeDialer::failing()).await;
        h.clock.set(0);
        h.gate.on_tap(&h.contact).await.unwrap();

        h.clock.set(1000);
        let err = h.gate.on_tap(&h.contact).await.unwrap_err();
        assert!(matches!(err, DomainError::Dialer(_)));
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 0 });
        assert!(acknowledged(&h).await);
    }

    #[tokio::test]
    async fn test_speech_failure_does_not_arm() {
        let h = harness(ScriptedFeedback::failing(), FakeDialer::new()).await;
        assert!(h.gate.on_tap(&h.contact).await.is_err());
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Unset);
        assert!(!acknowledged(&h).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_confirm_keeps_the_arm_of_a_later_tap() {
        let h = harness(ScriptedFeedback::gated(), FakeDialer::new()).await;

        h.clock.set(0);
        let (gate, contact) = (h.gate.clone(), h.contact.clone());
        let arm = tokio::spawn(async move { gate.on_tap(&contact).await });
        h.feedback.wait_pending(1).await;
        h.clock.set(300);
        h.feedback.finish_next();
        assert_eq!(arm.await.unwrap().unwrap(), TapOutcome::Armed);

        // Confirming tap, its prompt still playing
        h.clock.set(8000);
        let (gate, contact) = (h.gate.clone(), h.contact.clone());
        let confirm = tokio::spawn(async move { gate.on_tap(&contact).await });
        h.feedback.wait_pending(1).await;

        // Window has closed for the next tap, so it arms again
        h.clock.set(8400);
        let (gate, contact) = (h.gate.clone(), h.contact.clone());
        let rearm = tokio::spawn(async move { gate.on_tap(&contact).await });
        h.feedback.wait_pending(2).await;

        h.clock.set(8500);
        h.feedback.finish_next();
        h.feedback.finish_next();

        assert_eq!(rearm.await.unwrap().unwrap(), TapOutcome::Armed);
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 8500 });

        assert_eq!(
            confirm.await.unwrap().unwrap(),
            TapOutcome::Dialed { url: "tel:13800138000".to_string() }
        );
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 8500 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_stands_when_acknowledged_cannot_be_saved() {
        let h = harness_over(
            Arc::new(BrokenStore),
            ScriptedFeedback::immediate(),
            FakeDialer::new(),
        );

        h.clock.set(0);
        assert_eq!(h.gate.on_tap(&h.contact).await.unwrap(), TapOutcome::Armed);
        assert_eq!(h.gate.state(&h.contact.id).await, PressState::Armed { since_ms: 0 });

        h.clock.set(2000);
        assert_eq!(
            h.gate.on_tap(&h.contact).await.unwrap(),
            TapOutcome::Dialed { url: "tel:13800138000".to_string() }
        );
    }
}
