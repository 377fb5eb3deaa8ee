//! Press Tracker
//!
//! Per-contact record of the last completed informational tap.
//!
//! A tap either *arms* the contact (first tap, or the window has elapsed) or
//! *confirms* it (a completed arm happened less than `window` ago). Arming is
//! two-step: `tap` hands out an [`ArmTicket`], and the arm only takes effect
//! when `complete_arm` is called with it after the voice prompt finished.
//! Every tap bumps the contact's generation, so a ticket issued before a
//! later tap is rejected.

use std::collections::HashMap;
use std::time::Duration;

/// Observable state of one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    /// No completed arm, or it expired
    Unset,
    /// Armed at the given time, window still open
    Armed { since_ms: u64 },
}

/// Proof of an arm in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmTicket {
    pub contact_id: String,
    pub generation: u64,
}

/// What a tap should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapDecision {
    Arm(ArmTicket),
    Confirm { generation: u64 },
}

#[derive(Debug, Clone, Default)]
struct PressRecord {
    last_tap_ms: Option<u64>,
    generation: u64,
}

#[derive(Debug)]
pub struct PressTracker {
    window_ms: u64,
    records: HashMap<String, PressRecord>,
}

impl PressTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis() as u64,
            records: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Register a tap at `now_ms` and decide between arming and confirming.
    /// Does not touch the last-tap time.
    pub fn tap(&mut self, contact_id: &str, now_ms: u64) -> TapDecision {
        let window_ms = self.window_ms;
        let record = self.records.entry(contact_id.to_string()).or_default();
        record.generation += 1;

        match record.last_tap_ms {
            // A clock that went backwards counts as zero elapsed
            Some(last) if now_ms.saturating_sub(last) < window_ms => TapDecision::Confirm {
                generation: record.generation,
            },
            _ => TapDecision::Arm(ArmTicket {
                contact_id: contact_id.to_string(),
                generation: record.generation,
            }),
        }
    }

    /// Finish an arm once its prompt is done. Returns `false` when another tap
    /// on the same contact happened since the ticket was issued; nothing is
    /// recorded in that case.
    pub fn complete_arm(&mut self, ticket: &ArmTicket, done_ms: u64) -> bool {
        match self.records.get_mut(&ticket.contact_id) {
            Some(record) if record.generation == ticket.generation => {
                record.last_tap_ms = Some(done_ms);
                true
            }
            _ => false,
        }
    }

    /// Forget the completed arm after the confirming tap `generation` dialed.
    /// Returns `false` and keeps the record when a later tap happened since.
    pub fn reset(&mut self, contact_id: &str, generation: u64) -> bool {
        match self.records.get_mut(contact_id) {
            Some(record) if record.generation == generation => {
                record.last_tap_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn last_tap_ms(&self, contact_id: &str) -> Option<u64> {
        self.records.get(contact_id).and_then(|r| r.last_tap_ms)
    }

    pub fn state(&self, contact_id: &str, now_ms: u64) -> PressState {
        match self.last_tap_ms(contact_id) {
            Some(since_ms) if now_ms.saturating_sub(since_ms) < self.window_ms => {
                PressState::Armed { since_ms }
            }
            _ => PressState::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PressTracker {
        PressTracker::new(Duration::from_millis(8000))
    }

    fn expect_arm(decision: TapDecision) -> ArmTicket {
        match decision {
            TapDecision::Arm(ticket) => ticket,
            other => panic!("expected arm, got {:?}", other),
        }
    }

    #[test]
    fn test_first_tap_arms_without_recording() {
        let mut t = tracker();
        let ticket = expect_arm(t.tap("1", 0));
        assert_eq!(ticket.contact_id, "1");
        assert_eq!(t.last_tap_ms("1"), None);
        assert_eq!(t.state("1", 0), PressState::Unset);
    }

    #[test]
    fn test_tap_before_prompt_done_does_not_confirm() {
        let mut t = tracker();
        let first = expect_arm(t.tap("1", 0));
        // Second tap while the first prompt is still playing
        let second = expect_arm(t.tap("1", 500));

        // The first prompt finishing late must not arm with its stale ticket
        assert!(!t.complete_arm(&first, 600));
        assert_eq!(t.last_tap_ms("1"), None);

        assert!(t.complete_arm(&second, 900));
        assert_eq!(t.last_tap_ms("1"), Some(900));
    }

    #[test]
    fn test_confirm_inside_window() {
        let mut t = tracker();
        let ticket = expect_arm(t.tap("1", 0));
        assert!(t.complete_arm(&ticket, 300));
        assert_eq!(t.state("1", 2000), PressState::Armed { since_ms: 300 });

        assert!(matches!(t.tap("1", 2000), TapDecision::Confirm { .. }));
        // Confirming leaves the arm time alone
        assert_eq!(t.last_tap_ms("1"), Some(300));
    }

    #[test]
    fn test_rearm_after_window() {
        let mut t = tracker();
        let ticket = expect_arm(t.tap("1", 0));
        t.complete_arm(&ticket, 300);

        assert_eq!(t.state("1", 10_000), PressState::Unset);
        expect_arm(t.tap("1", 10_000));
        // Exactly at the boundary the window is closed
        let mut t = tracker();
        let ticket = expect_arm(t.tap("1", 0));
        t.complete_arm(&ticket, 300);
        expect_arm(t.tap("1", 8300));
    }

    #[test]
    fn test_contacts_are_independent() {
        let mut t = tracker();
        let a = expect_arm(t.tap("a", 0));
        t.complete_arm(&a, 100);

        expect_arm(t.tap("b", 200));
        assert!(matches!(t.tap("a", 300), TapDecision::Confirm { .. }));
    }

    #[test]
    fn test_stale_arm_after_confirm_is_ignored() {
        let mut t = tracker();
        let a = expect_arm(t.tap("1", 0));
        t.complete_arm(&a, 100);

        // Window expires, a new arm starts but its prompt is slow
        let slow = expect_arm(t.tap("1", 9000));
        // Meanwhile the arm is completed by a fresher tap and confirmed
        let fresh = expect_arm(t.tap("1", 9100));
        assert!(t.complete_arm(&fresh, 9200));
        let TapDecision::Confirm { generation } = t.tap("1", 9300) else {
            panic!("expected confirm");
        };
        assert!(t.reset("1", generation));

        assert!(!t.complete_arm(&slow, 9400));
        assert_eq!(t.last_tap_ms("1"), None);
    }

    #[test]
    fn test_late_confirm_keeps_a_newer_arm() {
        let mut t = tracker();
        let a = expect_arm(t.tap("1", 0));
        t.complete_arm(&a, 300);

        let TapDecision::Confirm { generation } = t.tap("1", 8000) else {
            panic!("expected confirm");
        };
        // Window closed by the time of the next tap, so it arms again
        let rearm = expect_arm(t.tap("1", 8400));
        assert!(t.complete_arm(&rearm, 8500));

        // The earlier confirm finishes its dial afterwards
        assert!(!t.reset("1", generation));
        assert_eq!(t.last_tap_ms("1"), Some(8500));
    }

    #[test]
    fn test_clock_going_backwards_counts_as_inside_window() {
        let mut t = tracker();
        let a = expect_arm(t.tap("1", 5000));
        t.complete_arm(&a, 5000);
        assert!(matches!(t.tap("1", 4000), TapDecision::Confirm { .. }));
    }

    #[test]
    fn test_unknown_ticket_is_rejected() {
        let mut t = tracker();
        let ticket = ArmTicket {
            contact_id: "ghost".to_string(),
            generation: 1,
        };
        assert!(!t.complete_arm(&ticket, 0));
    }
}
