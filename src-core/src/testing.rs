//! Test doubles for the device services.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::config::{Vibration, VoiceSettings};
use crate::dialing::{CallPermission, Clock, DeviceServices, Dialer, Feedback, PermissionStatus};
use crate::domain::{DomainError, DomainResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum SpeechMode {
    Immediate,
    Gated,
    Failing,
}

/// Records speech and vibration. In gated mode every `speak` waits until
/// the test calls `finish_next`.
pub struct ScriptedFeedback {
    mode: SpeechMode,
    spoken: Mutex<Vec<String>>,
    vibrations: Mutex<Vec<Vibration>>,
    pending: Mutex<VecDeque<oneshot::Sender<()>>>,
}

impl ScriptedFeedback {
    fn with_mode(mode: SpeechMode) -> Self {
        Self {
            mode,
            spoken: Mutex::new(Vec::new()),
            vibrations: Mutex::new(Vec::new()),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn immediate() -> Self {
        Self::with_mode(SpeechMode::Immediate)
    }

    pub fn gated() -> Self {
        Self::with_mode(SpeechMode::Gated)
    }

    pub fn failing() -> Self {
        Self::with_mode(SpeechMode::Failing)
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn vibrations(&self) -> Vec<Vibration> {
        self.vibrations.lock().unwrap().clone()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Yield until at least `count` prompts are waiting
    pub async fn wait_pending(&self, count: usize) {
        while self.pending() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Let the oldest waiting prompt finish
    pub fn finish_next(&self) {
        if let Some(done) = self.pending.lock().unwrap().pop_front() {
            let _ = done.send(());
        }
    }
}

#[async_trait]
impl Feedback for ScriptedFeedback {
    async fn speak(&self, text: &str, _voice: &VoiceSettings) -> DomainResult<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        match self.mode {
            SpeechMode::Immediate => Ok(()),
            SpeechMode::Failing => {
                Err(DomainError::Speech("speech engine unavailable".to_string()))
            }
            SpeechMode::Gated => {
                let (tx, rx) = oneshot::channel();
                self.pending.lock().unwrap().push_back(tx);
                let _ = rx.await;
                Ok(())
            }
        }
    }

    fn vibrate(&self, vibration: &Vibration) {
        self.vibrations.lock().unwrap().push(vibration.clone());
    }
}

/// Remembers every URL it was asked to open
pub struct FakeDialer {
    fail: bool,
    opened: Mutex<Vec<String>>,
}

impl FakeDialer {
    pub fn new() -> Self {
        Self {
            fail: false,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Default for FakeDialer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dialer for FakeDialer {
    async fn open_url(&self, url: &str) -> DomainResult<()> {
        if self.fail {
            return Err(DomainError::Dialer(format!("no handler for {}", url)));
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct FakePermission {
    status: PermissionStatus,
    requests: AtomicUsize,
}

impl FakePermission {
    pub fn granted() -> Self {
        Self {
            status: PermissionStatus::Granted,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            status: PermissionStatus::Denied,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallPermission for FakePermission {
    async fn request_call_permission(&self) -> DomainResult<PermissionStatus> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.status)
    }
}

/// Clock the test moves by hand
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Fakes wired together, with handles kept for assertions
pub struct FakeDevice {
    pub feedback: Arc<ScriptedFeedback>,
    pub dialer: Arc<FakeDialer>,
    pub permission: Arc<FakePermission>,
    pub clock: Arc<ManualClock>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            feedback: Arc::new(ScriptedFeedback::immediate()),
            dialer: Arc::new(FakeDialer::new()),
            permission: Arc::new(FakePermission::granted()),
            clock: Arc::new(ManualClock::new(0)),
        }
    }

    pub fn services(&self) -> DeviceServices {
        DeviceServices {
            feedback: self.feedback.clone(),
            dialer: self.dialer.clone(),
            permission: self.permission.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new()
    }
}
