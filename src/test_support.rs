//! Shared setup for screen tests

use std::sync::Arc;

use tap_dial_lib::config::Settings;
use tap_dial_lib::repository::MemoryStore;
use tap_dial_lib::testing::FakeDevice;
use tap_dial_lib::AppState;

use crate::navigation::RouteStack;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub device: FakeDevice,
    pub nav: Arc<RouteStack>,
    pub store: Arc<MemoryStore>,
}

pub fn app() -> TestApp {
    app_with(Settings::default())
}

pub fn app_with(settings: Settings) -> TestApp {
    let device = FakeDevice::new();
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::with_store(settings, store.clone(), device.services()));
    TestApp {
        state,
        device,
        nav: Arc::new(RouteStack::new()),
        store,
    }
}
