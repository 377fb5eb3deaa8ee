//! Dialing
//!
//! Double-tap confirmation in front of the dialer, and the dialer itself.

mod caller;
mod device;
mod gate;
mod press_tracker;

pub use caller::{DialScheme, PhoneCaller};
pub use device::{
    CallPermission, Clock, DeviceServices, Dialer, Feedback, PermissionStatus, SystemClock,
};
pub use gate::{DialGate, TapOutcome};
pub use press_tracker::{ArmTicket, PressState, PressTracker, TapDecision};
