//! Commands Layer
//!
//! Handlers the screens call into. Each takes the shared `AppState`.

mod contact_cmd;
mod dial_cmd;

pub use contact_cmd::*;
pub use dial_cmd::*;
