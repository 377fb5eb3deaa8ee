//! Tap-Dial UI
//!
//! Screen controllers and navigation over the core crate, plus the console
//! device adapters used by the `tap-dial` shell.

pub mod app;
pub mod device;
pub mod navigation;
pub mod screens;

#[cfg(test)]
mod test_support;
