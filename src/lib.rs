//! Host-testable library interface for blejoy.
//!
//! The core logic - pin-scan-to-report encoding and the connection
//! LED state machine - is pure no_std code behind small traits
//! (`LineReader`, `ReportSink`, `IndicatorSink`), so the whole of it
//! runs under plain `cargo test` on the host with no embedded hardware
//! required.
//!
//! The radio-facing side (`ble`, `main.rs`) only compiles with the
//! `embedded` feature and the nRF52840 target.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod scan;

#[cfg(feature = "embedded")]
pub mod ble;

pub use error::ConfigError;
pub use hid::keyboard::KeyboardReport;
pub use indicator::{ConnectionIndicator, IndicatorSink};
pub use scan::{InputLine, InputScanner, LineReader, ReportSink};
