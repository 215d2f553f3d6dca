//! Error types for blejoy.
//!
//! The taxonomy is intentionally minimal. The only recoverable-looking
//! error the core can produce is an inconsistent wiring table, and
//! that one is fatal at startup. Transport failures never surface
//! here: report transmission is fire-and-forget and the radio layer
//! logs its own trouble.
//!
//! We avoid `alloc` - variants carry only fixed-size data - and derive
//! `defmt::Format` for efficient on-target logging.

/// Configuration errors detectable when the scanner is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two entries in the key table claim the same GPIO line.
    /// Carries the offending pin number.
    DuplicateLine(u8),
}
