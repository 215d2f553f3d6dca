//! Static key wiring table.
//!
//! One record per physical switch: GPIO line number, the keycode it
//! produces, and its electrical polarity. A single ordered table keeps
//! the line↔keycode correspondence in one place instead of two
//! index-aligned arrays that must be kept in sync by hand.

use crate::error::ConfigError;

/// One physical input channel.
///
/// Immutable after construction; the whole table is a `const` in
/// `config.rs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputLine {
    /// GPIO line number (port 0).
    pub pin: u8,
    /// HID usage code sent while the line is active.
    pub keycode: u8,
    /// `true` if the switch pulls the line low when pressed
    /// (internal pull-up wiring).
    pub active_low: bool,
}

impl InputLine {
    /// A switch wired to ground with the internal pull-up enabled.
    pub const fn active_low(pin: u8, keycode: u8) -> Self {
        Self {
            pin,
            keycode,
            active_low: true,
        }
    }

    /// A switch wired to the supply rail (external pull-down).
    pub const fn active_high(pin: u8, keycode: u8) -> Self {
        Self {
            pin,
            keycode,
            active_low: false,
        }
    }

    /// Translate a raw digital level into "switch pressed".
    pub fn is_active(&self, level_high: bool) -> bool {
        if self.active_low {
            !level_high
        } else {
            level_high
        }
    }
}

/// Validate a wiring table: every line id must be claimed exactly once.
///
/// Called once at startup; an error here is fatal because scanning with
/// a duplicated line would give that pin two keycodes.
pub fn validate(lines: &[InputLine]) -> Result<(), ConfigError> {
    for (i, line) in lines.iter().enumerate() {
        if lines[..i].iter().any(|earlier| earlier.pin == line.pin) {
            return Err(ConfigError::DuplicateLine(line.pin));
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
