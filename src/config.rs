//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and BLE identity
//! strings live here so they can be tuned in one place.

use crate::hid::keycodes::*;
use crate::scan::layout::InputLine;

// Input scan

/// Scan loop poll period (ms). One full pin scan per period.
pub const SCAN_POLL_MS: u64 = 1;

/// Key / joystick wiring table, in scan order.
///
/// Scan order doubles as the spill priority: when more lines are active
/// than fit in one 6-key report, earlier entries go out first.
///
/// All switches are wired to ground and rely on the internal pull-up,
/// so every line is active-low.
///
/// Note: the left-shift switch is deliberately mapped as the 0xE1
/// keycode in the key array, not as a modifier bit; the modifier byte
/// of every outgoing report stays zero.
pub const KEYMAP: [InputLine; 12] = [
    InputLine::active_low(11, KEY_LEFT_SHIFT),
    InputLine::active_low(2, KEY_ARROW_UP),
    InputLine::active_low(3, KEY_ARROW_DOWN),
    InputLine::active_low(4, KEY_ARROW_LEFT),
    InputLine::active_low(5, KEY_ARROW_RIGHT),
    InputLine::active_low(28, KEY_Q),
    InputLine::active_low(29, KEY_W),
    InputLine::active_low(7, KEY_RETURN),
    InputLine::active_low(15, KEY_Z),
    InputLine::active_low(16, KEY_X),
    InputLine::active_low(31, KEY_A),
    InputLine::active_low(30, KEY_S),
];

// Status LED

/// Blink period of the status LED while disconnected (ms).
pub const BLINK_INTERVAL_MS: u64 = 1000;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types
// are selected in `main.rs`.  Adjust for your custom PCB.
//
//   Switches        → see KEYMAP above (all port 0)
//   Status LED      → P0.26 (connection indicator)
//   Host LED        → P0.12 (lit while the host asserts any LED bit)

// BLE identity

/// GAP device name, also carried in the advertising packet.
pub const BLE_DEVICE_NAME: &str = "BLE Joystick";

/// Device Information Service strings.
pub const BLE_MANUFACTURER: &str = "Psimax Aerospace";
pub const BLE_MODEL_NUMBER: &str = "Joy 7";

// Advertising cadence (TX power is fixed at +4 dBm in `ble::advertising`)

/// Fast advertising interval (0.625 ms units). 32 = 20 ms.
pub const BLE_ADV_INTERVAL_FAST: u32 = 32;

/// Slow advertising interval (0.625 ms units). 244 = 152.5 ms.
pub const BLE_ADV_INTERVAL_SLOW: u32 = 244;

/// How long to advertise at the fast interval before dropping to the
/// slow one (seconds).
pub const BLE_ADV_FAST_TIMEOUT_SECS: u64 = 30;
