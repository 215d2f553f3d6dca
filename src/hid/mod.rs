//! HID keyboard report types and the keycode alphabet.

pub mod keyboard;
pub mod keycodes;

pub use keyboard::KeyboardReport;
