//! USB HID keyboard usage codes (Usage Page 0x07) used by the key table.
//!
//! Only the codes the shipped wiring needs are listed; extend as the
//! hardware grows keys.

pub const KEY_A: u8 = 0x04;
pub const KEY_Q: u8 = 0x14;
pub const KEY_S: u8 = 0x16;
pub const KEY_W: u8 = 0x1A;
pub const KEY_X: u8 = 0x1B;
pub const KEY_Z: u8 = 0x1D;
pub const KEY_RETURN: u8 = 0x28;
pub const KEY_ARROW_RIGHT: u8 = 0x4F;
pub const KEY_ARROW_LEFT: u8 = 0x50;
pub const KEY_ARROW_DOWN: u8 = 0x51;
pub const KEY_ARROW_UP: u8 = 0x52;

/// Left Shift as an *array* keycode (usage 0xE1), not the modifier bit.
/// The shipped keymap sends shift this way on purpose.
pub const KEY_LEFT_SHIFT: u8 = 0xE1;
