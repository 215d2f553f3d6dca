//! Input scanning subsystem.
//!
//! - **layout**: the static wiring table (GPIO line → keycode) and its
//!   startup validation.
//! - **scanner**: the per-cycle scan-and-report algorithm - batches
//!   active lines into 6-key reports and emits one release report per
//!   press→idle transition.

pub mod layout;
pub mod scanner;

pub use layout::InputLine;
pub use scanner::{InputScanner, LineReader, ReportSink};
