//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral**
//! role:
//!
//! 1. **Advertising** - connectable advertising as a HID keyboard
//!    (fast burst, then slow indefinitely).
//! 2. **GATT server** - HID-over-GATT boot keyboard service plus the
//!    Device Information Service.
//!
//! Communication with the scan loop is done via Embassy channels
//! defined here: outgoing reports flow through [`REPORT_QUEUE`],
//! connection transitions through [`CONNECTION_EVENTS`], and host LED
//! bitmap writes through [`KEYBOARD_LED`]. Channel delivery is what
//! makes a connect/disconnect visible to the loop as one whole event,
//! never a half-applied flag.

pub mod advertising;
pub mod server;

use crate::hid::keyboard::KeyboardReport;
use crate::scan::scanner::ReportSink;
use defmt::Format;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

/// Connection lifecycle transitions, radio task → scan loop.
#[derive(Clone, Copy, Format)]
pub enum ConnectionEvent {
    /// A central connected and the GATT link is up.
    Connected,
    /// The link dropped (peer-initiated, timeout, or local).
    Disconnected,
}

/// One transmissible unit handed to the radio task.
#[derive(Clone, Copy, Format)]
pub enum OutboundReport {
    /// A report with at least one key slot populated.
    Keys(KeyboardReport),
    /// The canonical all-keys-released report.
    Release,
}

/// Connection transitions, drained by the scan loop each iteration.
pub static CONNECTION_EVENTS: Channel<CriticalSectionRawMutex, ConnectionEvent, 4> = Channel::new();

/// Outgoing key reports, forwarded as GATT notifications while a peer
/// is connected and subscribed.
pub static REPORT_QUEUE: Channel<CriticalSectionRawMutex, OutboundReport, 8> = Channel::new();

/// Keyboard LED bitmap written by the host (Caps Lock etc.).
pub static KEYBOARD_LED: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Report sink backed by [`REPORT_QUEUE`].
///
/// Transmission is fire-and-forget: when the queue is full the link is
/// stalled and the report would be stale by the next scan anyway, so
/// it is silently dropped.
pub struct BleSink;

impl ReportSink for BleSink {
    fn transmit(&mut self, report: &KeyboardReport) {
        let _ = REPORT_QUEUE.try_send(OutboundReport::Keys(*report));
    }

    fn transmit_release(&mut self) {
        let _ = REPORT_QUEUE.try_send(OutboundReport::Release);
    }
}
