//! Connection status LED state machine.
//!
//! Solid on while a peer is connected; 1 Hz blink (configurable
//! period) while disconnected. The blink is advanced by polling with
//! the current wall-clock time, so a poll that arrives early is a
//! no-op and the scan loop never blocks on the LED.

/// Physical status output.
///
/// Implemented over a real GPIO output on target and over fixtures in
/// tests.
pub trait IndicatorSink {
    /// Drive the indicator (`true` = lit).
    fn set_indicator(&mut self, on: bool);
}

/// Tracks link status and drives the status LED.
///
/// State transitions come exclusively from [`on_connected`] /
/// [`on_disconnected`]; duplicate notifications are idempotent.
///
/// [`on_connected`]: ConnectionIndicator::on_connected
/// [`on_disconnected`]: ConnectionIndicator::on_disconnected
pub struct ConnectionIndicator {
    connected: bool,
    led_on: bool,
    last_toggle_ms: u64,
    blink_interval_ms: u64,
}

impl ConnectionIndicator {
    /// Start in the Disconnected state (boot condition), LED dark.
    pub const fn new(blink_interval_ms: u64) -> Self {
        Self {
            connected: false,
            led_on: false,
            last_toggle_ms: 0,
            blink_interval_ms,
        }
    }

    /// Peer connected: force the LED solid on and park the blink.
    pub fn on_connected<S: IndicatorSink>(&mut self, sink: &mut S) {
        self.connected = true;
        self.led_on = true;
        sink.set_indicator(true);
    }

    /// Peer disconnected: LED off now, blinking resumes on poll.
    pub fn on_disconnected<S: IndicatorSink>(&mut self, sink: &mut S) {
        self.connected = false;
        self.led_on = false;
        sink.set_indicator(false);
    }

    /// Current link status as last notified.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Advance the blink. Call once per loop iteration with the
    /// current monotonic time in milliseconds.
    ///
    /// While connected this does nothing - the blink timer is not
    /// advanced, so the LED stays forced on.
    pub fn poll<S: IndicatorSink>(&mut self, now_ms: u64, sink: &mut S) {
        if self.connected {
            return;
        }
        if now_ms - self.last_toggle_ms >= self.blink_interval_ms {
            self.last_toggle_ms = now_ms;
            self.led_on = !self.led_on;
            sink.set_indicator(self.led_on);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every `set_indicator` call with the poll time that
    /// caused it (connect/disconnect writes are logged with the last
    /// seen time).
    #[derive(Default)]
    struct LedLog {
        writes: Vec<bool>,
    }

    impl IndicatorSink for LedLog {
        fn set_indicator(&mut self, on: bool) {
            self.writes.push(on);
        }
    }

    #[test]
    fn boot_blink_toggles_once_per_interval() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        // 0→2500 ms in 1 ms steps: toggles at 1000 and 2000 only.
        let mut toggle_times = Vec::new();
        for now in 0..=2500u64 {
            let before = led.writes.len();
            ind.poll(now, &mut led);
            if led.writes.len() > before {
                toggle_times.push(now);
            }
        }
        assert_eq!(toggle_times, [1000, 2000]);
        assert_eq!(led.writes, [true, false]);
    }

    #[test]
    fn toggle_spacing_is_never_below_interval() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        let mut last_toggle: Option<u64> = None;
        for now in (0..=10_000u64).step_by(3) {
            let before = led.writes.len();
            ind.poll(now, &mut led);
            if led.writes.len() > before {
                if let Some(prev) = last_toggle {
                    assert!(now - prev >= 1000);
                }
                last_toggle = Some(now);
            }
        }
        assert!(led.writes.len() >= 9);
    }

    #[test]
    fn connected_forces_led_on_and_parks_the_blink() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        ind.on_connected(&mut led);
        assert_eq!(led.writes, [true]);
        assert!(ind.is_connected());

        // Hours of polling must not touch the LED while connected.
        for now in (0..3_600_000u64).step_by(500) {
            ind.poll(now, &mut led);
        }
        assert_eq!(led.writes, [true]);
    }

    #[test]
    fn duplicate_connect_notifications_are_idempotent() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        ind.on_connected(&mut led);
        ind.on_connected(&mut led);

        // Second delivery repeats the identical forced write, nothing
        // more.
        assert_eq!(led.writes, [true, true]);
        assert!(ind.is_connected());

        ind.poll(5000, &mut led);
        assert_eq!(led.writes.len(), 2);
    }

    #[test]
    fn disconnect_turns_led_off_then_blinking_resumes() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        ind.on_connected(&mut led);
        ind.on_disconnected(&mut led);
        assert_eq!(led.writes, [true, false]);
        assert!(!ind.is_connected());

        // Blink picks the timer back up relative to the last toggle.
        for now in 0..=2500u64 {
            ind.poll(now, &mut led);
        }
        assert_eq!(led.writes, [true, false, true, false]);
    }

    #[test]
    fn duplicate_disconnect_notifications_are_idempotent() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        ind.on_disconnected(&mut led);
        ind.on_disconnected(&mut led);
        assert_eq!(led.writes, [false, false]);
        assert!(!ind.is_connected());
    }

    #[test]
    fn early_poll_is_a_no_op() {
        let mut ind = ConnectionIndicator::new(1000);
        let mut led = LedLog::default();

        ind.poll(999, &mut led);
        assert!(led.writes.is_empty());
        ind.poll(1000, &mut led);
        assert_eq!(led.writes, [true]);
    }
}
