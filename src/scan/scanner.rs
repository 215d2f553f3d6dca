//! Per-cycle input scan → HID report encoding.
//!
//! Each call to [`InputScanner::scan`] reads every configured line
//! once, packs the active keycodes into 6-key reports (spilling into
//! additional reports within the same cycle when more than 6 lines are
//! down), and sends exactly one all-keys-released report when the
//! device goes from "something pressed" to "nothing pressed".
//!
//! The scanner never blocks and never retries: report transmission is
//! fire-and-forget into a [`ReportSink`] owned by the transport.

use crate::error::ConfigError;
use crate::hid::keyboard::{KeyboardReport, REPORT_KEYS};
use crate::scan::layout::{self, InputLine};

/// Instantaneous digital level of one configured line.
///
/// Implemented over real GPIO on target and over fixtures in tests.
pub trait LineReader {
    /// Raw logic level of the given line (`true` = high).
    fn read_level(&mut self, pin: u8) -> bool;
}

/// Outbound report interface owned by the transport layer.
///
/// No acknowledgement is observable; a sink that drops reports on a
/// congested link is acceptable.
pub trait ReportSink {
    /// Send one keyboard report.
    fn transmit(&mut self, report: &KeyboardReport);

    /// Send the canonical all-keys-released report.
    fn transmit_release(&mut self);
}

/// Scans a fixed wiring table and encodes reports.
///
/// Owns the only piece of cross-cycle state the algorithm needs: the
/// "previous cycle had an active line" flag behind the idle-report
/// suppression rule.
pub struct InputScanner<'a> {
    lines: &'a [InputLine],
    any_pressed_prev: bool,
}

impl<'a> InputScanner<'a> {
    /// Build a scanner over a wiring table.
    ///
    /// Fails if the table claims the same GPIO line twice; the caller
    /// must treat that as fatal rather than scan with an undefined
    /// line→keycode correspondence.
    pub fn new(lines: &'a [InputLine]) -> Result<Self, ConfigError> {
        layout::validate(lines)?;
        Ok(Self {
            lines,
            any_pressed_prev: false,
        })
    }

    /// Run one full scan cycle and emit reports.
    ///
    /// Lines are visited in table order, which is also the spill
    /// priority when more than [`REPORT_KEYS`] lines are active at
    /// once: the first 6 active lines go out in the first report, the
    /// next 6 in the second, and so on, all within this call.
    pub fn scan<R: LineReader, S: ReportSink>(&mut self, reader: &mut R, sink: &mut S) {
        let mut keycodes = [0u8; REPORT_KEYS];
        let mut count = 0;
        let mut any_pressed = false;

        // The shipped keymap carries shift as an array keycode, so the
        // modifier byte is constant zero. The report format keeps the
        // field for future line→modifier mappings.
        let modifier = 0u8;

        for line in self.lines {
            if line.is_active(reader.read_level(line.pin)) {
                keycodes[count] = line.keycode;
                count += 1;
                any_pressed = true;

                if count == REPORT_KEYS {
                    sink.transmit(&KeyboardReport::new(modifier, keycodes));
                    count = 0;
                    keycodes = [0; REPORT_KEYS];
                }
            }
        }

        // Leftover keys (1-5) that didn't fill a whole report.
        if count > 0 {
            sink.transmit(&KeyboardReport::new(modifier, keycodes));
        }

        // Tell the host "all keys up" exactly once per press→idle
        // transition instead of flooding it every idle cycle.
        if !any_pressed && self.any_pressed_prev {
            sink.transmit_release();
        }
        self.any_pressed_prev = any_pressed;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::keycodes::*;

    /// Fixed levels per pin; pins default to high (pulled up, idle).
    struct FakeLines {
        low_pins: Vec<u8>,
    }

    impl FakeLines {
        fn idle() -> Self {
            Self { low_pins: vec![] }
        }

        fn pressed(pins: &[u8]) -> Self {
            Self {
                low_pins: pins.to_vec(),
            }
        }
    }

    impl LineReader for FakeLines {
        fn read_level(&mut self, pin: u8) -> bool {
            !self.low_pins.contains(&pin)
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Sent {
        Report(u8, [u8; REPORT_KEYS]),
        Release,
    }

    #[derive(Default)]
    struct SinkLog {
        sent: Vec<Sent>,
    }

    impl ReportSink for SinkLog {
        fn transmit(&mut self, report: &KeyboardReport) {
            self.sent.push(Sent::Report(report.modifier, report.keycodes));
        }

        fn transmit_release(&mut self) {
            self.sent.push(Sent::Release);
        }
    }

    fn table(n: u8) -> Vec<InputLine> {
        // Pins 1..=n mapped to keycodes 0x10.. in order.
        (1..=n)
            .map(|i| InputLine::active_low(i, 0x10 + i))
            .collect()
    }

    #[test]
    fn idle_cycle_sends_nothing() {
        let lines = table(8);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::idle(), &mut sink);
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn single_key_sends_one_report_zero_filled() {
        let lines = table(8);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::pressed(&[3]), &mut sink);
        assert_eq!(sink.sent, [Sent::Report(0, [0x13, 0, 0, 0, 0, 0])]);
    }

    #[test]
    fn eight_keys_spill_into_two_reports() {
        let lines = table(8);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::pressed(&[1, 2, 3, 4, 5, 6, 7, 8]), &mut sink);
        assert_eq!(
            sink.sent,
            [
                Sent::Report(0, [0x11, 0x12, 0x13, 0x14, 0x15, 0x16]),
                Sent::Report(0, [0x17, 0x18, 0, 0, 0, 0]),
            ]
        );
    }

    #[test]
    fn exactly_six_keys_send_one_full_report() {
        let lines = table(8);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::pressed(&[1, 2, 3, 4, 5, 6]), &mut sink);
        assert_eq!(
            sink.sent,
            [Sent::Report(0, [0x11, 0x12, 0x13, 0x14, 0x15, 0x16])]
        );
    }

    #[test]
    fn batch_count_is_ceil_of_active_over_six() {
        let lines = table(16);
        for k in 0..=16u8 {
            let mut scanner = InputScanner::new(&lines).unwrap();
            let mut sink = SinkLog::default();
            let pressed: Vec<u8> = (1..=k).collect();

            scanner.scan(&mut FakeLines::pressed(&pressed), &mut sink);

            let expected = (k as usize).div_ceil(REPORT_KEYS);
            assert_eq!(sink.sent.len(), expected, "k = {k}");

            // Concatenated slots must be exactly the active keycodes in
            // table order, then zero padding.
            let mut concat: Vec<u8> = sink
                .sent
                .iter()
                .flat_map(|s| match s {
                    Sent::Report(_, keys) => keys.to_vec(),
                    Sent::Release => panic!("unexpected release"),
                })
                .collect();
            concat.retain(|&k| k != 0);
            let expected_codes: Vec<u8> = (1..=k).map(|i| 0x10 + i).collect();
            assert_eq!(concat, expected_codes, "k = {k}");
        }
    }

    #[test]
    fn table_order_wins_over_pin_order() {
        // Table scans pin 9 before pin 2; the report must follow the
        // table, not the pin numbering.
        let lines = [
            InputLine::active_low(9, 0x20),
            InputLine::active_low(2, 0x21),
        ];
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::pressed(&[2, 9]), &mut sink);
        assert_eq!(sink.sent, [Sent::Report(0, [0x20, 0x21, 0, 0, 0, 0])]);
    }

    #[test]
    fn release_sent_exactly_once_after_keys_go_up() {
        let lines = table(4);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::pressed(&[1]), &mut sink);
        scanner.scan(&mut FakeLines::idle(), &mut sink);
        scanner.scan(&mut FakeLines::idle(), &mut sink);
        scanner.scan(&mut FakeLines::idle(), &mut sink);

        assert_eq!(
            sink.sent,
            [Sent::Report(0, [0x11, 0, 0, 0, 0, 0]), Sent::Release]
        );
    }

    #[test]
    fn no_release_at_boot_when_nothing_was_pressed() {
        let lines = table(4);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::idle(), &mut sink);
        scanner.scan(&mut FakeLines::idle(), &mut sink);
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn release_fires_again_only_after_an_active_cycle() {
        let lines = table(4);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        scanner.scan(&mut FakeLines::pressed(&[2]), &mut sink);
        scanner.scan(&mut FakeLines::idle(), &mut sink);
        scanner.scan(&mut FakeLines::pressed(&[2]), &mut sink);
        scanner.scan(&mut FakeLines::idle(), &mut sink);

        let releases = sink.sent.iter().filter(|s| **s == Sent::Release).count();
        assert_eq!(releases, 2);
        assert_eq!(sink.sent.len(), 4);
        assert_eq!(sink.sent[1], Sent::Release);
        assert_eq!(sink.sent[3], Sent::Release);
    }

    #[test]
    fn held_key_reports_every_cycle() {
        // A keyboard report states instantaneous key state, so a held
        // switch is re-sent each scan.
        let lines = table(4);
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        for _ in 0..3 {
            scanner.scan(&mut FakeLines::pressed(&[1]), &mut sink);
        }
        assert_eq!(sink.sent.len(), 3);
        assert!(sink
            .sent
            .iter()
            .all(|s| *s == Sent::Report(0, [0x11, 0, 0, 0, 0, 0])));
    }

    #[test]
    fn active_high_line_is_read_with_its_own_polarity() {
        let lines = [
            InputLine::active_low(1, 0x11),
            InputLine::active_high(2, 0x12),
        ];
        let mut scanner = InputScanner::new(&lines).unwrap();
        let mut sink = SinkLog::default();

        // Pin 1 high (idle for active-low), pin 2 high (pressed for
        // active-high).
        struct AllHigh;
        impl LineReader for AllHigh {
            fn read_level(&mut self, _pin: u8) -> bool {
                true
            }
        }
        scanner.scan(&mut AllHigh, &mut sink);
        assert_eq!(sink.sent, [Sent::Report(0, [0x12, 0, 0, 0, 0, 0])]);
    }

    #[test]
    fn duplicate_line_refused_at_construction() {
        let lines = [
            InputLine::active_low(1, 0x11),
            InputLine::active_low(1, 0x12),
        ];
        assert_eq!(
            InputScanner::new(&lines).err(),
            Some(ConfigError::DuplicateLine(1))
        );
    }

    #[test]
    fn shipped_keymap_shift_goes_out_as_keycode_not_modifier() {
        let mut scanner = InputScanner::new(&crate::config::KEYMAP).unwrap();
        let mut sink = SinkLog::default();

        // Pin 11 is the left-shift switch in the shipped wiring.
        scanner.scan(&mut FakeLines::pressed(&[11]), &mut sink);
        assert_eq!(
            sink.sent,
            [Sent::Report(0, [KEY_LEFT_SHIFT, 0, 0, 0, 0, 0])]
        );
    }
}
