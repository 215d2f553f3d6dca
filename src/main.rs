//! blejoy - BLE HID joystick firmware for the nRF52840.
//!
//! Task layout:
//!   - `softdevice_task` - runs the SoftDevice event loop.
//!   - `ble_task`        - advertise → serve connection → repeat;
//!                         publishes connect/disconnect transitions.
//!   - `host_led_task`   - mirrors the host keyboard LED bitmap onto
//!                         the auxiliary LED.
//!   - main task         - the cooperative scan loop: one full pin
//!                         scan plus one indicator poll per 1 ms tick.

#![no_std]
#![no_main]

use blejoy::ble::{self, advertising, server, BleSink, ConnectionEvent};
use blejoy::ble::server::Server;
use blejoy::config;
use blejoy::indicator::{ConnectionIndicator, IndicatorSink};
use blejoy::scan::{InputScanner, LineReader};
use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Input, Level, Output, OutputDrive, Pin, Pull};
use embassy_nrf::interrupt::Priority;
use embassy_time::{Instant, Timer};
use nrf_softdevice::Softdevice;
use panic_probe as _;
use static_cell::StaticCell;

/// Number of wired input lines.
const LINE_COUNT: usize = config::KEYMAP.len();

/// GPIO-backed line reader over the wiring table.
struct GpioLines<'d> {
    inputs: [(u8, Input<'d>); LINE_COUNT],
}

impl<'d> GpioLines<'d> {
    /// Pair each keymap entry with its pin, pulled per polarity.
    fn new(pins: [AnyPin; LINE_COUNT]) -> Self {
        let mut index = 0;
        let inputs = pins.map(|pin| {
            let line = config::KEYMAP[index];
            index += 1;
            let pull = if line.active_low { Pull::Up } else { Pull::Down };
            (line.pin, Input::new(pin, pull))
        });
        Self { inputs }
    }
}

impl LineReader for GpioLines<'_> {
    fn read_level(&mut self, pin: u8) -> bool {
        match self.inputs.iter().find(|(id, _)| *id == pin) {
            Some((_, input)) => input.is_high(),
            // Unreachable with a validated table; report the pulled-up
            // idle level.
            None => true,
        }
    }
}

/// Connection status LED.
struct StatusLed<'d>(Output<'d>);

impl IndicatorSink for StatusLed<'_> {
    fn set_indicator(&mut self, on: bool) {
        self.0
            .set_level(if on { Level::High } else { Level::Low });
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    loop {
        let conn = match advertising::advertise(sd).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("advertise failed: {:?}", e);
                continue;
            }
        };

        info!("Connected");
        // Drop reports queued while nobody was listening.
        while ble::REPORT_QUEUE.try_receive().is_ok() {}
        ble::CONNECTION_EVENTS.send(ConnectionEvent::Connected).await;

        server::run_until_disconnect(&conn, server).await;

        info!("Disconnected");
        ble::CONNECTION_EVENTS
            .send(ConnectionEvent::Disconnected)
            .await;
    }
}

/// Light the auxiliary LED while the host asserts any keyboard LED bit
/// (Caps Lock, Num Lock, ...).
#[embassy_executor::task]
async fn host_led_task(mut led: Output<'static>) -> ! {
    loop {
        let bitmap = ble::KEYBOARD_LED.wait().await;
        led.set_level(if bitmap != 0 { Level::High } else { Level::Low });
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("blejoy starting");

    let mut hw_config = embassy_nrf::config::Config::default();
    // The SoftDevice owns the two highest interrupt priorities.
    hw_config.gpiote_interrupt_priority = Priority::P2;
    hw_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(hw_config);

    let sd = Softdevice::enable(&server::softdevice_config());

    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));
    unwrap!(server::init_defaults(server));

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble_task(sd, server)));
    unwrap!(spawner.spawn(host_led_task(Output::new(
        p.P0_12.degrade(),
        Level::Low,
        OutputDrive::Standard,
    ))));

    // Pins in keymap order; see config::KEYMAP.
    let mut lines = GpioLines::new([
        p.P0_11.degrade(),
        p.P0_02.degrade(),
        p.P0_03.degrade(),
        p.P0_04.degrade(),
        p.P0_05.degrade(),
        p.P0_28.degrade(),
        p.P0_29.degrade(),
        p.P0_07.degrade(),
        p.P0_15.degrade(),
        p.P0_16.degrade(),
        p.P0_31.degrade(),
        p.P0_30.degrade(),
    ]);

    // An inconsistent wiring table is fatal: refusing to start beats
    // scanning with an undefined line→keycode correspondence.
    let mut scanner = match InputScanner::new(&config::KEYMAP) {
        Ok(scanner) => scanner,
        Err(e) => defmt::panic!("invalid key table: {:?}", e),
    };

    let mut status_led = StatusLed(Output::new(
        p.P0_26.degrade(),
        Level::Low,
        OutputDrive::Standard,
    ));
    let mut indicator = ConnectionIndicator::new(config::BLINK_INTERVAL_MS);
    let mut sink = BleSink;

    loop {
        // Apply link transitions before this cycle's scan so the
        // indicator and the report path agree on the connection state.
        while let Ok(event) = ble::CONNECTION_EVENTS.try_receive() {
            match event {
                ConnectionEvent::Connected => indicator.on_connected(&mut status_led),
                ConnectionEvent::Disconnected => indicator.on_disconnected(&mut status_led),
            }
        }

        scanner.scan(&mut lines, &mut sink);
        indicator.poll(Instant::now().as_millis(), &mut status_led);

        Timer::after_millis(config::SCAN_POLL_MS).await;
    }
}
