//! Connectable advertising as a HID keyboard.
//!
//! Mirrors the cadence of typical battery HID devices: a 30 s burst at
//! a 20 ms interval so a host picks us up quickly after power-on or
//! link loss, then 152.5 ms indefinitely to save the battery.
//! Advertising restarts from the fast phase after every disconnect.

use crate::config;
use defmt::info;
use nrf_softdevice::ble::peripheral::{self, AdvertiseError, ConnectableAdvertisement};
use nrf_softdevice::ble::{Connection, TxPower};
use nrf_softdevice::{raw, Softdevice};

/// Advertising payload: flags, HID service UUID (0x1812), appearance
/// (HID keyboard, 0x03C1), complete local name.
///
/// The name bytes must match `config::BLE_DEVICE_NAME`.
#[rustfmt::skip]
const ADV_DATA: &[u8] = &[
    0x02, 0x01, raw::BLE_GAP_ADV_FLAGS_LE_ONLY_GENERAL_DISC_MODE as u8,
    0x03, 0x03, 0x12, 0x18,
    0x03, 0x19, 0xC1, 0x03,
    0x0D, 0x09, b'B', b'L', b'E', b' ', b'J', b'o', b'y', b's', b't', b'i', b'c', b'k',
];

/// Scan response: everything already fits in the advertising packet.
const SCAN_DATA: &[u8] = &[];

/// Advertise until a central connects.
///
/// Runs the fast phase first; on timeout, falls through to the slow
/// phase with no deadline. TX power is fixed at +4 dBm, the strongest
/// the nRF52840 radio offers.
pub async fn advertise(sd: &Softdevice) -> Result<Connection, AdvertiseError> {
    let fast = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL_FAST,
        timeout: Some((config::BLE_ADV_FAST_TIMEOUT_SECS * 100) as u16), // 10 ms units
        tx_power: TxPower::Plus4dBm,
        ..Default::default()
    };

    info!("advertising (fast, {} s window)", config::BLE_ADV_FAST_TIMEOUT_SECS);
    match peripheral::advertise_connectable(sd, advertisement(), &fast).await {
        Ok(conn) => return Ok(conn),
        Err(AdvertiseError::Timeout) => {}
        Err(e) => return Err(e),
    }

    let slow = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL_SLOW,
        timeout: None,
        tx_power: TxPower::Plus4dBm,
        ..Default::default()
    };

    info!("advertising (slow, no deadline)");
    peripheral::advertise_connectable(sd, advertisement(), &slow).await
}

fn advertisement() -> ConnectableAdvertisement<'static> {
    ConnectableAdvertisement::ScannableUndirected {
        adv_data: ADV_DATA,
        scan_data: SCAN_DATA,
    }
}
