//! GATT server: HID-over-GATT boot keyboard + Device Information.
//!
//! The HID service exposes the boot keyboard input report (notify) for
//! outgoing key state and the boot keyboard output report for the
//! host-driven LED bitmap. The report map describes the same 8-byte
//! boot layout, so report-protocol hosts see identical traffic.

use crate::ble::{OutboundReport, KEYBOARD_LED, REPORT_QUEUE};
use crate::config;
use crate::hid::keyboard::{
    KeyboardReport, KEYBOARD_REPORT_MAP, KEYBOARD_REPORT_SIZE, REPORT_MAP_LEN,
};
use defmt::{debug, info};
use embassy_futures::select::{select, Either};
use heapless::String;
use nrf_softdevice::ble::{gatt_server, Connection};
use nrf_softdevice::raw;

/// HID Information characteristic value:
/// bcdHID 1.11 (little-endian), country code 0, flags = normally
/// connectable.
const HID_INFORMATION: [u8; 4] = [0x11, 0x01, 0x00, 0x02];

/// Protocol Mode: 1 = Report Protocol (the boot layout and the report
/// map agree, so either mode carries the same bytes).
const PROTOCOL_MODE_REPORT: u8 = 1;

#[nrf_softdevice::gatt_service(uuid = "180a")]
pub struct DeviceInformationService {
    #[characteristic(uuid = "2a29", read)]
    manufacturer_name: String<16>,
    #[characteristic(uuid = "2a24", read)]
    model_number: String<8>,
}

#[nrf_softdevice::gatt_service(uuid = "1812")]
pub struct HidService {
    #[characteristic(uuid = "2a4e", read, write_without_response)]
    protocol_mode: u8,
    #[characteristic(uuid = "2a4a", read)]
    hid_information: [u8; 4],
    #[characteristic(uuid = "2a4b", read)]
    report_map: [u8; REPORT_MAP_LEN],
    #[characteristic(uuid = "2a4c", write_without_response)]
    control_point: u8,
    #[characteristic(uuid = "2a22", read, notify)]
    boot_keyboard_input: [u8; KEYBOARD_REPORT_SIZE],
    #[characteristic(uuid = "2a32", read, write, write_without_response)]
    boot_keyboard_output: u8,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub dis: DeviceInformationService,
    pub hid: HidService,
}

/// SoftDevice enable parameters: one peripheral link, GAP device name
/// from `config`, RC low-frequency clock so no 32 kHz crystal is
/// required.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 128 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Populate the static characteristic values after registration.
pub fn init_defaults(server: &Server) -> Result<(), gatt_server::SetValueError> {
    server.hid.protocol_mode_set(&PROTOCOL_MODE_REPORT)?;
    server.hid.hid_information_set(&HID_INFORMATION)?;
    server.hid.report_map_set(&KEYBOARD_REPORT_MAP)?;

    server
        .dis
        .manufacturer_name_set(&fixed::<16>(config::BLE_MANUFACTURER))?;
    server
        .dis
        .model_number_set(&fixed::<8>(config::BLE_MODEL_NUMBER))?;
    Ok(())
}

/// Copy a str into a fixed-capacity string. The capacities above are
/// sized to fit the shipped identity strings exactly.
fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}

/// Serve one connection until the link drops.
///
/// Two concurrent jobs: the GATT event loop (output-report writes land
/// in [`KEYBOARD_LED`], CCCD writes are logged) and the report feed,
/// which drains [`REPORT_QUEUE`] into boot-input notifications. A
/// notification that fails (peer not yet subscribed, buffers full) is
/// dropped; key state is refreshed by the next scan cycle anyway.
pub async fn run_until_disconnect(conn: &Connection, server: &Server) {
    let gatt = gatt_server::run(conn, server, |event| match event {
        ServerEvent::Hid(e) => match e {
            HidServiceEvent::ProtocolModeWrite(mode) => {
                info!("protocol mode write: {}", mode);
            }
            HidServiceEvent::ControlPointWrite(cmd) => {
                debug!("control point write: {}", cmd);
            }
            HidServiceEvent::BootKeyboardInputCccdWrite { notifications } => {
                info!("input report notifications: {}", notifications);
            }
            HidServiceEvent::BootKeyboardOutputWrite(bitmap) => {
                KEYBOARD_LED.signal(bitmap);
            }
        },
        // The Device Information Service is read-only.
        _ => {}
    });

    let feed = async {
        loop {
            let out = REPORT_QUEUE.receive().await;
            let bytes = match out {
                OutboundReport::Keys(report) => report.to_bytes(),
                OutboundReport::Release => KeyboardReport::release().to_bytes(),
            };
            if server.hid.boot_keyboard_input_notify(conn, &bytes).is_err() {
                debug!("notify dropped");
            }
        }
    };

    match select(gatt, feed).await {
        Either::First(e) => info!("gatt server exited: {:?}", e),
        // The feed loop never returns.
        Either::Second(()) => {}
    }
}
