/// JSON messages the board emits on its diagnostic port.
///
/// All messages are newline-delimited JSON (NDJSON).
/// Uses fixed-size `heapless` buffers for no_std/no-alloc operation.
use heapless::Vec;
use serde::Serialize;

use crate::defaults::SerialWait;
use crate::pins::PinMap;

/// Radio wiring as reported, pins in LMIC numbering (255 = unused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinReport {
    pub nss: u8,
    pub rst: u8,
    pub dio: [u8; 3],
    pub rxen: u8,
    pub txen: u8,
}

impl From<&PinMap> for PinReport {
    fn from(map: &PinMap) -> Self {
        Self {
            nss: map.nss.number(),
            rst: map.rst.lmic_value(),
            dio: map.dio_lmic(),
            rxen: map.rx_enable().lmic_value(),
            txen: map.tx_enable().lmic_value(),
        }
    }
}

/// Which optional peripherals this image was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeripheralReport {
    pub led: bool,
    pub display: bool,
    pub serial: bool,
    pub gps: bool,
}

impl PeripheralReport {
    pub const fn compiled() -> Self {
        Self {
            led: cfg!(feature = "led"),
            display: cfg!(feature = "display"),
            serial: cfg!(feature = "serial"),
            gps: cfg!(feature = "gps"),
        }
    }
}

/// Messages sent from the board to a host terminal
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum DeviceMessage<'a> {
    /// Board summary, sent once after initialization
    #[serde(rename = "board")]
    Board {
        /// Board profile name
        board: &'static str,
        device_id: &'a str,
        /// Firmware version
        version: &'static str,
        /// MCU family
        mcu: &'static str,
        pins: PinReport,
        peripherals: PeripheralReport,
        /// Omitted when the runtime does not wait
        #[serde(skip_serializing_if = "Option::is_none")]
        wait_for_serial: Option<SerialWait>,
    },
}

/// Firmware version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum size of a serialized JSON message
pub const MAX_MSG_LEN: usize = 384;

/// Buffer type for serialized JSON messages
pub type MsgBuffer = Vec<u8, MAX_MSG_LEN>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::{BusId, Gpio, Pin, RfSwitch, SpiPins};

    fn map() -> PinMap {
        PinMap {
            nss: Gpio(18),
            rst: Pin::gpio(14),
            dio: [Pin::gpio(26), Pin::gpio(33), Pin::Unused],
            rf_switch: RfSwitch::None,
            spi: SpiPins {
                bus: BusId::spi(3),
                sck: Gpio(5),
                mosi: Gpio(27),
                miso: Gpio(19),
            },
            #[cfg(feature = "mcci-lmic")]
            tuning: crate::pins::RadioTuning {
                rxtx_rx_active: crate::pins::ActiveLevel::Low,
                rssi_cal: 0,
                spi_freq_hz: 1_000_000,
            },
        }
    }

    fn to_json(msg: &DeviceMessage) -> std::string::String {
        let mut buf = [0u8; MAX_MSG_LEN];
        let len = serde_json_core::to_slice(msg, &mut buf).unwrap();
        core::str::from_utf8(&buf[..len]).unwrap().into()
    }

    #[test]
    fn pin_report_uses_lmic_sentinel() {
        let report = PinReport::from(&map());
        assert_eq!(report.nss, 18);
        assert_eq!(report.dio, [26, 33, 255]);
        assert_eq!(report.rxen, 255);
        assert_eq!(report.txen, 255);
    }

    #[test]
    fn serialize_board_message() {
        let msg = DeviceMessage::Board {
            board: "test_board",
            device_id: "node-1",
            version: "0.1.0",
            mcu: "ESP32",
            pins: PinReport::from(&map()),
            peripherals: PeripheralReport {
                led: true,
                display: false,
                serial: true,
                gps: false,
            },
            wait_for_serial: None,
        };
        let json = to_json(&msg);
        assert!(json.starts_with(r#"{"type":"board""#));
        assert!(json.contains(r#""device_id":"node-1""#));
        assert!(json.contains(r#""dio":[26,33,255]"#));
        assert!(json.contains(r#""peripherals":{"led":true,"display":false,"serial":true,"gps":false}"#));
        assert!(!json.contains("wait_for_serial"));
    }

    #[test]
    fn serialize_wait_for_serial() {
        let msg = DeviceMessage::Board {
            board: "b",
            device_id: "d",
            version: VERSION,
            mcu: "ESP32",
            pins: PinReport::from(&map()),
            peripherals: PeripheralReport::compiled(),
            wait_for_serial: Some(SerialWait::Seconds(10)),
        };
        assert!(to_json(&msg).contains(r#""wait_for_serial":{"Seconds":10}"#));
    }

    #[test]
    fn compiled_report_matches_features() {
        let report = PeripheralReport::compiled();
        assert_eq!(report.led, cfg!(feature = "led"));
        assert_eq!(report.gps, cfg!(feature = "gps"));
    }

    // ── Version constant ────────────────────────────────────────────

    #[test]
    fn version_is_semver() {
        let parts: heapless::Vec<&str, 4> = VERSION.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "VERSION should be semver (major.minor.patch)"
        );
        for part in &parts {
            assert!(part.parse::<u32>().is_ok(), "'{part}' is not a number");
        }
    }
}
