/// Custom PCB: ESP32 with an Ebyte E19/E32 LoRa module.
///
/// | Function     | Signal | GPIO |
/// |--------------|--------|------|
/// | LED          | LED    | 2    |
/// | I2C/display  | SDA    | 26   |
/// |              | SCL    | 25   |
/// |              | RST    | 16   |
/// | UART/GPS     | TX     | 21   |
/// |              | RX     | 22   |
/// | SPI/LoRa     | MOSI   | 23   |
/// |              | MISO   | 19   |
/// |              | SCK    | 18   |
/// |              | NSS    | 5    |
/// |              | RST    | 15   |
/// |              | DIO0   | 27   |
/// |              | DIO1   | 35   |
/// |              | DIO2   | 34   |
/// |              | RXEN   | 32   |
/// |              | TXEN   | 33   |
///
/// The module has separate RX-enable and TX-enable lines, so the LMIC
/// `rxtx` pin is unused. Neither init phase needs board-specific work.
use crate::board::{validate_profile, BoardProfile};
#[cfg(feature = "serial")]
use crate::comm::{UartWiring, SERIAL_BAUD};
#[cfg(feature = "display")]
use crate::display::{DisplayController, DisplayWiring, TwoWireBus};
#[cfg(feature = "led")]
use crate::light::LightWiring;
use crate::mcu::{McuPins, ESP32};
#[cfg(any(feature = "led", feature = "mcci-lmic"))]
use crate::pins::ActiveLevel;
#[cfg(feature = "mcci-lmic")]
use crate::pins::RadioTuning;
use crate::pins::{BusId, Gpio, Pin, PinMap, RfSwitch, SpiPins};

pub struct EbyteEsp32Pcb;

impl BoardProfile for EbyteEsp32Pcb {
    const NAME: &'static str = "ebyte_esp32_pcb";
    const DEVICE_ID_DEFAULT: &'static str = "ebyte-esp32-pcb";
    const MCU: McuPins = ESP32;

    const PIN_MAP: PinMap = PinMap {
        nss: Gpio(5),
        rst: Pin::gpio(15),
        dio: [Pin::gpio(27), Pin::gpio(35), Pin::gpio(34)],
        rf_switch: RfSwitch::Split {
            rx_enable: Gpio(32),
            tx_enable: Gpio(33),
        },
        // VSPI
        spi: SpiPins {
            bus: BusId::spi(3),
            sck: Gpio(18),
            mosi: Gpio(23),
            miso: Gpio(19),
        },
        #[cfg(feature = "mcci-lmic")]
        tuning: RadioTuning {
            rxtx_rx_active: ActiveLevel::Low,
            rssi_cal: 10,
            spi_freq_hz: 8_000_000,
        },
    };

    #[cfg(feature = "led")]
    const LIGHT: LightWiring = LightWiring {
        pin: Gpio(2),
        active: ActiveLevel::High,
    };

    // Software I2C on the same pins also works.
    #[cfg(feature = "display")]
    const DISPLAY: DisplayWiring = DisplayWiring {
        controller: DisplayController::Ssd1306 {
            width: 128,
            height: 64,
        },
        bus: TwoWireBus::Hardware(BusId::i2c(0)),
        rst: Pin::gpio(16),
        scl: Gpio(25),
        sda: Gpio(26),
    };

    #[cfg(feature = "serial")]
    const UART: UartWiring = UartWiring {
        bus: BusId::uart(1),
        tx: Gpio(21),
        rx: Gpio(22),
        baud: SERIAL_BAUD,
    };
}

const _: () = validate_profile::<EbyteEsp32Pcb>();
