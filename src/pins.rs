/// Pin assignment types and the radio pin map.
///
/// A [`PinMap`] is a compile-time constant describing how the LoRa
/// transceiver is wired to the MCU. The radio driver reads it once during
/// its own initialization; nothing ever mutates it.
use core::fmt;

/// A GPIO number on the target MCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gpio(pub u8);

impl Gpio {
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Gpio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// A pin role that may be left unconnected on a given board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    Gpio(Gpio),
    Unused,
}

impl Pin {
    /// Value LMIC-family radio drivers use for an unconnected pin.
    pub const LMIC_UNUSED: u8 = 0xFF;

    pub const fn gpio(number: u8) -> Self {
        Pin::Gpio(Gpio(number))
    }

    pub const fn is_used(self) -> bool {
        matches!(self, Pin::Gpio(_))
    }

    pub const fn as_gpio(self) -> Option<Gpio> {
        match self {
            Pin::Gpio(gpio) => Some(gpio),
            Pin::Unused => None,
        }
    }

    /// Pin number as the radio driver expects it (`0xFF` when unused).
    pub const fn lmic_value(self) -> u8 {
        match self {
            Pin::Gpio(Gpio(n)) => n,
            Pin::Unused => Self::LMIC_UNUSED,
        }
    }
}

impl From<Gpio> for Pin {
    fn from(gpio: Gpio) -> Self {
        Pin::Gpio(gpio)
    }
}

/// Electrical level at which a line is considered "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    Low,
    High,
}

impl ActiveLevel {
    /// Whether the line must be driven high to reach `on`.
    pub const fn drive_high(self, on: bool) -> bool {
        match self {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        }
    }
}

/// Peripheral bus families a pin can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    Spi,
    I2c,
    Uart,
}

/// One hardware bus instance, e.g. SPI3 or UART1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusId {
    pub kind: BusKind,
    pub index: u8,
}

impl BusId {
    pub const fn spi(index: u8) -> Self {
        Self { kind: BusKind::Spi, index }
    }

    pub const fn i2c(index: u8) -> Self {
        Self { kind: BusKind::I2c, index }
    }

    pub const fn uart(index: u8) -> Self {
        Self { kind: BusKind::Uart, index }
    }

    /// Const-context equality.
    pub const fn same(self, other: BusId) -> bool {
        self.kind as u8 == other.kind as u8 && self.index == other.index
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            BusKind::Spi => "SPI",
            BusKind::I2c => "I2C",
            BusKind::Uart => "UART",
        };
        write!(f, "{}{}", kind, self.index)
    }
}

/// SPI bus carrying the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiPins {
    pub bus: BusId,
    pub sck: Gpio,
    pub mosi: Gpio,
    pub miso: Gpio,
}

/// External RF front-end switch control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfSwitch {
    /// The module switches its antenna internally.
    None,
    /// One line selects RX or TX; its RX level lives in the radio tuning.
    Combined(Gpio),
    /// Dedicated RX-enable and TX-enable lines.
    Split { rx_enable: Gpio, tx_enable: Gpio },
}

impl RfSwitch {
    pub const fn rx_enable(self) -> Pin {
        match self {
            RfSwitch::Split { rx_enable, .. } => Pin::Gpio(rx_enable),
            RfSwitch::Combined(_) | RfSwitch::None => Pin::Unused,
        }
    }

    pub const fn tx_enable(self) -> Pin {
        match self {
            RfSwitch::Split { tx_enable, .. } => Pin::Gpio(tx_enable),
            RfSwitch::Combined(_) | RfSwitch::None => Pin::Unused,
        }
    }

    /// The single RX/TX line (`rxtx` in LMIC terms).
    pub const fn rxtx(self) -> Pin {
        match self {
            RfSwitch::Combined(pin) => Pin::Gpio(pin),
            RfSwitch::Split { .. } | RfSwitch::None => Pin::Unused,
        }
    }
}

/// Driver tuning values required by the MCCI LMIC radio driver.
#[cfg(feature = "mcci-lmic")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioTuning {
    /// Level of the combined RX/TX line while receiving.
    pub rxtx_rx_active: ActiveLevel,
    /// RSSI calibration offset in dB.
    pub rssi_cal: i8,
    /// SPI clock for the transceiver.
    pub spi_freq_hz: u32,
}

/// Radio transceiver wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Chip select
    pub nss: Gpio,
    /// Reset line
    pub rst: Pin,
    /// DIO0, DIO1, DIO2 interrupt lines
    pub dio: [Pin; 3],
    pub rf_switch: RfSwitch,
    pub spi: SpiPins,
    #[cfg(feature = "mcci-lmic")]
    pub tuning: RadioTuning,
}

impl PinMap {
    pub const fn rx_enable(&self) -> Pin {
        self.rf_switch.rx_enable()
    }

    pub const fn tx_enable(&self) -> Pin {
        self.rf_switch.tx_enable()
    }

    /// DIO numbers in driver order, `0xFF` for unconnected lines.
    pub const fn dio_lmic(&self) -> [u8; 3] {
        [
            self.dio[0].lmic_value(),
            self.dio[1].lmic_value(),
            self.dio[2].lmic_value(),
        ]
    }
}
