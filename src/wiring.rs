/// Pin role table and wiring validation.
///
/// Every profile flattens its radio pins and peripheral wiring into a
/// [`WiringTable`]. Validation is a `const fn`, so a bad profile stops the
/// build instead of misbehaving on the bench.
use core::fmt;

use crate::mcu::McuPins;
use crate::pins::{BusId, Gpio, Pin, PinMap};

/// Upper bound on roles a single board can declare.
pub const MAX_ROLES: usize = 24;

/// What the MCU does with a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
    /// Open-drain or bus lines that are both driven and read (I2C).
    Bidirectional,
}

impl Direction {
    const fn drives(self) -> bool {
        !matches!(self, Direction::Input)
    }
}

/// Electrical function of a pin, used to decide whether two roles on a
/// shared bus are the same physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    ChipSelect,
    Reset,
    Interrupt,
    RfSwitch,
    Sck,
    Mosi,
    Miso,
    Scl,
    Sda,
    Tx,
    Rx,
    Indicator,
}

/// One named use of a GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRole {
    pub name: &'static str,
    pub gpio: Gpio,
    pub signal: Signal,
    pub direction: Direction,
    /// Bus the line belongs to. Only bus lines may be shared, and only
    /// between roles on the same bus carrying the same signal.
    pub bus: Option<BusId>,
}

impl PinRole {
    pub const fn new(name: &'static str, gpio: Gpio, signal: Signal, direction: Direction) -> Self {
        Self {
            name,
            gpio,
            signal,
            direction,
            bus: None,
        }
    }

    pub const fn on_bus(mut self, bus: BusId) -> Self {
        self.bus = Some(bus);
        self
    }

    const fn may_share_with(&self, other: &PinRole) -> bool {
        match (self.bus, other.bus) {
            (Some(a), Some(b)) => a.same(b) && self.signal as u8 == other.signal as u8,
            _ => false,
        }
    }
}

/// Wiring defects, detected at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringError {
    /// The GPIO does not exist on the MCU.
    NotPresent { role: &'static str, gpio: Gpio },
    /// The GPIO is used by the MCU itself (e.g. flash).
    Reserved { role: &'static str, gpio: Gpio },
    /// An output role was placed on an input-only GPIO.
    InputOnly { role: &'static str, gpio: Gpio },
    /// Two roles claim the same GPIO without sharing a bus line.
    Alias {
        first: &'static str,
        second: &'static str,
        gpio: Gpio,
    },
    /// More roles than [`MAX_ROLES`].
    TooManyRoles,
}

impl WiringError {
    /// Static summary, usable in const panics.
    pub const fn message(&self) -> &'static str {
        match self {
            WiringError::NotPresent { .. } => "pin role uses a GPIO the MCU does not have",
            WiringError::Reserved { .. } => "pin role uses a GPIO reserved by the MCU",
            WiringError::InputOnly { .. } => "output pin role placed on an input-only GPIO",
            WiringError::Alias { .. } => "two pin roles alias the same GPIO",
            WiringError::TooManyRoles => "board declares too many pin roles",
        }
    }
}

impl fmt::Display for WiringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiringError::NotPresent { role, gpio }
            | WiringError::Reserved { role, gpio }
            | WiringError::InputOnly { role, gpio } => {
                write!(f, "{}: {} ({})", self.message(), role, gpio)
            }
            WiringError::Alias { first, second, gpio } => {
                write!(f, "{}: {} and {} on {}", self.message(), first, second, gpio)
            }
            WiringError::TooManyRoles => f.write_str(self.message()),
        }
    }
}

/// Fixed-capacity list of pin roles, buildable in const context.
#[derive(Debug, Clone, Copy)]
pub struct WiringTable {
    roles: [Option<PinRole>; MAX_ROLES],
    len: usize,
    overflowed: bool,
}

impl WiringTable {
    pub const fn new() -> Self {
        Self {
            roles: [None; MAX_ROLES],
            len: 0,
            overflowed: false,
        }
    }

    pub const fn with(mut self, role: PinRole) -> Self {
        if self.len < MAX_ROLES {
            self.roles[self.len] = Some(role);
            self.len += 1;
        } else {
            self.overflowed = true;
        }
        self
    }

    /// Adds the role if the pin is connected; unused pins are skipped.
    pub const fn with_pin(self, name: &'static str, pin: Pin, signal: Signal, direction: Direction) -> Self {
        match pin {
            Pin::Gpio(gpio) => self.with(PinRole::new(name, gpio, signal, direction)),
            Pin::Unused => self,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinRole> {
        self.roles[..self.len].iter().flatten()
    }

    /// Role using `gpio`, first match wins.
    pub fn find(&self, gpio: Gpio) -> Option<&PinRole> {
        self.iter().find(|role| role.gpio == gpio)
    }

    /// Check every role against the MCU and against every other role.
    pub const fn validate(&self, mcu: &McuPins) -> Result<(), WiringError> {
        if self.overflowed {
            return Err(WiringError::TooManyRoles);
        }

        let mut i = 0;
        while i < self.len {
            if let Some(role) = self.roles[i] {
                if !mcu.is_present(role.gpio) {
                    return Err(WiringError::NotPresent {
                        role: role.name,
                        gpio: role.gpio,
                    });
                }
                if mcu.is_reserved(role.gpio) {
                    return Err(WiringError::Reserved {
                        role: role.name,
                        gpio: role.gpio,
                    });
                }
                if role.direction.drives() && !mcu.is_output_capable(role.gpio) {
                    return Err(WiringError::InputOnly {
                        role: role.name,
                        gpio: role.gpio,
                    });
                }

                let mut j = i + 1;
                while j < self.len {
                    if let Some(other) = self.roles[j] {
                        if other.gpio.0 == role.gpio.0 && !role.may_share_with(&other) {
                            return Err(WiringError::Alias {
                                first: role.name,
                                second: other.name,
                                gpio: role.gpio,
                            });
                        }
                    }
                    j += 1;
                }
            }
            i += 1;
        }
        Ok(())
    }
}

impl Default for WiringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PinMap {
    /// Radio roles, unused lines omitted.
    pub const fn roles(&self, table: WiringTable) -> WiringTable {
        let [dio0, dio1, dio2] = self.dio;
        table
            .with(PinRole::new("radio.nss", self.nss, Signal::ChipSelect, Direction::Output))
            .with_pin("radio.rst", self.rst, Signal::Reset, Direction::Output)
            .with_pin("radio.dio0", dio0, Signal::Interrupt, Direction::Input)
            .with_pin("radio.dio1", dio1, Signal::Interrupt, Direction::Input)
            .with_pin("radio.dio2", dio2, Signal::Interrupt, Direction::Input)
            .with_pin("radio.rxtx", self.rf_switch.rxtx(), Signal::RfSwitch, Direction::Output)
            .with_pin("radio.rxen", self.rf_switch.rx_enable(), Signal::RfSwitch, Direction::Output)
            .with_pin("radio.txen", self.rf_switch.tx_enable(), Signal::RfSwitch, Direction::Output)
            .with(PinRole::new("spi.sck", self.spi.sck, Signal::Sck, Direction::Output).on_bus(self.spi.bus))
            .with(PinRole::new("spi.mosi", self.spi.mosi, Signal::Mosi, Direction::Output).on_bus(self.spi.bus))
            .with(PinRole::new("spi.miso", self.spi.miso, Signal::Miso, Direction::Input).on_bus(self.spi.bus))
    }
}

#[cfg(feature = "led")]
impl crate::light::LightWiring {
    pub const fn roles(&self, table: WiringTable) -> WiringTable {
        table.with(PinRole::new("light", self.pin, Signal::Indicator, Direction::Output))
    }
}

#[cfg(feature = "display")]
impl crate::display::DisplayWiring {
    /// Reset line plus the two-wire bus, tagged with the bus if it is a
    /// hardware peripheral that other devices may share.
    pub const fn roles(&self, table: WiringTable) -> WiringTable {
        let mut scl = PinRole::new("display.scl", self.scl, Signal::Scl, Direction::Bidirectional);
        let mut sda = PinRole::new("display.sda", self.sda, Signal::Sda, Direction::Bidirectional);
        if let Some(bus) = self.bus.shared_bus() {
            scl = scl.on_bus(bus);
            sda = sda.on_bus(bus);
        }
        table
            .with_pin("display.rst", self.rst, Signal::Reset, Direction::Output)
            .with(scl)
            .with(sda)
    }
}

#[cfg(feature = "serial")]
impl crate::comm::UartWiring {
    pub const fn roles(&self, table: WiringTable) -> WiringTable {
        let table = table
            .with(PinRole::new("serial.tx", self.tx, Signal::Tx, Direction::Output).on_bus(self.bus))
            .with(PinRole::new("serial.rx", self.rx, Signal::Rx, Direction::Input).on_bus(self.bus));
        // The GPS receiver listens on the diagnostic UART's RX line.
        #[cfg(feature = "gps")]
        let table = table.with(PinRole::new("gps.rx", self.rx, Signal::Rx, Direction::Input).on_bus(self.bus));
        table
    }
}
