/// Optional peripherals and the platform seam that supplies them.
///
/// A [`Platform`] names the concrete HAL types: pins, panel driver and
/// UART. Each associated type exists only when its feature is enabled,
/// so a build without `display` has no display type to name.
use embedded_hal::delay::DelayNs;
#[cfg(any(feature = "led", feature = "display"))]
use embedded_hal::digital::OutputPin;

use crate::board::BoardProfile;
#[cfg(feature = "serial")]
use crate::comm::SerialPort;
#[cfg(feature = "display")]
use crate::display::{CharDisplay, DisplayDriver};
#[cfg(feature = "gps")]
use crate::gps::GpsReceiver;
#[cfg(feature = "led")]
use crate::light::Led;

pub trait Platform {
    type Delay: DelayNs;
    #[cfg(feature = "led")]
    type LightPin: OutputPin;
    #[cfg(feature = "display")]
    type Display: DisplayDriver;
    #[cfg(feature = "display")]
    type DisplayReset: OutputPin;
    #[cfg(feature = "serial")]
    type Uart: embedded_io::Read + embedded_io::Write;
}

/// Raw HAL handles, moved into a board at construction.
pub struct Parts<P: Platform> {
    pub delay: P::Delay,
    #[cfg(feature = "led")]
    pub light_pin: P::LightPin,
    #[cfg(feature = "display")]
    pub display: P::Display,
    /// Drive an unconnected dummy pin when the panel has no reset line.
    #[cfg(feature = "display")]
    pub display_reset: P::DisplayReset,
    #[cfg(feature = "serial")]
    pub uart: P::Uart,
}

/// Peripheral handles owned by a board.
pub struct Peripherals<P: Platform> {
    pub delay: P::Delay,
    #[cfg(feature = "led")]
    pub light: Led<P::LightPin>,
    #[cfg(feature = "display")]
    pub display: CharDisplay<P::Display, P::DisplayReset>,
    #[cfg(feature = "serial")]
    pub serial: SerialPort<P::Uart>,
    #[cfg(feature = "gps")]
    pub gps: GpsReceiver,
}

impl<P: Platform> Peripherals<P> {
    /// Wrap raw parts with the wiring of profile `B`. No pin is touched.
    pub fn new<B: BoardProfile>(parts: Parts<P>) -> Self {
        Self {
            delay: parts.delay,
            #[cfg(feature = "led")]
            light: Led::new(parts.light_pin, B::LIGHT),
            #[cfg(feature = "display")]
            display: CharDisplay::new(parts.display, parts.display_reset, B::DISPLAY),
            #[cfg(feature = "serial")]
            serial: SerialPort::new(parts.uart, B::UART),
            #[cfg(feature = "gps")]
            gps: GpsReceiver::new(),
        }
    }
}
