//! Host-side stand-ins for board hardware, used by unit tests.

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};

use crate::board::BoardProfile;
use crate::mcu::{McuPins, ESP32};
use crate::peripherals::{Parts, Platform};
use crate::pins::{BusId, Gpio, Pin, PinMap, RfSwitch, SpiPins};

// ── GPIO ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin that records every level written to it.
#[derive(Debug, Default)]
pub struct MockPin {
    history: Vec<bool>,
    failing: bool,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level written, `None` if never driven.
    pub fn level(&self) -> Option<bool> {
        self.history.last().copied()
    }

    pub fn writes(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }

    /// Make every later write fail.
    pub fn fail_writes(&mut self) {
        self.failing = true;
    }

    fn write(&mut self, high: bool) -> Result<(), PinFault> {
        if self.failing {
            return Err(PinFault);
        }
        self.history.push(high);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.write(true)
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ── UART ─────────────────────────────────────────────────────────────

#[cfg(feature = "serial")]
pub use uart::MockUart;

#[cfg(feature = "serial")]
mod uart {
    use core::convert::Infallible;
    use std::vec::Vec;

    /// Loopback-free UART: reads from canned input, records writes.
    #[derive(Debug, Default)]
    pub struct MockUart {
        input: Vec<u8>,
        read_pos: usize,
        sent: Vec<u8>,
    }

    impl MockUart {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_input(bytes: &[u8]) -> Self {
            Self {
                input: bytes.to_vec(),
                ..Self::default()
            }
        }

        pub fn sent(&self) -> &[u8] {
            &self.sent
        }
    }

    impl embedded_io::ErrorType for MockUart {
        type Error = Infallible;
    }

    impl embedded_io::Read for MockUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            let rest = &self.input[self.read_pos..];
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            self.read_pos += n;
            Ok(n)
        }
    }

    impl embedded_io::Write for MockUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            self.sent.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }
}

// ── Display panel ────────────────────────────────────────────────────

#[cfg(feature = "display")]
pub use panel::MockPanel;

#[cfg(feature = "display")]
mod panel {
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PointsIter, Rectangle};

    use crate::display::DisplayDriver;

    const WIDTH: usize = 128;
    const HEIGHT: usize = 64;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PanelFault;

    /// 128x64 monochrome framebuffer.
    pub struct MockPanel {
        pixels: [[bool; WIDTH]; HEIGHT],
        pub powered: bool,
        pub flushes: u32,
        responsive: bool,
    }

    impl MockPanel {
        pub fn new() -> Self {
            Self {
                pixels: [[false; WIDTH]; HEIGHT],
                powered: false,
                flushes: 0,
                responsive: true,
            }
        }

        /// A panel that never acknowledges the controller.
        pub fn unresponsive() -> Self {
            Self {
                responsive: false,
                ..Self::new()
            }
        }

        /// Lit pixels inside `area`.
        pub fn lit_in(&self, area: Rectangle) -> usize {
            area.points().filter(|p| self.lit(*p)).count()
        }

        pub fn lit_total(&self) -> usize {
            self.pixels.iter().flatten().filter(|&&on| on).count()
        }

        fn lit(&self, p: Point) -> bool {
            usize::try_from(p.x)
                .ok()
                .zip(usize::try_from(p.y).ok())
                .filter(|&(x, y)| x < WIDTH && y < HEIGHT)
                .is_some_and(|(x, y)| self.pixels[y][x])
        }
    }

    impl OriginDimensions for MockPanel {
        fn size(&self) -> Size {
            Size::new(WIDTH as u32, HEIGHT as u32)
        }
    }

    impl DrawTarget for MockPanel {
        type Color = BinaryColor;
        type Error = PanelFault;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            if !self.responsive {
                return Err(PanelFault);
            }
            for Pixel(point, color) in pixels {
                if (0..WIDTH as i32).contains(&point.x) && (0..HEIGHT as i32).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl DisplayDriver for MockPanel {
        fn power_on(&mut self) -> Result<(), PanelFault> {
            if !self.responsive {
                return Err(PanelFault);
            }
            self.powered = true;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), PanelFault> {
            if !self.responsive {
                return Err(PanelFault);
            }
            self.flushes += 1;
            Ok(())
        }
    }
}

// ── Platform and profile ─────────────────────────────────────────────

/// Platform made of the mocks above.
pub struct TestPlatform;

impl Platform for TestPlatform {
    type Delay = NoDelay;
    #[cfg(feature = "led")]
    type LightPin = MockPin;
    #[cfg(feature = "display")]
    type Display = MockPanel;
    #[cfg(feature = "display")]
    type DisplayReset = MockPin;
    #[cfg(feature = "serial")]
    type Uart = MockUart;
}

pub fn parts() -> Parts<TestPlatform> {
    Parts {
        delay: NoDelay,
        #[cfg(feature = "led")]
        light_pin: MockPin::new(),
        #[cfg(feature = "display")]
        display: MockPanel::new(),
        #[cfg(feature = "display")]
        display_reset: MockPin::new(),
        #[cfg(feature = "serial")]
        uart: MockUart::new(),
    }
}

/// Minimal valid profile on an ESP32: an SX1276 on VSPI, no RF switch.
pub struct TestBoard;

impl BoardProfile for TestBoard {
    const NAME: &'static str = "test_board";
    const DEVICE_ID_DEFAULT: &'static str = "test-node";
    const MCU: McuPins = ESP32;
    const PIN_MAP: PinMap = PinMap {
        nss: Gpio(18),
        rst: Pin::gpio(14),
        dio: [Pin::gpio(26), Pin::gpio(35), Pin::Unused],
        rf_switch: RfSwitch::None,
        spi: SpiPins {
            bus: BusId::spi(3),
            sck: Gpio(5),
            mosi: Gpio(27),
            miso: Gpio(19),
        },
        #[cfg(feature = "mcci-lmic")]
        tuning: crate::pins::RadioTuning {
            rxtx_rx_active: crate::pins::ActiveLevel::High,
            rssi_cal: 0,
            spi_freq_hz: 1_000_000,
        },
    };
    #[cfg(feature = "led")]
    const LIGHT: crate::light::LightWiring = crate::light::LightWiring {
        pin: Gpio(25),
        active: crate::pins::ActiveLevel::Low,
    };
    #[cfg(feature = "display")]
    const DISPLAY: crate::display::DisplayWiring = crate::display::DisplayWiring {
        controller: crate::display::DisplayController::Ssd1306 {
            width: 128,
            height: 64,
        },
        bus: crate::display::TwoWireBus::Hardware(BusId::i2c(0)),
        rst: Pin::gpio(16),
        scl: Gpio(15),
        sda: Gpio(4),
    };
    #[cfg(feature = "serial")]
    const UART: crate::comm::UartWiring = crate::comm::UartWiring {
        bus: BusId::uart(0),
        tx: Gpio(1),
        rx: Gpio(3),
        baud: crate::comm::SERIAL_BAUD,
    };
}
