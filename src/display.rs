/// Character display on a monochrome OLED (SSD1306-class, I2C).
///
/// Text is laid out on a grid of 8x8 cells, the way u8x8-style drivers
/// address these panels: a 128x64 controller gives 16 columns by 8 rows.
/// The controller driver itself is external and plugs in through
/// [`DisplayDriver`].
use core::fmt;

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::pins::{BusId, Gpio, Pin};

/// Cell size in pixels
const CELL: u32 = 8;

/// Display controller and panel resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayController {
    Ssd1306 { width: u16, height: u16 },
}

impl DisplayController {
    pub const fn size(&self) -> (u16, u16) {
        match *self {
            DisplayController::Ssd1306 { width, height } => (width, height),
        }
    }
}

/// How the two-wire (I2C) bus is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoWireBus {
    /// MCU I2C peripheral
    Hardware(BusId),
    /// Bit-banged on plain GPIOs
    Software,
}

impl TwoWireBus {
    /// Bus shared with other devices, if any.
    pub const fn shared_bus(&self) -> Option<BusId> {
        match *self {
            TwoWireBus::Hardware(bus) => Some(bus),
            TwoWireBus::Software => None,
        }
    }
}

/// Display wiring for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWiring {
    pub controller: DisplayController,
    pub bus: TwoWireBus,
    pub rst: Pin,
    pub scl: Gpio,
    pub sda: Gpio,
}

/// Controller driver seam. The panel is drawn through `DrawTarget`;
/// `flush` pushes buffered pixels to the glass.
pub trait DisplayDriver: DrawTarget<Color = BinaryColor> {
    /// Send the controller's power-up sequence.
    fn power_on(&mut self) -> Result<(), Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Text-oriented display capability.
pub trait TextDisplay {
    type Error;

    fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    fn is_ready(&self) -> bool;

    fn columns(&self) -> u8;

    fn rows(&self) -> u8;

    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw `text` starting at a cell. Text past the last column is clipped.
    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), Self::Error>;

    fn clear_line(&mut self, row: u8) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// `init` has not succeeded yet.
    NotInitialized,
    /// Cell position outside the text grid.
    OutOfBounds,
    /// Driving the reset line failed.
    Reset,
    Driver(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotInitialized => f.write_str("display not initialized"),
            Error::OutOfBounds => f.write_str("text position out of bounds"),
            Error::Reset => f.write_str("display reset line failed"),
            Error::Driver(e) => write!(f, "display driver error: {:?}", e),
        }
    }
}

/// Bring-up state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Off,
    Ready,
    /// `init` was attempted and the controller did not respond.
    Failed,
}

/// [`TextDisplay`] over any [`DisplayDriver`].
pub struct CharDisplay<D, R> {
    driver: D,
    reset: R,
    wiring: DisplayWiring,
    state: DisplayState,
}

impl<D: DisplayDriver, R: OutputPin> CharDisplay<D, R> {
    pub fn new(driver: D, reset: R, wiring: DisplayWiring) -> Self {
        Self {
            driver,
            reset,
            wiring,
            state: DisplayState::Off,
        }
    }

    pub fn wiring(&self) -> &DisplayWiring {
        &self.wiring
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Access the underlying driver, e.g. for graphics beyond text.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn pulse_reset<Dl: DelayNs>(&mut self, delay: &mut Dl) -> Result<(), Error<D::Error>> {
        if !self.wiring.rst.is_used() {
            return Ok(());
        }
        self.reset.set_high().map_err(|_| Error::Reset)?;
        delay.delay_ms(1);
        self.reset.set_low().map_err(|_| Error::Reset)?;
        delay.delay_ms(10);
        self.reset.set_high().map_err(|_| Error::Reset)?;
        delay.delay_ms(10);
        Ok(())
    }

    fn power_up<Dl: DelayNs>(&mut self, delay: &mut Dl) -> Result<(), Error<D::Error>> {
        self.pulse_reset(delay)?;
        self.driver.power_on().map_err(Error::Driver)?;
        self.driver.clear(BinaryColor::Off).map_err(Error::Driver)?;
        self.driver.flush().map_err(Error::Driver)
    }

    fn ensure_ready(&self) -> Result<(), Error<D::Error>> {
        match self.state {
            DisplayState::Ready => Ok(()),
            DisplayState::Off | DisplayState::Failed => Err(Error::NotInitialized),
        }
    }

    fn cell_area(col: u8, row: u8, cells: u32) -> Rectangle {
        Rectangle::new(
            Point::new(col as i32 * CELL as i32, row as i32 * CELL as i32),
            Size::new(cells * CELL, CELL),
        )
    }
}

impl<D: DisplayDriver, R: OutputPin> TextDisplay for CharDisplay<D, R> {
    type Error = Error<D::Error>;

    fn init<Dl: DelayNs>(&mut self, delay: &mut Dl) -> Result<(), Self::Error> {
        match self.power_up(delay) {
            Ok(()) => {
                self.state = DisplayState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = DisplayState::Failed;
                Err(e)
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.state == DisplayState::Ready
    }

    fn columns(&self) -> u8 {
        (self.wiring.controller.size().0 as u32 / CELL) as u8
    }

    fn rows(&self) -> u8 {
        (self.wiring.controller.size().1 as u32 / CELL) as u8
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.ensure_ready()?;
        self.driver.clear(BinaryColor::Off).map_err(Error::Driver)?;
        self.driver.flush().map_err(Error::Driver)
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), Self::Error> {
        self.ensure_ready()?;
        if col >= self.columns() || row >= self.rows() {
            return Err(Error::OutOfBounds);
        }

        let room = (self.columns() - col) as usize;
        let count = text.chars().take(room).count() as u32;
        Self::cell_area(col, row, count)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.driver)
            .map_err(Error::Driver)?;

        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        let mut glyph = [0u8; 4];
        for (i, ch) in text.chars().take(room).enumerate() {
            let at = Point::new((col as i32 + i as i32) * CELL as i32, row as i32 * CELL as i32);
            Text::with_baseline(ch.encode_utf8(&mut glyph), at, style, Baseline::Top)
                .draw(&mut self.driver)
                .map_err(Error::Driver)?;
        }
        self.driver.flush().map_err(Error::Driver)
    }

    fn clear_line(&mut self, row: u8) -> Result<(), Self::Error> {
        self.ensure_ready()?;
        if row >= self.rows() {
            return Err(Error::OutOfBounds);
        }
        Self::cell_area(0, row, self.columns() as u32)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.driver)
            .map_err(Error::Driver)?;
        self.driver.flush().map_err(Error::Driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPanel, MockPin, NoDelay};

    const WIRING: DisplayWiring = DisplayWiring {
        controller: DisplayController::Ssd1306 { width: 128, height: 64 },
        bus: TwoWireBus::Hardware(BusId::i2c(0)),
        rst: Pin::gpio(16),
        scl: Gpio(25),
        sda: Gpio(26),
    };

    fn display() -> CharDisplay<MockPanel, MockPin> {
        CharDisplay::new(MockPanel::new(), MockPin::new(), WIRING)
    }

    #[test]
    fn grid_follows_controller_resolution() {
        let d = display();
        assert_eq!(d.columns(), 16);
        assert_eq!(d.rows(), 8);
    }

    #[test]
    fn drawing_before_init_rejected() {
        let mut d = display();
        assert_eq!(d.draw_text(0, 0, "x"), Err(Error::NotInitialized));
        assert_eq!(d.state(), DisplayState::Off);
    }

    #[test]
    fn init_pulses_reset_and_powers_on() {
        let mut d = display();
        d.init(&mut NoDelay).unwrap();
        assert!(d.is_ready());
        assert_eq!(d.reset.history(), &[true, false, true]);
        assert!(d.driver.powered);
        assert!(d.driver.flushes >= 1);
    }

    #[test]
    fn init_skips_reset_when_unwired() {
        let mut d = CharDisplay::new(
            MockPanel::new(),
            MockPin::new(),
            DisplayWiring {
                rst: Pin::Unused,
                ..WIRING
            },
        );
        d.init(&mut NoDelay).unwrap();
        assert!(d.reset.history().is_empty());
    }

    #[test]
    fn unresponsive_controller_marks_failed() {
        let mut d = CharDisplay::new(MockPanel::unresponsive(), MockPin::new(), WIRING);
        assert!(matches!(d.init(&mut NoDelay), Err(Error::Driver(_))));
        assert_eq!(d.state(), DisplayState::Failed);
        assert!(!d.is_ready());
    }

    #[test]
    fn text_lands_in_its_cells() {
        let mut d = display();
        d.init(&mut NoDelay).unwrap();
        d.draw_text(2, 1, "HI").unwrap();

        let inside = d.driver.lit_in(Rectangle::new(Point::new(16, 8), Size::new(16, 8)));
        assert!(inside > 0);
        assert_eq!(d.driver.lit_total(), inside);
    }

    #[test]
    fn text_clipped_at_last_column() {
        let mut d = display();
        d.init(&mut NoDelay).unwrap();
        d.draw_text(14, 0, "ABCDEF").unwrap();
        let inside = d.driver.lit_in(Rectangle::new(Point::new(112, 0), Size::new(16, 8)));
        assert_eq!(d.driver.lit_total(), inside);
    }

    #[test]
    fn out_of_bounds_position_rejected() {
        let mut d = display();
        d.init(&mut NoDelay).unwrap();
        assert_eq!(d.draw_text(16, 0, "x"), Err(Error::OutOfBounds));
        assert_eq!(d.draw_text(0, 8, "x"), Err(Error::OutOfBounds));
        assert_eq!(d.clear_line(8), Err(Error::OutOfBounds));
    }

    #[test]
    fn clear_line_erases_only_that_row() {
        let mut d = display();
        d.init(&mut NoDelay).unwrap();
        d.draw_text(0, 0, "TOP").unwrap();
        d.draw_text(0, 3, "ROW").unwrap();
        d.clear_line(3).unwrap();
        let top = d.driver.lit_in(Rectangle::new(Point::zero(), Size::new(128, 8)));
        assert!(top > 0);
        assert_eq!(d.driver.lit_total(), top);
    }

    #[test]
    fn overwriting_a_cell_replaces_the_glyph() {
        let mut d = display();
        d.init(&mut NoDelay).unwrap();
        d.draw_text(0, 0, "#").unwrap();
        let hash = d.driver.lit_total();
        d.draw_text(0, 0, ".").unwrap();
        assert!(d.driver.lit_total() < hash);
    }
}
