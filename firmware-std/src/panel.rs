//! SSD1306 128x64 OLED on the ESP-IDF I2C driver.
//!
//! Wraps the `ssd1306` buffered-graphics driver so the board library can
//! use it as its display controller.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use esp_idf_svc::hal::i2c::I2cDriver;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use lmic_node_bsp::display::DisplayDriver;

type Inner = Ssd1306<
    I2CInterface<I2cDriver<'static>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

pub struct Panel(Inner);

impl Panel {
    /// Does not talk to the controller; `power_on` does.
    pub fn new(i2c: I2cDriver<'static>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        Self(
            Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode(),
        )
    }
}

impl OriginDimensions for Panel {
    fn size(&self) -> Size {
        OriginDimensions::size(&self.0)
    }
}

impl DrawTarget for Panel {
    type Color = BinaryColor;
    type Error = <Inner as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.0.draw_iter(pixels)
    }
}

impl DisplayDriver for Panel {
    fn power_on(&mut self) -> Result<(), Self::Error> {
        self.0.init()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}
