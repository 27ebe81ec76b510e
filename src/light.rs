/// Indicator light capability.
///
/// Callers switch the light on and off; whether "on" means driving the
/// pin high or low is decided once by the board wiring.
use embedded_hal::digital::OutputPin;

use crate::pins::{ActiveLevel, Gpio};

/// LED wiring for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightWiring {
    pub pin: Gpio,
    pub active: ActiveLevel,
}

/// A light that can be switched on and off.
pub trait IndicatorLight {
    type Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error>;

    fn is_on(&self) -> bool;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let next = !self.is_on();
        self.set(next)
    }
}

/// Single-colour LED on a GPIO.
///
/// Construction does not touch the pin; the board's `Hardware` phase
/// drives it to a known off state.
pub struct Led<P> {
    pin: P,
    wiring: LightWiring,
    on: bool,
}

impl<P: OutputPin> Led<P> {
    pub fn new(pin: P, wiring: LightWiring) -> Self {
        Self {
            pin,
            wiring,
            on: false,
        }
    }

    pub fn wiring(&self) -> &LightWiring {
        &self.wiring
    }
}

impl<P: OutputPin> IndicatorLight for Led<P> {
    type Error = P::Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        if self.wiring.active.drive_high(on) {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
