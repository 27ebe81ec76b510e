/// Board profiles and the board context the node runtime drives.
///
/// A [`BoardProfile`] is pure compile-time data: MCU, radio pin map and
/// the wiring of each enabled peripheral. [`Board`] combines a profile
/// with live peripheral handles and runs the two init phases in order.
use core::marker::PhantomData;

use crate::defaults::{self, SerialWait};
#[cfg(feature = "display")]
use crate::display::{self, CharDisplay, DisplayState, DisplayWiring, TextDisplay};
#[cfg(feature = "gps")]
use crate::gps::{GpsReceiver, Sentence};
use crate::init::{BoardState, InitError, InitPhase, Lifecycle};
#[cfg(any(feature = "led", feature = "display", feature = "serial"))]
use crate::init::{Fault, PeripheralKind};
#[cfg(feature = "led")]
use crate::light::{IndicatorLight, Led, LightWiring};
use crate::mcu::McuPins;
use crate::peripherals::{Parts, Peripherals, Platform};
use crate::pins::PinMap;
use crate::protocol::{DeviceMessage, PeripheralReport, PinReport, VERSION};
use crate::wiring::WiringTable;
#[cfg(feature = "serial")]
use crate::comm::{SerialError, SerialPort, UartWiring};

/// Static description of one board variant.
pub trait BoardProfile {
    /// Short board name, e.g. for the boot banner.
    const NAME: &'static str;
    /// Device id used unless `NODE_DEVICEID` is set at build time.
    const DEVICE_ID_DEFAULT: &'static str;
    const MCU: McuPins;
    const PIN_MAP: PinMap;
    #[cfg(feature = "led")]
    const LIGHT: LightWiring;
    #[cfg(feature = "display")]
    const DISPLAY: DisplayWiring;
    #[cfg(feature = "serial")]
    const UART: UartWiring;
    /// Runtime wait for a serial host, unless overridden at build time.
    const WAIT_FOR_SERIAL: Option<SerialWait> = None;

    /// Board-specific work at the start of setup. Serial and display are
    /// not up yet.
    fn hardware_init<P: Platform>(_peripherals: &mut Peripherals<P>) -> Result<(), InitError> {
        Ok(())
    }

    /// Board-specific work once the runtime has brought up serial and
    /// display.
    fn post_serial_init<P: Platform>(_peripherals: &mut Peripherals<P>) -> Result<(), InitError> {
        Ok(())
    }
}

/// Every pin role the profile declares, for the enabled features.
pub const fn wiring_table<B: BoardProfile>() -> WiringTable {
    let table = B::PIN_MAP.roles(WiringTable::new());
    #[cfg(feature = "led")]
    let table = B::LIGHT.roles(table);
    #[cfg(feature = "display")]
    let table = B::DISPLAY.roles(table);
    #[cfg(feature = "serial")]
    let table = B::UART.roles(table);
    table
}

/// Fail const evaluation if the profile's wiring is invalid.
pub const fn validate_profile<B: BoardProfile>() {
    if let Err(e) = wiring_table::<B>().validate(&B::MCU) {
        panic!("{}", e.message());
    }
}

/// Board context: profile `B` bound to platform `P`.
pub struct Board<B: BoardProfile, P: Platform> {
    peripherals: Peripherals<P>,
    lifecycle: Lifecycle,
    profile: PhantomData<B>,
}

impl<B: BoardProfile, P: Platform> Board<B, P> {
    pub fn new(parts: Parts<P>) -> Self {
        const { validate_profile::<B>() };
        Self {
            peripherals: Peripherals::new::<B>(parts),
            lifecycle: Lifecycle::new(),
            profile: PhantomData,
        }
    }

    /// Run one init phase. Phases must come in order, each exactly once;
    /// any error means boot must not continue.
    pub fn init(&mut self, phase: InitPhase) -> Result<(), InitError> {
        self.lifecycle.check(phase)?;

        let result = match phase {
            InitPhase::Hardware => self.hardware_phase(),
            InitPhase::PostInitSerial => self.post_serial_phase(),
        };
        if let Err(e) = result {
            self.lifecycle.fault();
            log::error!("{} init failed on {}: {}", phase, B::NAME, e);
            return Err(e);
        }

        let state = self.lifecycle.complete(phase)?;
        log::debug!("{} init done, state {:?}", phase, state);
        if state == BoardState::Ready {
            log::info!("{} ready as {}", B::NAME, self.device_id());
        }
        Ok(())
    }

    fn hardware_phase(&mut self) -> Result<(), InitError> {
        #[cfg(feature = "led")]
        {
            self.peripherals
                .light
                .off()
                .map_err(|e| {
                    log::debug!("Light pin write failed: {:?}", e);
                    InitError::peripheral(PeripheralKind::Light, Fault::Gpio)
                })?;
        }
        B::hardware_init(&mut self.peripherals)
    }

    fn post_serial_phase(&mut self) -> Result<(), InitError> {
        #[cfg(feature = "serial")]
        {
            if !self.peripherals.serial.is_open() {
                return Err(InitError::peripheral(PeripheralKind::Serial, Fault::NotStarted));
            }
        }
        #[cfg(feature = "display")]
        {
            match self.peripherals.display.state() {
                DisplayState::Ready => {}
                DisplayState::Off => {
                    return Err(InitError::peripheral(PeripheralKind::Display, Fault::NotStarted))
                }
                DisplayState::Failed => {
                    return Err(InitError::peripheral(PeripheralKind::Display, Fault::NotResponding))
                }
            }
        }
        B::post_serial_init(&mut self.peripherals)
    }

    pub fn state(&self) -> BoardState {
        self.lifecycle.state()
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn name(&self) -> &'static str {
        B::NAME
    }

    pub fn pin_map(&self) -> PinMap {
        B::PIN_MAP
    }

    pub fn device_id(&self) -> &'static str {
        defaults::device_id(B::DEVICE_ID_DEFAULT)
    }

    pub fn wait_for_serial(&self) -> Option<SerialWait> {
        defaults::wait_for_serial(B::WAIT_FOR_SERIAL)
    }

    /// Summary of this board for the diagnostic port.
    pub fn report(&self) -> DeviceMessage<'static> {
        DeviceMessage::Board {
            board: B::NAME,
            device_id: self.device_id(),
            version: VERSION,
            mcu: B::MCU.name,
            pins: PinReport::from(&B::PIN_MAP),
            peripherals: PeripheralReport::compiled(),
            wait_for_serial: self.wait_for_serial(),
        }
    }

    pub fn delay_mut(&mut self) -> &mut P::Delay {
        &mut self.peripherals.delay
    }

    #[cfg(feature = "led")]
    pub fn light_mut(&mut self) -> &mut Led<P::LightPin> {
        &mut self.peripherals.light
    }

    #[cfg(feature = "display")]
    pub fn display_mut(&mut self) -> &mut CharDisplay<P::Display, P::DisplayReset> {
        &mut self.peripherals.display
    }

    /// Bring up the display. Called by the runtime between the phases.
    #[cfg(feature = "display")]
    pub fn init_display(
        &mut self,
    ) -> Result<(), display::Error<<P::Display as embedded_graphics::draw_target::DrawTarget>::Error>> {
        let Peripherals { delay, display, .. } = &mut self.peripherals;
        display.init(delay)
    }

    #[cfg(feature = "serial")]
    pub fn serial_mut(&mut self) -> &mut SerialPort<P::Uart> {
        &mut self.peripherals.serial
    }

    /// Write [`Board::report`] as one NDJSON line.
    #[cfg(feature = "serial")]
    pub fn send_report(&mut self) -> Result<(), SerialError<<P::Uart as embedded_io::ErrorType>::Error>> {
        let report = self.report();
        self.peripherals.serial.send(&report)
    }

    #[cfg(feature = "gps")]
    pub fn gps_mut(&mut self) -> &mut GpsReceiver {
        &mut self.peripherals.gps
    }

    /// Read from the UART until a valid NMEA sentence completes.
    /// `Ok(None)` when the UART reports end of stream first.
    #[cfg(feature = "gps")]
    pub fn next_gps_sentence(
        &mut self,
    ) -> Result<Option<Sentence>, SerialError<<P::Uart as embedded_io::ErrorType>::Error>> {
        let Peripherals { serial, gps, .. } = &mut self.peripherals;
        while let Some(byte) = serial.read_byte()? {
            if let Some(sentence) = gps.feed(byte) {
                return Ok(Some(sentence));
            }
        }
        Ok(None)
    }
}
