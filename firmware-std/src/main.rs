//! LMIC node ESP-IDF std boot harness
//!
//! Builds the selected board from ESP-IDF drivers and runs the setup
//! sequence an LMIC node runtime performs: `Hardware` init, serial and
//! display bring-up, `PostInitSerial` init. The LoRaWAN stack itself is
//! out of scope; after boot the harness reports the board, shows it on the
//! display and blinks the LED (or logs GPS sentences).

#[cfg(not(feature = "ebyte-esp32-pcb"))]
compile_error!("Select a board feature, e.g. `ebyte-esp32-pcb`");

mod panel;

use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, Gpio16, Gpio2, Output, PinDriver};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::uart::{config::Config as UartConfig, UartDriver};

use lmic_node_bsp::boards::{self, Selected as Profile};
use lmic_node_bsp::defaults::SerialWait;
use lmic_node_bsp::display::TextDisplay;
use lmic_node_bsp::light::IndicatorLight;
use lmic_node_bsp::pins::Pin;
use lmic_node_bsp::protocol::VERSION;
use lmic_node_bsp::{Board, BoardProfile, Gpio, InitPhase, Parts, Platform};

use panel::Panel;

// ── Platform ─────────────────────────────────────────────────────────

/// ESP-IDF drivers for the selected board.
struct EspIdf;

impl Platform for EspIdf {
    type Delay = FreeRtos;
    type LightPin = PinDriver<'static, Gpio2, Output>;
    type Display = Panel;
    type DisplayReset = PinDriver<'static, Gpio16, Output>;
    type Uart = UartDriver<'static>;
}

// The driver pins below are picked by type; keep them in step with the profile.
const _: () = {
    assert!(Profile::LIGHT.pin.number() == 2);
    assert!(matches!(Profile::DISPLAY.rst, Pin::Gpio(Gpio(16))));
    assert!(Profile::DISPLAY.sda.number() == 26);
    assert!(Profile::DISPLAY.scl.number() == 25);
    assert!(Profile::UART.tx.number() == 21);
    assert!(Profile::UART.rx.number() == 22);
};

type NodeBoard = Board<Profile, EspIdf>;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();

    // Bind the ESP-IDF logger to the `log` facade
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("LMIC node v{} starting on {}", VERSION, boards::BOARD_NAME);

    // ── Peripherals ──────────────────────────────────────────────────

    let p = Peripherals::take()?;

    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio26,
        p.pins.gpio25,
        &I2cConfig::new().baudrate(400.kHz().into()),
    )?;
    let uart = UartDriver::new(
        p.uart1,
        p.pins.gpio21,
        p.pins.gpio22,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(Profile::UART.baud)),
    )?;

    let mut board = NodeBoard::new(Parts {
        delay: FreeRtos,
        light_pin: PinDriver::output(p.pins.gpio2)?,
        display: Panel::new(i2c),
        display_reset: PinDriver::output(p.pins.gpio16)?,
        uart,
    });

    // ── Setup sequence ───────────────────────────────────────────────

    board.init(InitPhase::Hardware)?;

    board.serial_mut().begin();
    wait_for_host(&mut board);
    if let Err(e) = board.init_display() {
        // PostInitSerial reports the failure and stops the boot
        log::error!("Display bring-up failed: {}", e);
    }

    board.init(InitPhase::PostInitSerial)?;

    let map = board.pin_map();
    log::info!(
        "LMIC pins: nss={} rst={} dio={:?} rxen={} txen={}",
        map.nss.number(),
        map.rst.lmic_value(),
        map.dio_lmic(),
        map.rx_enable().lmic_value(),
        map.tx_enable().lmic_value(),
    );

    board.send_report().map_err(|e| anyhow!("{}", e))?;
    show_banner(&mut board)?;

    // ── Main loop ────────────────────────────────────────────────────

    loop {
        #[cfg(feature = "gps")]
        match board.next_gps_sentence() {
            Ok(Some(sentence)) => log::info!("GPS {}", sentence),
            Ok(None) => {}
            Err(e) => log::warn!("UART read failed: {:?}", e),
        }
        board.light_mut().toggle()?;
        #[cfg(not(feature = "gps"))]
        FreeRtos::delay_ms(1000);
    }
}

/// Hold boot until a host terminal is likely attached.
fn wait_for_host(board: &mut NodeBoard) {
    match board.wait_for_serial() {
        None => {}
        Some(SerialWait::Seconds(secs)) => {
            log::info!("Waiting {}s for serial host", secs);
            thread::sleep(Duration::from_secs(secs.into()));
        }
        Some(SerialWait::Indefinitely) => {
            // A plain UART has no DTR; the first received byte counts as a host.
            log::info!("Waiting for serial host, send any key");
            while !matches!(board.serial_mut().read_byte(), Ok(Some(_))) {
                FreeRtos::delay_ms(100);
            }
        }
    }
}

fn show_banner(board: &mut NodeBoard) -> anyhow::Result<()> {
    let device_id = board.device_id();
    let name = board.name();
    let display = board.display_mut();

    display.clear().map_err(|e| anyhow!("{}", e))?;
    for (row, text) in [(0, "LMIC-node"), (2, device_id), (3, name), (5, VERSION)] {
        display.draw_text(0, row, text).map_err(|e| anyhow!("{}", e))?;
    }
    Ok(())
}
