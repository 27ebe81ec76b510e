//! LMIC node board support: pin maps, peripherals and board bring-up.
//!
//! A board profile describes one LoRaWAN end-node PCB: the radio
//! transceiver wiring handed to the LMIC driver, and the optional indicator
//! light, text display and diagnostic serial port. Optional peripherals are
//! selected with cargo features (`led`, `display`, `serial`, `gps`); a
//! disabled peripheral has no type, constant or handle to refer to.
//!
//! The node runtime builds a [`Board`] from platform handles and calls
//! [`Board::init`] twice: with [`InitPhase::Hardware`] at the start of
//! setup, and with [`InitPhase::PostInitSerial`] once it has brought up
//! serial and display. Profile wiring is checked at compile time.
//!
//! The library is `no_std` with no allocator and runs its tests on the
//! host. Platform binaries (see `firmware-std/`) supply the HAL types.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod boards;
pub mod defaults;
pub mod init;
pub mod mcu;
pub mod peripherals;
pub mod pins;
pub mod protocol;
pub mod wiring;

#[cfg(feature = "serial")]
pub mod comm;
#[cfg(feature = "display")]
pub mod display;
#[cfg(feature = "gps")]
pub mod gps;
#[cfg(feature = "led")]
pub mod light;

#[cfg(test)]
mod mock;

pub use board::{Board, BoardProfile};
pub use init::{BoardState, InitError, InitPhase};
pub use peripherals::{Parts, Platform};
pub use pins::{Gpio, Pin, PinMap};
