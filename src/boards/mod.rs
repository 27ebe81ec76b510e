/// Board profiles, one module per board.
///
/// A `board-*` feature compiles the profile in and makes it
/// [`Selected`], the profile firmware builds against.

#[cfg(feature = "board-ebyte-esp32-pcb")]
pub mod ebyte_esp32_pcb;

#[cfg(feature = "board-ebyte-esp32-pcb")]
mod selected {
    use crate::board::BoardProfile;

    pub type Selected = super::ebyte_esp32_pcb::EbyteEsp32Pcb;
    pub const BOARD_NAME: &str = <Selected as BoardProfile>::NAME;
}

#[cfg(not(any(feature = "board-ebyte-esp32-pcb")))]
mod selected {
    pub const BOARD_NAME: &str = "unknown";
}

pub use selected::*;
