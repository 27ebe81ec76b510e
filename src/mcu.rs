/// GPIO capability tables for supported MCUs.
///
/// Used by wiring validation to reject pins that do not exist, are tied
/// up by the MCU itself (flash, PSRAM), or cannot drive an output.
use crate::pins::Gpio;

/// Which GPIO numbers an MCU exposes, as 64-bit masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuPins {
    pub name: &'static str,
    present: u64,
    output: u64,
    reserved: u64,
}

impl McuPins {
    pub const fn is_present(&self, gpio: Gpio) -> bool {
        bit(self.present, gpio)
    }

    pub const fn is_output_capable(&self, gpio: Gpio) -> bool {
        bit(self.output, gpio)
    }

    pub const fn is_reserved(&self, gpio: Gpio) -> bool {
        bit(self.reserved, gpio)
    }
}

const fn bit(mask: u64, gpio: Gpio) -> bool {
    gpio.0 < 64 && mask & (1u64 << gpio.0) != 0
}

/// Mask with bits `from..=to` set.
const fn span(from: u8, to: u8) -> u64 {
    let mut mask = 0u64;
    let mut n = from;
    while n <= to {
        mask |= 1u64 << n;
        n += 1;
    }
    mask
}

/// ESP32 (original, Xtensa dual-core).
///
/// GPIO 20, 24 and 28–31 are not bonded out. GPIO 6–11 carry the SPI
/// flash on every WROOM/WROVER module. GPIO 34–39 are input only.
pub const ESP32: McuPins = McuPins {
    name: "ESP32",
    present: span(0, 19) | span(21, 23) | span(25, 27) | span(32, 39),
    output: span(0, 19) | span(21, 23) | span(25, 27) | span(32, 33),
    reserved: span(6, 11),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn esp32_missing_gpios() {
        for n in [20u8, 24, 28, 29, 30, 31, 40, 63, 64, 200] {
            assert!(!ESP32.is_present(Gpio(n)), "GPIO{n} should not exist");
        }
    }

    #[test]
    fn esp32_input_only_range() {
        for n in 34u8..=39 {
            assert!(ESP32.is_present(Gpio(n)));
            assert!(!ESP32.is_output_capable(Gpio(n)), "GPIO{n} is input only");
        }
        assert!(ESP32.is_output_capable(Gpio(33)));
    }

    #[test]
    fn esp32_flash_pins_reserved() {
        for n in 6u8..=11 {
            assert!(ESP32.is_reserved(Gpio(n)));
        }
        assert!(!ESP32.is_reserved(Gpio(5)));
        assert!(!ESP32.is_reserved(Gpio(12)));
    }
}
