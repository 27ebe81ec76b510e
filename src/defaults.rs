/// Build-time defaults and their environment overrides.
///
/// Each board profile supplies its own defaults. A build can override
/// them without touching source:
///
/// - `NODE_DEVICEID`: textual device identifier
/// - `NODE_WAITFOR_SERIAL_SECONDS`: how long the runtime waits for a host
///   terminal: `-1` waits indefinitely, `0` does not wait
///
/// Overrides are read with `option_env!`, so they are fixed into the
/// image. An unparsable wait value fails the build.
use core::fmt;

use serde::Serialize;

/// How long the runtime should wait for a serial host before continuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SerialWait {
    Indefinitely,
    Seconds(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseWaitError {
    Empty,
    InvalidDigit,
    OutOfRange,
}

impl fmt::Display for ParseWaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseWaitError::Empty => "empty wait-for-serial value",
            ParseWaitError::InvalidDigit => "wait-for-serial value is not an integer",
            ParseWaitError::OutOfRange => "wait-for-serial value must be -1 or 0..=65535",
        })
    }
}

/// Parse a wait-for-serial setting: `-1`, `0` (no wait) or seconds.
pub const fn parse_wait_seconds(value: &str) -> Result<Option<SerialWait>, ParseWaitError> {
    let bytes = value.as_bytes();
    if bytes.is_empty() {
        return Err(ParseWaitError::Empty);
    }
    if bytes.len() == 2 && bytes[0] == b'-' && bytes[1] == b'1' {
        return Ok(Some(SerialWait::Indefinitely));
    }

    let mut seconds: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return Err(ParseWaitError::InvalidDigit);
        }
        seconds = seconds * 10 + (b - b'0') as u32;
        if seconds > u16::MAX as u32 {
            return Err(ParseWaitError::OutOfRange);
        }
        i += 1;
    }

    if seconds == 0 {
        Ok(None)
    } else {
        Ok(Some(SerialWait::Seconds(seconds as u16)))
    }
}

/// Device id override from the build environment.
pub const DEVICE_ID_OVERRIDE: Option<&str> = option_env!("NODE_DEVICEID");

/// Wait-for-serial override from the build environment. The outer
/// `Option` is whether an override is set at all.
pub const WAIT_FOR_SERIAL_OVERRIDE: Option<Option<SerialWait>> =
    match option_env!("NODE_WAITFOR_SERIAL_SECONDS") {
        Some(value) => match parse_wait_seconds(value) {
            Ok(wait) => Some(wait),
            Err(_) => panic!("NODE_WAITFOR_SERIAL_SECONDS must be -1, 0 or a number of seconds"),
        },
        None => None,
    };

/// Device id for a board: the build override if set, else the board default.
pub const fn device_id(board_default: &'static str) -> &'static str {
    match DEVICE_ID_OVERRIDE {
        Some(id) if !id.is_empty() => id,
        _ => board_default,
    }
}

/// Wait-for-serial setting for a board.
pub const fn wait_for_serial(board_default: Option<SerialWait>) -> Option<SerialWait> {
    match WAIT_FOR_SERIAL_OVERRIDE {
        Some(wait) => wait,
        None => board_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_indefinite_wait() {
        assert_eq!(parse_wait_seconds("-1"), Ok(Some(SerialWait::Indefinitely)));
    }

    #[test]
    fn parse_zero_means_no_wait() {
        assert_eq!(parse_wait_seconds("0"), Ok(None));
        assert_eq!(parse_wait_seconds("000"), Ok(None));
    }

    #[test]
    fn parse_seconds() {
        assert_eq!(parse_wait_seconds("10"), Ok(Some(SerialWait::Seconds(10))));
        assert_eq!(parse_wait_seconds("65535"), Ok(Some(SerialWait::Seconds(65535))));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_wait_seconds(""), Err(ParseWaitError::Empty));
        assert_eq!(parse_wait_seconds("-2"), Err(ParseWaitError::InvalidDigit));
        assert_eq!(parse_wait_seconds("10s"), Err(ParseWaitError::InvalidDigit));
        assert_eq!(parse_wait_seconds(" 5"), Err(ParseWaitError::InvalidDigit));
        assert_eq!(parse_wait_seconds("65536"), Err(ParseWaitError::OutOfRange));
    }

    #[test]
    fn parse_works_in_const_context() {
        const WAIT: Result<Option<SerialWait>, ParseWaitError> = parse_wait_seconds("30");
        assert_eq!(WAIT, Ok(Some(SerialWait::Seconds(30))));
    }

    #[test]
    fn defaults_apply_without_overrides() {
        if DEVICE_ID_OVERRIDE.is_none() {
            assert_eq!(device_id("some-board"), "some-board");
        }
        if WAIT_FOR_SERIAL_OVERRIDE.is_none() {
            assert_eq!(wait_for_serial(None), None);
            assert_eq!(
                wait_for_serial(Some(SerialWait::Seconds(5))),
                Some(SerialWait::Seconds(5))
            );
        }
    }
}
