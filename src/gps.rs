/// GPS ingestion over the diagnostic UART.
///
/// The receiver shares the UART with diagnostics; it only frames NMEA
/// sentences (`$BODY*HH`) and checks their XOR checksum. Decoding the
/// fields is left to the caller.
use core::fmt;

use crate::comm::{Line, LineReader};

/// Longest sentence body kept. NMEA 0183 caps a whole sentence at 82
/// characters, which leaves 75 once `$`, `*hh` and CRLF are counted.
pub const MAX_SENTENCE_LEN: usize = 75;

/// Sentence body between `$` and `*`, e.g. `GPGGA,123519,...`
pub type Sentence = heapless::String<MAX_SENTENCE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmeaError {
    MissingStart,
    MissingChecksum,
    BadChecksum { expected: u8, computed: u8 },
    NotAscii,
    TooLong,
}

impl fmt::Display for NmeaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NmeaError::MissingStart => f.write_str("sentence does not start with '$'"),
            NmeaError::MissingChecksum => f.write_str("sentence has no '*hh' checksum"),
            NmeaError::BadChecksum { expected, computed } => {
                write!(f, "checksum mismatch (expected {:02X}, computed {:02X})", expected, computed)
            }
            NmeaError::NotAscii => f.write_str("sentence contains non-ASCII bytes"),
            NmeaError::TooLong => f.write_str("sentence too long"),
        }
    }
}

/// Validate one NMEA line and return its body.
pub fn parse_sentence(line: &[u8]) -> Result<&str, NmeaError> {
    let rest = line.strip_prefix(b"$").ok_or(NmeaError::MissingStart)?;
    let star = rest
        .iter()
        .rposition(|&b| b == b'*')
        .ok_or(NmeaError::MissingChecksum)?;
    let (body, checksum) = (&rest[..star], &rest[star + 1..]);

    if checksum.len() != 2 {
        return Err(NmeaError::MissingChecksum);
    }
    let expected = hex_byte(checksum[0], checksum[1]).ok_or(NmeaError::MissingChecksum)?;
    let computed = body.iter().fold(0u8, |acc, &b| acc ^ b);
    if expected != computed {
        return Err(NmeaError::BadChecksum { expected, computed });
    }

    if body.len() > MAX_SENTENCE_LEN {
        return Err(NmeaError::TooLong);
    }
    if !body.is_ascii() {
        return Err(NmeaError::NotAscii);
    }
    core::str::from_utf8(body).map_err(|_| NmeaError::NotAscii)
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    let digit = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
    Some(digit(hi)? << 4 | digit(lo)?)
}

/// Assembles sentences from a byte stream and drops corrupt ones.
pub struct GpsReceiver {
    lines: LineReader,
    dropped: u32,
}

impl GpsReceiver {
    pub const fn new() -> Self {
        Self {
            lines: LineReader::new(),
            dropped: 0,
        }
    }

    /// Feed one byte; returns a sentence body once a valid line completes.
    pub fn feed(&mut self, byte: u8) -> Option<Sentence> {
        let parsed = match self.lines.feed(byte)? {
            Line::Complete(line) => parse_sentence(line).map(Sentence::try_from),
            Line::Overflowed => Err(NmeaError::TooLong),
        };
        match parsed {
            Ok(Ok(sentence)) => Some(sentence),
            Ok(Err(_)) => self.reject(NmeaError::TooLong),
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, e: NmeaError) -> Option<Sentence> {
        self.dropped = self.dropped.wrapping_add(1);
        log::warn!("GPS sentence dropped: {}", e);
        None
    }

    /// Count of lines rejected since start-up.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for GpsReceiver {
    fn default() -> Self {
        Self::new()
    }
}
