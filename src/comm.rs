/// Serial transport: diagnostic output and line input over a UART.
///
/// The runtime opens the port between the two init phases; until then
/// every read and write fails with [`SerialError::NotOpen`]. Diagnostics
/// are plain text lines; structured messages go out as newline-delimited
/// JSON. Incoming bytes are split into lines by [`LineReader`].
use core::fmt;

use embedded_io::{Read, Write};
use serde::Serialize;

use crate::pins::{BusId, Gpio};
use crate::protocol::{MsgBuffer, MAX_MSG_LEN};

/// Default baud rate for the diagnostic port
pub const SERIAL_BAUD: u32 = 115200;

/// Longest line the reader keeps (NMEA allows 82 characters)
pub const MAX_LINE_LEN: usize = 96;

/// UART wiring for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartWiring {
    pub bus: BusId,
    pub tx: Gpio,
    pub rx: Gpio,
    pub baud: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SerialError<E> {
    /// The runtime has not called [`SerialPort::begin`] yet.
    NotOpen,
    /// The message did not fit in a [`MsgBuffer`].
    Encode,
    Io(E),
}

impl<E: fmt::Debug> fmt::Display for SerialError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::NotOpen => f.write_str("serial port not open"),
            SerialError::Encode => f.write_str("message too large to encode"),
            SerialError::Io(e) => write!(f, "serial I/O failed: {:?}", e),
        }
    }
}

/// Byte-stream handle for the diagnostic UART.
pub struct SerialPort<U> {
    uart: U,
    wiring: UartWiring,
    open: bool,
}

impl<U: Read + Write> SerialPort<U> {
    pub fn new(uart: U, wiring: UartWiring) -> Self {
        Self {
            uart,
            wiring,
            open: false,
        }
    }

    pub fn wiring(&self) -> &UartWiring {
        &self.wiring
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Mark the port as brought up by the runtime.
    pub fn begin(&mut self) {
        self.open = true;
        log::debug!(
            "Serial open on {} (tx {}, rx {}, {} baud)",
            self.wiring.bus,
            self.wiring.tx,
            self.wiring.rx,
            self.wiring.baud
        );
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn ensure_open(&self) -> Result<(), SerialError<U::Error>> {
        if self.open {
            Ok(())
        } else {
            Err(SerialError::NotOpen)
        }
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), SerialError<U::Error>> {
        self.ensure_open()?;
        self.uart.write_all(line.as_bytes()).map_err(SerialError::Io)?;
        self.uart.write_all(b"\r\n").map_err(SerialError::Io)?;
        self.uart.flush().map_err(SerialError::Io)
    }

    /// Serialize `msg` and write it as one NDJSON line.
    pub fn send<T: Serialize>(&mut self, msg: &T) -> Result<(), SerialError<U::Error>> {
        self.ensure_open()?;
        let mut buf = MsgBuffer::new();
        buf.resize_default(MAX_MSG_LEN).ok();
        let len = serialize_message(msg, &mut buf).ok_or(SerialError::Encode)?;
        buf.truncate(len);
        self.uart.write_all(&buf).map_err(SerialError::Io)?;
        self.uart.flush().map_err(SerialError::Io)
    }

    /// Read one byte; `None` when the transport reports end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>, SerialError<U::Error>> {
        self.ensure_open()?;
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte).map_err(SerialError::Io)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

impl<U: Write> fmt::Write for SerialPort<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.open {
            return Err(fmt::Error);
        }
        self.uart.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

// ── Serialization helpers ──────────────────────────────────────────────

/// Serialize a message to JSON bytes in `buf`, followed by a newline.
/// Returns the number of bytes written, or None if serialization failed.
pub fn serialize_message<T: Serialize>(msg: &T, buf: &mut [u8]) -> Option<usize> {
    match serde_json_core::to_slice(msg, buf) {
        Ok(len) if len < buf.len() => {
            buf[len] = b'\n';
            Some(len + 1)
        }
        // No room for the delimiter
        Ok(_) | Err(_) => None,
    }
}

// ── Line reader ────────────────────────────────────────────────────────

/// A line yielded by [`LineReader`].
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// Line contents without the terminator.
    Complete(&'a [u8]),
    /// A line longer than [`MAX_LINE_LEN`] ended; its bytes are gone.
    Overflowed,
}

/// Line assembler. Accumulates bytes until a newline is found, then
/// yields the line.
pub struct LineReader {
    buf: [u8; MAX_LINE_LEN],
    pos: usize,
    overflowed: bool,
}

impl LineReader {
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_LINE_LEN],
            pos: 0,
            overflowed: false,
        }
    }

    /// Feed a byte into the reader. Returns a line when its terminator
    /// arrives; empty lines are skipped.
    pub fn feed(&mut self, byte: u8) -> Option<Line<'_>> {
        if byte == b'\n' || byte == b'\r' {
            let len = self.pos;
            let overflowed = self.overflowed;
            self.pos = 0;
            self.overflowed = false;
            if overflowed {
                Some(Line::Overflowed)
            } else if len > 0 {
                Some(Line::Complete(&self.buf[..len]))
            } else {
                None
            }
        } else if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
            self.pos += 1;
            None
        } else {
            self.overflowed = true;
            None
        }
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}
