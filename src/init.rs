/// Two-phase board initialization lifecycle.
///
/// The node runtime calls the board hook twice: once with
/// [`InitPhase::Hardware`] before it touches serial or display, and once
/// with [`InitPhase::PostInitSerial`] after bringing them up. [`Lifecycle`]
/// enforces that order and rejects everything else.
use core::fmt;

/// Checkpoints at which the runtime invokes the board hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    /// Start of setup, before serial and display exist.
    Hardware,
    /// After the runtime has initialized serial and display.
    PostInitSerial,
}

impl InitPhase {
    /// State the board must be in for this phase to run.
    pub const fn precondition(self) -> BoardState {
        match self {
            InitPhase::Hardware => BoardState::Uninitialized,
            InitPhase::PostInitSerial => BoardState::HardwareInitDone,
        }
    }

    /// State reached when this phase completes.
    pub const fn outcome(self) -> BoardState {
        match self {
            InitPhase::Hardware => BoardState::HardwareInitDone,
            InitPhase::PostInitSerial => BoardState::Ready,
        }
    }
}

impl fmt::Display for InitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitPhase::Hardware => "Hardware",
            InitPhase::PostInitSerial => "PostInitSerial",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Uninitialized,
    HardwareInitDone,
    /// Both phases succeeded. Terminal.
    Ready,
    /// A phase hook failed. Terminal; boot must not continue.
    Faulted,
}

/// Optional peripheral kinds, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralKind {
    Light,
    Display,
    Serial,
    Gps,
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeripheralKind::Light => "indicator light",
            PeripheralKind::Display => "display",
            PeripheralKind::Serial => "serial port",
            PeripheralKind::Gps => "GPS",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Driving a GPIO failed.
    Gpio,
    /// The device did not answer on its bus.
    NotResponding,
    /// The runtime did not bring the peripheral up before `PostInitSerial`.
    NotStarted,
}

/// Why a phase could not complete. Any error is fatal to boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The phase was requested in the wrong state.
    OutOfOrder { phase: InitPhase, state: BoardState },
    /// Board-specific setup failed.
    Peripheral { peripheral: PeripheralKind, fault: Fault },
}

impl InitError {
    pub const fn peripheral(peripheral: PeripheralKind, fault: Fault) -> Self {
        InitError::Peripheral { peripheral, fault }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::OutOfOrder { phase, state } => {
                write!(f, "{} init requested in state {:?}", phase, state)
            }
            InitError::Peripheral { peripheral, fault } => {
                let what = match fault {
                    Fault::Gpio => "GPIO write failed",
                    Fault::NotResponding => "not responding",
                    Fault::NotStarted => "not started by runtime",
                };
                write!(f, "{}: {}", peripheral, what)
            }
        }
    }
}

impl core::error::Error for InitError {}

/// Phase-ordering state machine.
#[derive(Debug)]
pub struct Lifecycle {
    state: BoardState,
}

impl Lifecycle {
    pub const fn new() -> Self {
        Self {
            state: BoardState::Uninitialized,
        }
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BoardState::Ready
    }

    /// Check that `phase` may run now. Does not change state.
    pub fn check(&self, phase: InitPhase) -> Result<(), InitError> {
        if self.state == phase.precondition() {
            Ok(())
        } else {
            Err(InitError::OutOfOrder {
                phase,
                state: self.state,
            })
        }
    }

    /// Record a successful phase.
    pub fn complete(&mut self, phase: InitPhase) -> Result<BoardState, InitError> {
        self.check(phase)?;
        self.state = phase.outcome();
        Ok(self.state)
    }

    /// Record a failed phase. No further phase will be accepted.
    pub fn fault(&mut self) {
        self.state = BoardState::Faulted;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
