// src/common/command.rs

//! Host-to-device commands.
//!
//! Each command is a single ASCII byte; anything else on the inbound stream is noise.

use core::convert::TryFrom;
use core::fmt;

/// Byte that starts a recording.
pub const START_BYTE: u8 = b'1';
/// Byte that stops a recording.
pub const STOP_BYTE: u8 = b'0';

/// A recognized command byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// `'1'` - enter the recording state and start pulsing.
    Start,
    /// `'0'` - return to idle.
    Stop,
}

impl Command {
    /// Maps an inbound byte to a command. Unrecognized bytes yield `None`.
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            START_BYTE => Some(Command::Start),
            STOP_BYTE => Some(Command::Stop),
            _ => None,
        }
    }

    /// The byte a host sends for this command.
    #[inline]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Command::Start => START_BYTE,
            Command::Stop => STOP_BYTE,
        }
    }
}

/// Returned when converting a byte that is not a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized command byte {0:#04x}")]
pub struct UnknownCommand(pub u8);

impl TryFrom<u8> for Command {
    type Error = UnknownCommand;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_byte(value).ok_or(UnknownCommand(value))
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> Self {
        value.as_byte()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => f.write_str("start"),
            Command::Stop => f.write_str("stop"),
        }
    }
}
