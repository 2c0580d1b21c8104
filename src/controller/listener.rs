// src/controller/listener.rs

use crate::common::{command::Command, hal_traits::SerialPort};

/// Takes at most one byte off the inbound stream and maps it to a command.
///
/// Never blocks: an empty receiver, an unrecognized byte, or a receive error
/// all yield `None`. Receive errors are logged, not propagated; a noisy line
/// must not stop sampling.
pub fn poll_command<SER: SerialPort>(serial: &mut SER) -> Option<Command> {
    match serial.read_byte() {
        Ok(byte) => {
            let command = Command::from_byte(byte);
            if command.is_none() {
                log::trace!("ignoring inbound byte {:#04x}", byte);
            }
            command
        }
        Err(nb::Error::WouldBlock) => None,
        Err(nb::Error::Other(e)) => {
            log::warn!("serial receive error: {:?}", e);
            None
        }
    }
}
