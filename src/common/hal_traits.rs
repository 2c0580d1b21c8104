// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for the non-blocking byte-oriented serial link to the host.
///
/// embedded-hal 1.0 dropped its serial traits, so this stays a crate trait in
/// the `nb` style. Delays come straight from `embedded_hal::delay::DelayNs`,
/// the sync output from `embedded_hal::digital::OutputPin` and the sensor bus
/// from `embedded_hal::i2c::I2c`.
pub trait SerialPort {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        T::read_byte(self)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        T::write_byte(self, byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        T::flush(self)
    }
}
