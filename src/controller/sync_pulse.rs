// src/controller/sync_pulse.rs

use embedded_hal::digital::OutputPin;

/// Drives the sync output that marks each sample for the acquisition device.
#[derive(Debug)]
pub struct SyncPulse<P> {
    pin: P,
    asserted: bool,
}

impl<P: OutputPin> SyncPulse<P> {
    /// Wraps the pin without touching it; call [`SyncPulse::park`] to force the boot level.
    pub fn new(pin: P) -> Self {
        SyncPulse { pin, asserted: false }
    }

    /// Drives the line low regardless of the tracked state.
    pub fn park(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.asserted = false;
        Ok(())
    }

    /// Rising edge: a sample is about to be latched.
    pub fn assert(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.asserted = true;
        Ok(())
    }

    /// Falling edge: the sample is complete.
    pub fn deassert(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.asserted = false;
        Ok(())
    }

    #[inline]
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    #[test]
    fn test_park_then_pulse() {
        let expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut pulse = SyncPulse::new(PinMock::new(&expectations));

        pulse.park().unwrap();
        assert!(!pulse.is_asserted());
        pulse.assert().unwrap();
        assert!(pulse.is_asserted());
        pulse.deassert().unwrap();
        assert!(!pulse.is_asserted());

        pulse.release().done();
    }

    #[test]
    fn test_new_does_not_drive_the_pin() {
        let pulse = SyncPulse::new(PinMock::new(&[]));
        assert!(!pulse.is_asserted());
        pulse.release().done();
    }
}
