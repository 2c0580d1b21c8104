// src/controller/sample_loop/io_helpers.rs

use crate::common::{error::WriteError, hal_traits::SerialPort, timing};
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use nb::Result as NbResult;

/// Pushes `bytes` out and flushes, giving up once the transmitter has been
/// stalled for longer than the nominal line time plus margin.
pub(crate) fn write_all<SER, D>(serial: &mut SER, delay: &mut D, bytes: &[u8]) -> Result<(), WriteError<SER::Error>>
where
    SER: SerialPort,
    D: DelayNs,
{
    let mut budget = Budget::new(timing::write_timeout(bytes.len()));

    for byte in bytes {
        budget.poll(serial, delay, |s| s.write_byte(*byte))?;
    }
    budget.poll(serial, delay, |s| s.flush())
}

/// Time spent backing off a `WouldBlock` transmitter, counted in delay steps.
struct Budget {
    limit: Duration,
    waited: Duration,
}

impl Budget {
    fn new(limit: Duration) -> Self {
        Budget { limit, waited: Duration::ZERO }
    }

    fn poll<SER, D, FN, T>(&mut self, serial: &mut SER, delay: &mut D, mut f: FN) -> Result<T, WriteError<SER::Error>>
    where
        SER: SerialPort,
        D: DelayNs,
        FN: FnMut(&mut SER) -> NbResult<T, SER::Error>,
    {
        loop {
            match f(serial) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.waited >= self.limit {
                        return Err(WriteError::Timeout);
                    }
                    delay.delay_us(timing::WRITE_POLL_INTERVAL.as_micros() as u32);
                    self.waited += timing::WRITE_POLL_INTERVAL;
                }
                Err(nb::Error::Other(e)) => return Err(WriteError::Io(e)),
            }
        }
    }
}
