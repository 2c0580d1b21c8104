// src/common/error.rs

use core::fmt::Debug;

/// Errors raised by an environmental sensor driver.
#[derive(Debug, thiserror::Error)]
pub enum SensorError<E = ()>
where
    E: Debug, // Debug is the minimum the format strings need from the bus error
{
    /// Underlying bus error from the HAL implementation.
    #[error("I2C bus error: {0:?}")]
    Bus(E),

    /// A device answered at the address but did not identify as the expected chip.
    #[error("no BME280 at address {address:#04x} (chip id {chip_id:#04x})")]
    NotFound { address: u8, chip_id: u8 },

    /// The factory trimming copy did not finish within the polling budget after reset.
    #[error("calibration data not ready after reset")]
    CalibrationTimeout,

    /// Trimming parameters would divide by zero during compensation.
    #[error("invalid calibration data")]
    InvalidCalibration,

    /// The channel was disabled or the conversion was skipped (raw value reads as reset pattern).
    #[error("measurement skipped")]
    Skipped,

    /// A read was attempted before `initialize` succeeded.
    #[error("sensor used before initialization")]
    NotInitialized,
}

/// Failure to push bytes out of the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WriteError<E = ()>
where
    E: Debug,
{
    /// Underlying I/O error from the UART implementation.
    #[error("serial I/O error: {0:?}")]
    Io(E),

    /// The transmitter did not accept the line within the write budget.
    #[error("serial write timed out")]
    Timeout,
}

/// Errors that stop the sample loop. Sensor read failures are not among them:
/// those are reported per cycle and never break the cadence.
#[derive(Debug, thiserror::Error)]
pub enum LoopError<P = (), S = ()>
where
    P: Debug,
    S: Debug,
{
    /// Driving the sync output failed.
    #[error("sync pin error: {0:?}")]
    Pin(P),

    /// Emitting a record failed.
    #[error("{0}")]
    Write(WriteError<S>),
}

impl<P: Debug, S: Debug> From<WriteError<S>> for LoopError<P, S> {
    fn from(e: WriteError<S>) -> Self {
        LoopError::Write(e)
    }
}

/// Fatal failures while bringing the device up.
///
/// The caller decides what to do with it; firmware that refuses to run
/// degraded passes it to [`crate::controller::halt`].
#[derive(Debug, thiserror::Error)]
pub enum BootError<E = (), P = (), S = ()>
where
    E: Debug,
    P: Debug,
    S: Debug,
{
    /// The sensor failed to initialize; the diagnostic line was sent.
    #[error("sensor initialization failed: {0}")]
    Sensor(SensorError<E>),

    /// The sensor failed to initialize and the diagnostic line could not be sent either.
    #[error("sensor initialization failed: {sensor} (diagnostic not sent: {write})")]
    Unreported {
        sensor: SensorError<E>,
        write: WriteError<S>,
    },

    /// Parking the sync output low failed.
    #[error("sync pin error: {0:?}")]
    Pin(P),

    /// The sampler configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(ConfigError),
}

impl<E: Debug, P: Debug, S: Debug> BootError<E, P, S> {
    /// The sensor failure behind this error, if any.
    pub fn sensor_error(&self) -> Option<&SensorError<E>> {
        match self {
            BootError::Sensor(e) | BootError::Unreported { sensor: e, .. } => Some(e),
            BootError::Pin(_) | BootError::Config(_) => None,
        }
    }
}

/// Rejected sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("sample interval must be non-zero")]
    ZeroInterval,

    #[error("sync hold of {hold_ms} ms does not fit in a {interval_ms} ms interval")]
    HoldExceedsInterval { hold_ms: u32, interval_ms: u32 },
}
