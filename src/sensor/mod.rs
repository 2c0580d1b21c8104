// src/sensor/mod.rs

pub mod bme280;
pub mod calibration;

use crate::common::error::SensorError;
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;

/// A blocking temperature/humidity/pressure sensor.
///
/// Every call is a bus transaction that blocks until it completes. Failures
/// come back as [`SensorError`]; the sample loop turns them into NaN fields
/// instead of stopping.
pub trait EnvironmentalSensor {
    /// Bus error type of the underlying transport.
    type Error: Debug;

    /// Checks for the device at `address` and configures it for continuous sampling.
    ///
    /// Fails if nothing answers or the device does not identify as the expected part.
    fn initialize<D: DelayNs>(&mut self, address: u8, delay: &mut D) -> Result<(), SensorError<Self::Error>>;

    /// Temperature in degrees Celsius.
    fn read_temperature(&mut self) -> Result<f32, SensorError<Self::Error>>;

    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, SensorError<Self::Error>>;

    /// Pressure in Pa.
    fn read_pressure(&mut self) -> Result<f32, SensorError<Self::Error>>;
}

pub use bme280::Bme280;
pub use calibration::Calibration;
