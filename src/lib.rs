// src/lib.rs

#![cfg_attr(not(test), no_std)] // Tests get std for the mock bench

pub mod client;
pub mod common;
pub mod controller;
pub mod sensor;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use common::{BootError, Command, LoopError, Reading, Record, SamplerConfig, SensorError, SerialPort};
pub use controller::{halt, SampleLoop};
pub use sensor::{Bme280, EnvironmentalSensor};
