// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod record;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, UnknownCommand};

// From config.rs (constants - users can access via common::config::*)
pub use config::SamplerConfig;

// From error.rs
pub use error::{BootError, ConfigError, LoopError, SensorError, WriteError};

// From hal_traits.rs
pub use hal_traits::SerialPort;

// From record.rs
pub use record::{Reading, Record, RecordLine};
