// src/controller/mod.rs

pub mod listener;
pub mod sample_loop;
pub mod state;
pub mod sync_pulse;

pub use listener::poll_command;
pub use sample_loop::{Channel, CycleReport, SampleLoop, SENSOR_NOT_FOUND_MESSAGE};
pub use state::RecordingState;
pub use sync_pulse::SyncPulse;

/// Parks the CPU for good.
///
/// For firmware that would rather stop than stream readings from a sensor
/// it could not bring up: report the [`crate::common::BootError`], then call this.
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
