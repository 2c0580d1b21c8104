// src/common/config.rs

use super::error::ConfigError;

// === Board wiring ===

/// GPIO number of the sync pulse output on the reference board.
///
/// The library never touches pin numbers itself (it takes an `OutputPin`);
/// this is the value the firmware binary wires up.
pub const SYNC_PIN: u8 = 7;

/// Sensor bus address. The breakout is strapped to 0x76 (SDO to GND), which is
/// NOT the 0x77 default most BME280 libraries assume.
pub const SENSOR_ADDRESS: u8 = 0x76;

/// Symbol rate agreed with the host client.
pub const BAUD_RATE: u32 = 9600;

// === Sampling ===

/// Delay between the start of successive sample cycles.
pub const SAMPLE_INTERVAL_MS: u32 = 1000;

/// How long the sync pulse stays high after the sensor reads complete, so the
/// acquisition hardware has time to latch it. Calibrated by hand and possibly
/// removable once validated against the recorder.
pub const SYNC_HOLD_MS: u32 = 10;

/// Runtime copy of the sampling constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub sample_interval_ms: u32,
    pub sync_hold_ms: u32,
    pub sensor_address: u8,
}

impl SamplerConfig {
    pub const DEFAULT: SamplerConfig = SamplerConfig {
        sample_interval_ms: SAMPLE_INTERVAL_MS,
        sync_hold_ms: SYNC_HOLD_MS,
        sensor_address: SENSOR_ADDRESS,
    };

    pub const fn with_sample_interval_ms(mut self, ms: u32) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    pub const fn with_sync_hold_ms(mut self, ms: u32) -> Self {
        self.sync_hold_ms = ms;
        self
    }

    pub const fn with_sensor_address(mut self, address: u8) -> Self {
        self.sensor_address = address;
        self
    }

    /// Checks that the hold fits inside the interval so the recording-cycle
    /// compensation never goes negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.sync_hold_ms >= self.sample_interval_ms {
            return Err(ConfigError::HoldExceedsInterval {
                hold_ms: self.sync_hold_ms,
                interval_ms: self.sample_interval_ms,
            });
        }
        Ok(())
    }

    /// Delay that closes out a cycle: the hold already spent inside a
    /// recording cycle is taken off the interval.
    #[inline]
    pub const fn tail_delay_ms(&self, recording: bool) -> u32 {
        if recording {
            self.sample_interval_ms.saturating_sub(self.sync_hold_ms)
        } else {
            self.sample_interval_ms
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.sample_interval_ms, 1000);
        assert_eq!(config.sync_hold_ms, 10);
        assert_eq!(config.sensor_address, 0x76);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tail_delay_compensates_for_hold() {
        let config = SamplerConfig::DEFAULT;
        assert_eq!(config.tail_delay_ms(false), 1000);
        assert_eq!(config.tail_delay_ms(true), 990);
        assert_eq!(config.tail_delay_ms(true) + config.sync_hold_ms, config.tail_delay_ms(false));
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        assert_eq!(
            SamplerConfig::DEFAULT.with_sample_interval_ms(0).validate(),
            Err(ConfigError::ZeroInterval)
        );
        assert_eq!(
            SamplerConfig::DEFAULT.with_sample_interval_ms(10).validate(),
            Err(ConfigError::HoldExceedsInterval { hold_ms: 10, interval_ms: 10 })
        );
        assert!(SamplerConfig::DEFAULT.with_sync_hold_ms(0).validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SamplerConfig::DEFAULT
            .with_sample_interval_ms(500)
            .with_sync_hold_ms(5)
            .with_sensor_address(0x77);
        assert_eq!(config, SamplerConfig { sample_interval_ms: 500, sync_hold_ms: 5, sensor_address: 0x77 });
    }
}
