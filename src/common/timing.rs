// src/common/timing.rs

use super::config::BAUD_RATE;
use core::time::Duration;

// Nominal values. Sampling cadence and the sync hold live in `config`
// because they are meant to be tuned per rig; these are fixed by the parts.

// === BME280 bring-up (datasheet Sec 5.4.2, 5.4.4) ===

/// Time to wait after a soft reset before talking to the sensor again.
pub const SENSOR_RESET_SETTLE: Duration = Duration::from_millis(10);
/// Interval between polls of the `im_update` status bit while trimming data is copied.
pub const CALIBRATION_POLL_INTERVAL: Duration = Duration::from_millis(1);
/// Number of `im_update` polls before giving up. The copy takes well under 5 ms.
pub const CALIBRATION_POLL_ATTEMPTS: u8 = 50;
/// Worst-case duration of one forced/normal-mode conversion at 16x
/// oversampling on all three channels (datasheet Sec 9.1):
/// 1.25 + 2.3 * 16 + (2.3 * 16 + 0.575) * 2 ms. The data registers hold
/// their reset pattern until the first conversion after configuration ends.
pub const MEASUREMENT_TIME_MAX: Duration = Duration::from_micros(1_250 + 2_300 * 16 + (2_300 * 16 + 575) * 2);

// === Serial link, 8N1 at `config::BAUD_RATE` ===
// 1 start bit + 8 data bits + 1 stop bit = 10 bits per byte

/// Bits on the wire per byte.
pub const BITS_PER_BYTE: u64 = 10;
/// Nominal duration of one byte on the wire (1.0417 ms at 9600 baud).
pub const BYTE_DURATION: Duration = Duration::from_nanos(BITS_PER_BYTE * 1_000_000_000 / BAUD_RATE as u64);
/// Slack added on top of the nominal line transmit time before a write is abandoned.
pub const WRITE_TIMEOUT_MARGIN: Duration = Duration::from_millis(20);
/// Back-off between polls of a transmitter that returned `WouldBlock`.
pub const WRITE_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Write budget for a line of `len` bytes.
pub fn write_timeout(len: usize) -> Duration {
    BYTE_DURATION * len as u32 + WRITE_TIMEOUT_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_timeout_scales_with_length() {
        assert_eq!(write_timeout(0), WRITE_TIMEOUT_MARGIN);
        assert_eq!(write_timeout(10), Duration::from_nanos(10_416_660) + WRITE_TIMEOUT_MARGIN);
    }

    #[test]
    fn test_byte_duration_follows_baud_rate() {
        assert_eq!(BYTE_DURATION, Duration::from_nanos(10 * 1_000_000_000 / BAUD_RATE as u64));
        assert_eq!(BYTE_DURATION, Duration::from_nanos(1_041_666));
    }

    #[test]
    fn test_measurement_time_at_16x_oversampling() {
        assert_eq!(MEASUREMENT_TIME_MAX, Duration::from_micros(112_800));
    }
}
