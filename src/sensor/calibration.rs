// src/sensor/calibration.rs

//! BME280 factory trimming and Bosch's integer compensation formulas
//! (datasheet Sec 4.2.3 and 8.2). Intermediates are widened to `i64` so raw
//! values outside the physical range cannot overflow.

/// Length of the trimming block starting at 0x88 (through 0xA1, `dig_H1`).
pub const CALIB_00_LEN: usize = 26;
/// Length of the trimming block starting at 0xE1.
pub const CALIB_26_LEN: usize = 7;

/// Raw 20-bit temperature/pressure value reported for a skipped conversion.
pub const SKIPPED_20BIT: i32 = 0x80000;
/// Raw 16-bit humidity value reported for a skipped conversion.
pub const SKIPPED_16BIT: i32 = 0x8000;

/// Per-device trimming parameters read once at start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

impl Calibration {
    /// Decodes the two trimming register blocks.
    pub fn from_registers(calib00: &[u8; CALIB_00_LEN], calib26: &[u8; CALIB_26_LEN]) -> Self {
        let u16_at = |b: &[u8], i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
        let i16_at = |b: &[u8], i: usize| i16::from_le_bytes([b[i], b[i + 1]]);

        // dig_H4 and dig_H5 are 12-bit signed values sharing the nibbles of 0xE5.
        let e4 = calib26[3];
        let e5 = calib26[4];
        let e6 = calib26[5];

        Calibration {
            dig_t1: u16_at(calib00, 0),
            dig_t2: i16_at(calib00, 2),
            dig_t3: i16_at(calib00, 4),
            dig_p1: u16_at(calib00, 6),
            dig_p2: i16_at(calib00, 8),
            dig_p3: i16_at(calib00, 10),
            dig_p4: i16_at(calib00, 12),
            dig_p5: i16_at(calib00, 14),
            dig_p6: i16_at(calib00, 16),
            dig_p7: i16_at(calib00, 18),
            dig_p8: i16_at(calib00, 20),
            dig_p9: i16_at(calib00, 22),
            // calib00[24] (0xA0) is unused
            dig_h1: calib00[25],
            dig_h2: i16_at(calib26, 0),
            dig_h3: calib26[2],
            dig_h4: ((e4 as i8 as i16) << 4) | (e5 & 0x0F) as i16,
            dig_h5: ((e6 as i8 as i16) << 4) | (e5 >> 4) as i16,
            dig_h6: calib26[6] as i8,
        }
    }

    /// Fine temperature shared by all three compensation formulas.
    pub fn t_fine(&self, adc_t: i32) -> i32 {
        let adc_t = adc_t as i64;
        let t1 = self.dig_t1 as i64;
        let var1 = (((adc_t >> 3) - (t1 << 1)) * self.dig_t2 as i64) >> 11;
        let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * self.dig_t3 as i64) >> 14;
        (var1 + var2) as i32
    }

    /// Temperature in degrees Celsius, at the 0.01 degree resolution of the integer formula.
    pub fn temperature_celsius(t_fine: i32) -> f32 {
        let centi = (t_fine as i64 * 5 + 128) >> 8;
        centi as f32 / 100.0
    }

    /// Pressure in Pa. `None` when the trimming data would divide by zero.
    pub fn pressure_pa(&self, adc_p: i32, t_fine: i32) -> Option<f32> {
        let mut var1 = t_fine as i64 - 128_000;
        let mut var2 = var1 * var1 * self.dig_p6 as i64;
        var2 += (var1 * self.dig_p5 as i64) << 17;
        var2 += (self.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * self.dig_p3 as i64) >> 8) + ((var1 * self.dig_p2 as i64) << 12);
        var1 = (((1i64 << 47) + var1) * self.dig_p1 as i64) >> 33;
        if var1 == 0 {
            return None;
        }

        let mut p = 1_048_576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = (self.dig_p9 as i64 * (p >> 13) * (p >> 13)) >> 25;
        var2 = (self.dig_p8 as i64 * p) >> 19;
        p = ((p + var1 + var2) >> 8) + ((self.dig_p7 as i64) << 4);

        // Q24.8
        Some(p as f32 / 256.0)
    }

    /// Relative humidity in percent, clamped to 0..=100.
    pub fn humidity_percent(&self, adc_h: i32, t_fine: i32) -> f32 {
        let adc_h = adc_h as i64;
        let h1 = self.dig_h1 as i64;
        let h2 = self.dig_h2 as i64;
        let h3 = self.dig_h3 as i64;
        let h4 = self.dig_h4 as i64;
        let h5 = self.dig_h5 as i64;
        let h6 = self.dig_h6 as i64;

        let mut v = t_fine as i64 - 76_800;
        v = ((((adc_h << 14) - (h4 << 20) - (h5 * v)) + 16_384) >> 15)
            * (((((((v * h6) >> 10) * (((v * h3) >> 11) + 32_768)) >> 10) + 2_097_152) * h2 + 8192) >> 14);
        v -= ((((v >> 15) * (v >> 15)) >> 7) * h1) >> 4;
        let v = v.clamp(0, 419_430_400);

        // Q22.10
        (v >> 12) as f32 / 1024.0
    }
}
