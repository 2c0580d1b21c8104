// src/sensor/bme280.rs

use super::calibration::{Calibration, CALIB_00_LEN, CALIB_26_LEN, SKIPPED_16BIT, SKIPPED_20BIT};
use super::EnvironmentalSensor;
use crate::common::{config::SENSOR_ADDRESS, error::SensorError, timing};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// === Registers (datasheet Sec 5.3) ===
const REG_CHIP_ID: u8 = 0xD0;
const REG_RESET: u8 = 0xE0;
const REG_CALIB_00: u8 = 0x88;
const REG_CALIB_26: u8 = 0xE1;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_STATUS: u8 = 0xF3;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
/// First of the data registers: press_msb (0xF7) through hum_lsb (0xFE).
const REG_DATA: u8 = 0xF7;
const DATA_LEN: usize = 8;

/// Value of the chip-id register on a BME280 (a BMP280 reads 0x58).
pub const CHIP_ID: u8 = 0x60;
const RESET_COMMAND: u8 = 0xB6;
const STATUS_IM_UPDATE: u8 = 0x01;

// 16x oversampling on every channel, normal mode.
const OVERSAMPLING_X16: u8 = 0b101;
const MODE_NORMAL: u8 = 0b11;
const CTRL_HUM_VALUE: u8 = OVERSAMPLING_X16;
const CTRL_MEAS_VALUE: u8 = (OVERSAMPLING_X16 << 5) | (OVERSAMPLING_X16 << 2) | MODE_NORMAL;
// 0.5 ms standby, IIR filter off.
const CONFIG_VALUE: u8 = 0x00;

// Channel bits for `Bme280::consumed`.
const TEMPERATURE: u8 = 1 << 0;
const HUMIDITY: u8 = 1 << 1;
const PRESSURE: u8 = 1 << 2;

/// Raw ADC values from one burst read, all from the same conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    adc_p: i32,
    adc_t: i32,
    adc_h: i32,
}

impl Frame {
    fn from_burst(raw: [u8; DATA_LEN]) -> Self {
        Frame {
            adc_p: raw_20bit([raw[0], raw[1], raw[2]]),
            adc_t: raw_20bit([raw[3], raw[4], raw[5]]),
            adc_h: ((raw[6] as i32) << 8) | raw[7] as i32,
        }
    }
}

/// Blocking BME280 driver over an embedded-hal I2C bus.
///
/// The three channel reads share one burst read of the data registers:
/// the first read of a channel takes a fresh frame, the other channels are
/// then served from it until one of them is read a second time.
#[derive(Debug)]
pub struct Bme280<I2C> {
    i2c: I2C,
    address: u8,
    calibration: Option<Calibration>,
    frame: Option<Frame>,
    consumed: u8,
}

impl<I2C: I2c> Bme280<I2C> {
    /// Wraps the bus. Nothing is sent until [`EnvironmentalSensor::initialize`].
    pub fn new(i2c: I2C) -> Self {
        Bme280 {
            i2c,
            address: SENSOR_ADDRESS,
            calibration: None,
            frame: None,
            consumed: 0,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Trimming parameters, once initialized.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // --- Bus helpers ---

    fn read_registers<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], SensorError<I2C::Error>> {
        let mut buf = [0u8; N];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(SensorError::Bus)?;
        Ok(buf)
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(SensorError::Bus)
    }

    fn wait_for_calibration_copy<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError<I2C::Error>> {
        for _ in 0..timing::CALIBRATION_POLL_ATTEMPTS {
            let [status] = self.read_registers::<1>(REG_STATUS)?;
            if status & STATUS_IM_UPDATE == 0 {
                return Ok(());
            }
            delay.delay_us(timing::CALIBRATION_POLL_INTERVAL.as_micros() as u32);
        }
        Err(SensorError::CalibrationTimeout)
    }

    fn calibration_or_err(&self) -> Result<Calibration, SensorError<I2C::Error>> {
        self.calibration.ok_or(SensorError::NotInitialized)
    }

    /// Frame for `channel`: the cached one if this channel has not been
    /// served from it yet, otherwise a fresh burst read.
    fn frame_for(&mut self, channel: u8) -> Result<Frame, SensorError<I2C::Error>> {
        if let Some(frame) = self.frame {
            if self.consumed & channel == 0 {
                self.consumed |= channel;
                return Ok(frame);
            }
        }

        self.frame = None;
        let frame = Frame::from_burst(self.read_registers::<DATA_LEN>(REG_DATA)?);
        self.frame = Some(frame);
        self.consumed = channel;
        Ok(frame)
    }
}

#[inline]
fn raw_20bit([msb, lsb, xlsb]: [u8; 3]) -> i32 {
    ((msb as i32) << 12) | ((lsb as i32) << 4) | ((xlsb as i32) >> 4)
}

/// Fine temperature the other channels need, or `Skipped` for the reset pattern.
fn t_fine<E: core::fmt::Debug>(cal: &Calibration, frame: &Frame) -> Result<i32, SensorError<E>> {
    if frame.adc_t == SKIPPED_20BIT {
        return Err(SensorError::Skipped);
    }
    Ok(cal.t_fine(frame.adc_t))
}

impl<I2C: I2c> EnvironmentalSensor for Bme280<I2C> {
    type Error = I2C::Error;

    fn initialize<D: DelayNs>(&mut self, address: u8, delay: &mut D) -> Result<(), SensorError<Self::Error>> {
        self.address = address;
        self.calibration = None;
        self.frame = None;

        let [chip_id] = self.read_registers::<1>(REG_CHIP_ID)?;
        if chip_id != CHIP_ID {
            return Err(SensorError::NotFound { address, chip_id });
        }

        self.write_register(REG_RESET, RESET_COMMAND)?;
        delay.delay_ms(timing::SENSOR_RESET_SETTLE.as_millis() as u32);
        self.wait_for_calibration_copy(delay)?;

        let calib00 = self.read_registers::<CALIB_00_LEN>(REG_CALIB_00)?;
        let calib26 = self.read_registers::<CALIB_26_LEN>(REG_CALIB_26)?;
        let calibration = Calibration::from_registers(&calib00, &calib26);

        // ctrl_hum only latches on the following ctrl_meas write.
        self.write_register(REG_CTRL_HUM, CTRL_HUM_VALUE)?;
        self.write_register(REG_CONFIG, CONFIG_VALUE)?;
        self.write_register(REG_CTRL_MEAS, CTRL_MEAS_VALUE)?;

        // Data registers read as skipped until the first conversion completes.
        delay.delay_us(timing::MEASUREMENT_TIME_MAX.as_micros() as u32);

        self.calibration = Some(calibration);
        log::info!("BME280 ready at {:#04x}", address);
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError<Self::Error>> {
        let cal = self.calibration_or_err()?;
        let frame = self.frame_for(TEMPERATURE)?;
        Ok(Calibration::temperature_celsius(t_fine(&cal, &frame)?))
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError<Self::Error>> {
        let cal = self.calibration_or_err()?;
        let frame = self.frame_for(HUMIDITY)?;
        let t_fine = t_fine(&cal, &frame)?;
        if frame.adc_h == SKIPPED_16BIT {
            return Err(SensorError::Skipped);
        }
        Ok(cal.humidity_percent(frame.adc_h, t_fine))
    }

    fn read_pressure(&mut self) -> Result<f32, SensorError<Self::Error>> {
        let cal = self.calibration_or_err()?;
        let frame = self.frame_for(PRESSURE)?;
        let t_fine = t_fine(&cal, &frame)?;
        if frame.adc_p == SKIPPED_20BIT {
            return Err(SensorError::Skipped);
        }
        cal.pressure_pa(frame.adc_p, t_fine).ok_or(SensorError::InvalidCalibration)
    }
}
