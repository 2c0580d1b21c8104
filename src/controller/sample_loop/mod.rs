// src/controller/sample_loop/mod.rs

mod io_helpers;

use super::{listener, state::RecordingState, sync_pulse::SyncPulse};
use crate::common::{
    config::SamplerConfig,
    error::{BootError, LoopError, WriteError},
    hal_traits::SerialPort,
    record::{Reading, Record, PASCALS_PER_HECTOPASCAL},
    SensorError,
};
use crate::sensor::EnvironmentalSensor;
use core::convert::Infallible;
use core::fmt;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

/// Sent once when the sensor cannot be brought up.
pub const SENSOR_NOT_FOUND_MESSAGE: &str = "Could not find a valid BME280 sensor, check wiring!\n";

/// A sensor channel, named in fault reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    Temperature,
    Humidity,
    Pressure,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Temperature => f.write_str("temperature"),
            Channel::Humidity => f.write_str("humidity"),
            Channel::Pressure => f.write_str("pressure"),
        }
    }
}

/// What one cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The record that went out on the link.
    pub record: Record,
    /// Channels whose read failed this cycle (sent as NaN).
    pub faults: Vec<Channel, 3>,
}

type LoopResult<T, P, SER> = Result<T, LoopError<<P as embedded_hal::digital::ErrorType>::Error, <SER as SerialPort>::Error>>;

/// The cooperative sample / sync / transmit loop.
///
/// Owns every peripheral and the recording state. One call to
/// [`SampleLoop::run_cycle`] is one sample period.
#[derive(Debug)]
pub struct SampleLoop<S, P, SER, D>
where
    S: EnvironmentalSensor,
    P: OutputPin,
    SER: SerialPort,
    D: DelayNs,
{
    config: SamplerConfig,
    sensor: S,
    pulse: SyncPulse<P>,
    serial: SER,
    delay: D,
    state: RecordingState,
}

impl<S, P, SER, D> SampleLoop<S, P, SER, D>
where
    S: EnvironmentalSensor,
    P: OutputPin,
    SER: SerialPort,
    D: DelayNs,
{
    /// Brings the device up: parks the sync line low and initializes the sensor
    /// at `config.sensor_address`.
    ///
    /// If the sensor does not come up, a single diagnostic line goes out on the
    /// link and the error is returned. Nothing is retried; what happens next is
    /// the caller's call (see [`crate::controller::halt`]).
    pub fn boot(
        config: SamplerConfig,
        mut sensor: S,
        pin: P,
        mut serial: SER,
        mut delay: D,
    ) -> Result<Self, BootError<S::Error, P::Error, SER::Error>> {
        config.validate().map_err(BootError::Config)?;

        let mut pulse = SyncPulse::new(pin);
        pulse.park().map_err(BootError::Pin)?;

        if let Err(sensor_error) = sensor.initialize(config.sensor_address, &mut delay) {
            log::error!("sensor initialization failed: {}", sensor_error);
            return Err(report_boot_failure(&mut serial, &mut delay, sensor_error));
        }

        log::info!(
            "sampling every {} ms, sync hold {} ms",
            config.sample_interval_ms,
            config.sync_hold_ms
        );

        Ok(SampleLoop {
            config,
            sensor,
            pulse,
            serial,
            delay,
            state: RecordingState::Idle,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Gives the peripherals back.
    pub fn release(self) -> (S, P, SER, D) {
        (self.sensor, self.pulse.release(), self.serial, self.delay)
    }

    /// Runs one sample period.
    ///
    /// The command observed at the top of the cycle decides whether this
    /// cycle pulses; nothing received later can change that. A failed sensor
    /// read does not shorten or skip anything: the field goes out as NaN and
    /// the channel is listed in the report.
    pub fn run_cycle(&mut self) -> LoopResult<CycleReport, P, SER> {
        if let Some(command) = listener::poll_command(&mut self.serial) {
            if self.state.apply(command) {
                log::info!("{} -> {:?}", command, self.state);
            }
        }
        let recording = self.state.is_recording();

        if recording {
            self.pulse.assert().map_err(LoopError::Pin)?;
        }

        let (reading, faults) = self.sample();

        if recording {
            self.delay.delay_ms(self.config.sync_hold_ms);
            self.pulse.deassert().map_err(LoopError::Pin)?;
        }

        debug_assert!(!self.pulse.is_asserted(), "sync pulse left high past the sample");

        let record = Record { recording, reading };
        self.emit(&record)?;

        self.delay.delay_ms(self.config.tail_delay_ms(recording));

        Ok(CycleReport { record, faults })
    }

    /// Runs cycles until the sync pin or the serial link fails.
    pub fn run(&mut self) -> LoopResult<Infallible, P, SER> {
        loop {
            self.run_cycle()?;
        }
    }

    /// The three blocking reads, in fixed order.
    fn sample(&mut self) -> (Reading, Vec<Channel, 3>) {
        let mut faults = Vec::new();
        let temperature_celsius = settle(Channel::Temperature, self.sensor.read_temperature(), &mut faults);
        let humidity_percent = settle(Channel::Humidity, self.sensor.read_humidity(), &mut faults);
        let pressure_pa = settle(Channel::Pressure, self.sensor.read_pressure(), &mut faults);

        let reading = Reading {
            temperature_celsius,
            humidity_percent,
            pressure_hpa: pressure_pa / PASCALS_PER_HECTOPASCAL,
        };
        (reading, faults)
    }

    fn emit(&mut self, record: &Record) -> Result<(), WriteError<SER::Error>> {
        let formatted = record.format_into();
        let bytes = match &formatted {
            Ok(line) => line.as_bytes(),
            Err(_) => {
                log::error!("record did not fit the line buffer, sending NaN fields");
                Record::unavailable_line(record.recording).as_bytes()
            }
        };
        log::debug!("{}", record);
        io_helpers::write_all(&mut self.serial, &mut self.delay, bytes)
    }
}

/// Turns a read result into a field value, recording the channel on failure.
fn settle<E: fmt::Debug>(channel: Channel, result: Result<f32, SensorError<E>>, faults: &mut Vec<Channel, 3>) -> f32 {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} read failed: {}", channel, e);
            // One slot per channel, cannot overflow.
            let _ = faults.push(channel);
            f32::NAN
        }
    }
}

fn report_boot_failure<SER, D, E, P>(serial: &mut SER, delay: &mut D, sensor: SensorError<E>) -> BootError<E, P, SER::Error>
where
    SER: SerialPort,
    D: DelayNs,
    E: fmt::Debug,
    P: fmt::Debug,
{
    match io_helpers::write_all(serial, delay, SENSOR_NOT_FOUND_MESSAGE.as_bytes()) {
        Ok(()) => BootError::Sensor(sensor),
        Err(write) => BootError::Unreported { sensor, write },
    }
}
