// src/test_support.rs

//! Hand-rolled HAL mocks sharing one virtual clock and event log, so tests can
//! check the ordering and spacing of pin edges, bus reads and emitted lines.

use crate::common::{error::SensorError, hal_traits::SerialPort};
use crate::sensor::EnvironmentalSensor;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, OutputPin};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

pub const NANOS_PER_MILLI: u64 = 1_000_000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockBusError;

impl digital::Error for MockBusError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Pin(bool),
    ReadStart(&'static str),
    ReadEnd(&'static str),
    Line(String),
}

#[derive(Debug, Default)]
pub struct Bench {
    pub now_ns: u64,
    pub events: Vec<(u64, Event)>,
    pub inbound: VecDeque<u8>,
    pub outbound: Vec<u8>,
    pub pin_high: bool,
    pub read_latency_ns: u64,
    pub failing_channel: Option<&'static str>,
    pub sensor_absent: bool,
    pub pin_broken: bool,
    pub tx_blocked: bool,
    pub tx_broken: bool,
    pub initialized_at: Option<u8>,
}

impl Bench {
    fn log(&mut self, event: Event) {
        self.events.push((self.now_ns, event));
    }

    /// Lines emitted so far, newline stripped.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|(_, e)| match e {
                Event::Line(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Pin edges recorded so far.
    pub fn pin_edges(&self) -> Vec<(u64, bool)> {
        self.events
            .iter()
            .filter_map(|(t, e)| match e {
                Event::Pin(level) => Some((*t, *level)),
                _ => None,
            })
            .collect()
    }

    /// Drops everything logged so far.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

pub type Shared = Rc<RefCell<Bench>>;

pub fn bench() -> Shared {
    Rc::new(RefCell::new(Bench::default()))
}

// --- Sensor ---

pub struct MockSensor {
    bench: Shared,
    pub temperature: f32,
    pub humidity: f32,
    pub pressure_pa: f32,
}

impl MockSensor {
    pub fn new(bench: &Shared) -> Self {
        MockSensor {
            bench: bench.clone(),
            temperature: 23.5,
            humidity: 41.25,
            pressure_pa: 101_325.0,
        }
    }

    fn read(&mut self, channel: &'static str, value: f32) -> Result<f32, SensorError<MockBusError>> {
        let mut bench = self.bench.borrow_mut();
        bench.log(Event::ReadStart(channel));
        let latency = bench.read_latency_ns;
        bench.now_ns += latency;
        bench.log(Event::ReadEnd(channel));
        if bench.failing_channel == Some(channel) {
            Err(SensorError::Bus(MockBusError))
        } else {
            Ok(value)
        }
    }
}

impl EnvironmentalSensor for MockSensor {
    type Error = MockBusError;

    fn initialize<D: DelayNs>(&mut self, address: u8, _delay: &mut D) -> Result<(), SensorError<Self::Error>> {
        let mut bench = self.bench.borrow_mut();
        if bench.sensor_absent {
            return Err(SensorError::NotFound { address, chip_id: 0x58 });
        }
        bench.initialized_at = Some(address);
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError<Self::Error>> {
        self.read("temperature", self.temperature)
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError<Self::Error>> {
        self.read("humidity", self.humidity)
    }

    fn read_pressure(&mut self) -> Result<f32, SensorError<Self::Error>> {
        self.read("pressure", self.pressure_pa)
    }
}

// --- Sync pin ---

pub struct MockPin(pub Shared);

impl ErrorType for MockPin {
    type Error = MockBusError;
}

impl MockPin {
    fn set(&mut self, level: bool) -> Result<(), MockBusError> {
        let mut bench = self.0.borrow_mut();
        if bench.pin_broken {
            return Err(MockBusError);
        }
        bench.pin_high = level;
        bench.log(Event::Pin(level));
        Ok(())
    }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

// --- Delay ---

pub struct MockDelay(pub Shared);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_ns += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().now_ns += us as u64 * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().now_ns += ms as u64 * NANOS_PER_MILLI;
    }
}

// --- Serial ---

pub struct MockSerial(pub Shared);

impl SerialPort for MockSerial {
    type Error = MockBusError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.0.borrow_mut().inbound.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        let mut bench = self.0.borrow_mut();
        if bench.tx_broken {
            return Err(nb::Error::Other(MockBusError));
        }
        if bench.tx_blocked {
            return Err(nb::Error::WouldBlock);
        }
        bench.outbound.push(byte);
        if byte == b'\n' {
            let start = bench.outbound[..bench.outbound.len() - 1]
                .iter()
                .rposition(|b| *b == b'\n')
                .map_or(0, |i| i + 1);
            let end = bench.outbound.len() - 1;
            let line = String::from_utf8_lossy(&bench.outbound[start..end]).into_owned();
            bench.log(Event::Line(line));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}
