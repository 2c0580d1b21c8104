// src/common/record.rs

//! The outbound line: `<flag>,<temperature C>,<humidity %>,<pressure hPa>\n`.

use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Fits any flag plus three `f32`s printed without exponent.
pub const RECORD_LINE_CAPACITY: usize = 128;

/// A formatted record, newline included.
pub type RecordLine = ArrayString<RECORD_LINE_CAPACITY>;

/// Pascals per hectopascal; the sensor reports Pa, the link carries hPa.
pub const PASCALS_PER_HECTOPASCAL: f32 = 100.0;

/// One set of ambient values. Fields whose read failed hold NaN.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    pub temperature_celsius: f32,
    pub humidity_percent: f32,
    pub pressure_hpa: f32,
}

impl Reading {
    /// Reading where every channel failed.
    pub const UNAVAILABLE: Reading = Reading {
        temperature_celsius: f32::NAN,
        humidity_percent: f32::NAN,
        pressure_hpa: f32::NAN,
    };

    /// True when no channel carries the NaN sentinel.
    pub fn is_complete(&self) -> bool {
        !(self.temperature_celsius.is_nan() || self.humidity_percent.is_nan() || self.pressure_hpa.is_nan())
    }
}

/// A reading tagged with the recording state at the start of its cycle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Record {
    pub recording: bool,
    pub reading: Reading,
}

impl Record {
    /// Leading field: `1` while recording, `0` when idle.
    #[inline]
    pub const fn flag(&self) -> u8 {
        self.recording as u8
    }

    /// Formats the record as a newline-terminated line.
    pub fn format_into(&self) -> Result<RecordLine, fmt::Error> {
        let mut line = RecordLine::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }

    /// Line sent in place of a record that could not be formatted.
    pub const fn unavailable_line(recording: bool) -> &'static str {
        if recording {
            "1,NaN,NaN,NaN\n"
        } else {
            "0,NaN,NaN,NaN\n"
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.flag(),
            self.reading.temperature_celsius,
            self.reading.humidity_percent,
            self.reading.pressure_hpa
        )
    }
}
