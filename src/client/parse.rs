// src/client/parse.rs

use crate::common::record::{Reading, Record};
use core::str::FromStr;

/// Which numeric field of a record failed to parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Humidity,
    Pressure,
}

/// Error parsing a record line on the host side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordParseError {
    #[error("empty line")]
    Empty,

    /// A record has exactly four comma-separated fields.
    #[error("expected 4 fields, found {found}")]
    FieldCount { found: usize },

    /// The leading field must be `0` or `1`.
    #[error("recording flag must be 0 or 1")]
    InvalidFlag,

    #[error("{0:?} field is not a number")]
    InvalidNumber(Field),
}

/// Parses one line as sent by the device (surrounding whitespace ignored).
///
/// `NaN` fields parse fine; they mark channels whose read failed.
pub fn parse_record(line: &str) -> Result<Record, RecordParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(RecordParseError::Empty);
    }

    let found = line.split(',').count();
    if found != 4 {
        return Err(RecordParseError::FieldCount { found });
    }

    let mut fields = line.split(',').map(str::trim);
    let recording = match fields.next() {
        Some("1") => true,
        Some("0") => false,
        _ => return Err(RecordParseError::InvalidFlag),
    };
    let mut number = |field: Field| {
        fields
            .next()
            .and_then(|s| f32::from_str(s).ok())
            .ok_or(RecordParseError::InvalidNumber(field))
    };

    let reading = Reading {
        temperature_celsius: number(Field::Temperature)?,
        humidity_percent: number(Field::Humidity)?,
        pressure_hpa: number(Field::Pressure)?,
    };
    Ok(Record { recording, reading })
}

impl FromStr for Record {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record(s)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_line() {
        let record = parse_record("1,23.5,41.25,1013.25\n").unwrap();
        assert!(record.recording);
        assert_eq!(record.reading.temperature_celsius, 23.5);
        assert_eq!(record.reading.humidity_percent, 41.25);
        assert_eq!(record.reading.pressure_hpa, 1013.25);
    }

    #[test]
    fn test_parse_what_the_device_formats() {
        let sent = Record {
            recording: false,
            reading: Reading { temperature_celsius: -4.75, humidity_percent: f32::NAN, pressure_hpa: 987.125 },
        };
        let line = sent.format_into().unwrap();
        let parsed: Record = line.parse().unwrap();
        assert!(!parsed.recording);
        assert_eq!(parsed.reading.temperature_celsius, -4.75);
        assert!(parsed.reading.humidity_percent.is_nan());
        assert_eq!(parsed.reading.pressure_hpa, 987.125);
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert_eq!(parse_record("  \r\n"), Err(RecordParseError::Empty));
        assert_eq!(parse_record("1,2,3"), Err(RecordParseError::FieldCount { found: 3 }));
        assert_eq!(parse_record("1,2,3,4,5"), Err(RecordParseError::FieldCount { found: 5 }));
        assert_eq!(parse_record("2,20,40,1000"), Err(RecordParseError::InvalidFlag));
        assert_eq!(parse_record("1,20,wet,1000"), Err(RecordParseError::InvalidNumber(Field::Humidity)));
        assert_eq!(parse_record("0,20,40,"), Err(RecordParseError::InvalidNumber(Field::Pressure)));
    }

    #[test]
    fn test_boot_diagnostic_is_not_a_record() {
        let diagnostic = crate::controller::SENSOR_NOT_FOUND_MESSAGE;
        assert_eq!(parse_record(diagnostic), Err(RecordParseError::FieldCount { found: 2 }));
    }
}
