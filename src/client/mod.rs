// src/client/mod.rs

//! Host side of the link: turning the device's byte stream back into records.
//! Commands go the other way as single bytes, see [`crate::common::Command::as_byte`].

pub mod line;
pub mod parse;

pub use line::{LineAssembler, LineError};
pub use parse::{parse_record, Field, RecordParseError};
