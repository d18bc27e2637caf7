/// RISC OS time stamp decoding
///
/// RISC OS stores time as a 5-byte count of centiseconds since
/// 1900-01-01 00:00:00 UTC. For files with a filetype the low byte of the
/// load address holds the top byte of that count and the execution address
/// holds the remaining four bytes.

use chrono::{DateTime, Local, Utc};

/// Centiseconds between 1900-01-01 and 1970-01-01 (70 years, 17 leap days)
pub const CENTISECONDS_1900_TO_1970: i64 = ((365 * 70) + 17) * 24 * 360_000;

/// Largest value a 5-byte time stamp can hold
pub const MAX_RISC_OS_TIME: u64 = (1 << 40) - 1;

/// Assemble the 5-byte time stamp from a file's load and execution addresses
pub fn risc_os_time(load_address: u32, execution_address: u32) -> u64 {
    (u64::from(load_address & 0xFF) << 32) | u64::from(execution_address)
}

/// Convert centiseconds since 1900 into a UTC time
///
/// Returns `None` for counts before 1900 or beyond what a calendar date
/// can represent.
pub fn decode_utc(centiseconds: i64) -> Option<DateTime<Utc>> {
    if centiseconds < 0 {
        return None;
    }
    let unix = centiseconds - CENTISECONDS_1900_TO_1970;
    let secs = unix.div_euclid(100);
    let nanos = (unix.rem_euclid(100) as u32) * 10_000_000;
    DateTime::<Utc>::from_timestamp(secs, nanos)
}

/// Convert centiseconds since 1900 into local time
pub fn decode_timestamp(centiseconds: i64) -> Option<DateTime<Local>> {
    decode_utc(centiseconds).map(|t| t.with_timezone(&Local))
}
