//! Decoders for the individual textual fields of a sentence.
//!
//! Every decoder is total: malformed input comes back as a [`SentenceError`], never as a
//! panic.

use core::fmt;

use chrono::{NaiveDate, NaiveTime};
use num_traits::float::FloatCore;

use crate::error::{DateTimeError, SentenceError};

/// Time of day (UTC) as reported by the receiver.
///
/// Displays as `HH:MM:SS UTC`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl UtcTime {
    pub fn to_naive_time(&self) -> Result<NaiveTime, DateTimeError> {
        NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .ok_or(DateTimeError::InvalidTime)
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02} UTC",
            self.hour, self.minute, self.second
        )
    }
}

/// Calendar date as reported by the receiver.
///
/// Displays as `DD-MM-YYYY`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixDate {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl FixDate {
    pub fn to_naive_date(&self) -> Result<NaiveDate, DateTimeError> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(DateTimeError::InvalidDate)
    }
}

impl fmt::Display for FixDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }
}

/// Receiver's own verdict on the position it is reporting
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixValidity {
    Valid,
    Invalid,
}

fn two_digits(raw: &[u8]) -> Option<u8> {
    match raw {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => Some((*tens - b'0') * 10 + (*ones - b'0')),
        _ => None,
    }
}

/// Converts `DDMM.MMMM` (latitude) or `DDDMM.MMMM` (longitude) into signed decimal degrees.
///
/// The result is negative for the `S` and `W` hemispheres.
pub fn decode_angle(raw: &str, hemisphere: &str) -> Result<f64, SentenceError> {
    if raw.is_empty() || hemisphere.is_empty() {
        return Err(SentenceError::InvalidAngle);
    }
    let value: f64 = raw.parse().map_err(|_| SentenceError::InvalidAngle)?;
    if !value.is_finite() {
        return Err(SentenceError::InvalidAngle);
    }

    let whole = FloatCore::floor(value / 100.0);
    let minutes = value - whole * 100.0;
    let degrees = whole + minutes / 60.0;

    match hemisphere {
        "S" | "W" => Ok(-degrees),
        _ => Ok(degrees),
    }
}

/// Decodes `hhmmss[.sss]`, dropping the fractional seconds.
pub fn decode_time(raw: &str) -> Result<UtcTime, SentenceError> {
    let raw = raw.as_bytes();
    if raw.len() < 6 {
        return Err(SentenceError::InvalidTime);
    }
    let digits = |i: usize| two_digits(&raw[i..i + 2]).ok_or(SentenceError::InvalidTime);
    Ok(UtcTime {
        hour: digits(0)?,
        minute: digits(2)?,
        second: digits(4)?,
    })
}

/// Decodes `ddmmyy`.
///
/// The year is always expanded as `20yy`: there is no century inference, a receiver
/// reporting `94` ends up in 2094.
pub fn decode_date(raw: &str) -> Result<FixDate, SentenceError> {
    let raw = raw.as_bytes();
    if raw.len() != 6 {
        return Err(SentenceError::InvalidDate);
    }
    let digits = |i: usize| two_digits(&raw[i..i + 2]).ok_or(SentenceError::InvalidDate);
    Ok(FixDate {
        day: digits(0)?,
        month: digits(2)?,
        year: 2000 + u16::from(digits(4)?),
    })
}

pub fn decode_satellite_count(raw: &str) -> Result<u32, SentenceError> {
    // u32::from_str accepts a leading '+', a satellite count never has one
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SentenceError::InvalidCount);
    }
    raw.parse().map_err(|_| SentenceError::InvalidCount)
}

/// `A` means valid; `V` and everything else, including an empty field, means invalid.
pub fn decode_fix_validity(raw: &str) -> FixValidity {
    match raw {
        "A" => FixValidity::Valid,
        _ => FixValidity::Invalid,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-4, "{} != {}", a, b);
    }

    #[test]
    fn angle_latitude() {
        assert_close(decode_angle("4807.038", "N").unwrap(), 48.1173);
        assert_close(decode_angle("4807.038", "S").unwrap(), -48.1173);
    }

    #[test]
    fn angle_longitude() {
        assert_close(decode_angle("01131.000", "E").unwrap(), 11.516_666);
        assert_close(decode_angle("12311.12", "W").unwrap(), -123.185_333);
    }

    #[test]
    fn angle_failures() {
        assert_eq!(decode_angle("", "N"), Err(SentenceError::InvalidAngle));
        assert_eq!(decode_angle("4807.038", ""), Err(SentenceError::InvalidAngle));
        assert_eq!(decode_angle("48O7.038", "N"), Err(SentenceError::InvalidAngle));
        assert_eq!(decode_angle("inf", "N"), Err(SentenceError::InvalidAngle));
    }

    #[test]
    fn time() {
        let t = decode_time("123519").unwrap();
        assert_eq!(
            t,
            UtcTime {
                hour: 12,
                minute: 35,
                second: 19
            }
        );
        assert_eq!(decode_time("080023.000").unwrap(), decode_time("080023").unwrap());
        assert_eq!(decode_time("12351"), Err(SentenceError::InvalidTime));
        assert_eq!(decode_time(""), Err(SentenceError::InvalidTime));
        assert_eq!(decode_time("12:519"), Err(SentenceError::InvalidTime));
    }

    #[test]
    fn date() {
        let d = decode_date("230394").unwrap();
        assert_eq!(
            d,
            FixDate {
                day: 23,
                month: 3,
                year: 2094
            }
        );
        assert_eq!(decode_date("23039"), Err(SentenceError::InvalidDate));
        assert_eq!(decode_date("2303940"), Err(SentenceError::InvalidDate));
        assert_eq!(decode_date("23-394"), Err(SentenceError::InvalidDate));
    }

    #[test]
    fn satellites() {
        assert_eq!(decode_satellite_count("08"), Ok(8));
        assert_eq!(decode_satellite_count("12"), Ok(12));
        assert_eq!(decode_satellite_count(""), Err(SentenceError::InvalidCount));
        assert_eq!(decode_satellite_count("+3"), Err(SentenceError::InvalidCount));
        assert_eq!(decode_satellite_count("-1"), Err(SentenceError::InvalidCount));
        assert_eq!(decode_satellite_count("x"), Err(SentenceError::InvalidCount));
    }

    #[test]
    fn validity() {
        assert_eq!(decode_fix_validity("A"), FixValidity::Valid);
        assert_eq!(decode_fix_validity("V"), FixValidity::Invalid);
        assert_eq!(decode_fix_validity(""), FixValidity::Invalid);
        assert_eq!(decode_fix_validity("AA"), FixValidity::Invalid);
    }

    #[test]
    fn chrono_conversion() {
        assert_eq!(
            decode_date("230394").unwrap().to_naive_date(),
            Ok(NaiveDate::from_ymd_opt(2094, 3, 23).unwrap())
        );
        assert_eq!(
            decode_date("310294").unwrap().to_naive_date(),
            Err(DateTimeError::InvalidDate)
        );
        assert_eq!(
            decode_time("256000").unwrap().to_naive_time(),
            Err(DateTimeError::InvalidTime)
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn display() {
        assert_eq!(decode_time("123519").unwrap().to_string(), "12:35:19 UTC");
        assert_eq!(decode_date("230394").unwrap().to_string(), "23-03-2094");
        assert_eq!(decode_date("010105").unwrap().to_string(), "01-01-2005");
    }
}
