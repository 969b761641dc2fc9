use core::fmt;

use crate::sentence::SentenceKind;

/// Errors that can occur while framing, tokenizing and decoding sentences.
///
/// None of these are fatal: a noisy serial line produces them all the time, and
/// [`FixMonitor`](crate::FixMonitor) absorbs and counts every one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceError {
    /// The line does not start with one of the accepted sentence prefixes, or is not text
    MalformedSentence,
    /// The sentence has fewer fields than its kind requires
    TooFewFields {
        kind: SentenceKind,
        expect: usize,
        got: usize,
    },
    InvalidAngle,
    InvalidTime,
    InvalidDate,
    InvalidCount,
    /// The line did not fit into the parser's buffer and was dropped
    LineTooLong { capacity: usize },
}

impl fmt::Display for SentenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceError::MalformedSentence => f.write_str("Malformed or unrecognized sentence"),
            SentenceError::TooFewFields { kind, expect, got } => write!(
                f,
                "Too few fields in {} sentence, expect at least {}, got {}",
                kind, expect, got
            ),
            SentenceError::InvalidAngle => f.write_str("Invalid latitude/longitude field"),
            SentenceError::InvalidTime => f.write_str("Invalid time field"),
            SentenceError::InvalidDate => f.write_str("Invalid date field"),
            SentenceError::InvalidCount => f.write_str("Invalid satellite count field"),
            SentenceError::LineTooLong { capacity } => {
                write!(f, "Line exceeds the buffer capacity of {} bytes", capacity)
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SentenceError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeError {
    InvalidDate,
    InvalidTime,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeError::InvalidDate => f.write_str("invalid date"),
            DateTimeError::InvalidTime => f.write_str("invalid time"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DateTimeError {}
