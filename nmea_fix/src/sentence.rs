use core::fmt;

use crate::{
    constants::{NMEA_CHECKSUM_DELIMITER, NMEA_FIELD_DELIMITER, NMEA_PREFIX_LEN},
    error::SentenceError,
};

/// Talker identifier, the two characters after `$`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Talker {
    /// `GP`, GPS only
    Gps,
    /// `GN`, combined GNSS solution
    Gnss,
}

/// The sentence kinds this crate understands
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentenceKind {
    /// Recommended minimum data: time, validity, position, date
    Rmc,
    /// Geographic position: position, time, validity
    Gll,
    /// Fix data, only read for the number of satellites in use
    Gga,
}

impl SentenceKind {
    /// Minimum number of fields, counting the address field, a sentence of this
    /// kind must have before it is worth decoding.
    pub const fn min_fields(self) -> usize {
        match self {
            SentenceKind::Rmc => 10,
            SentenceKind::Gll => 7,
            SentenceKind::Gga => 8,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SentenceKind::Rmc => "RMC",
            SentenceKind::Gll => "GLL",
            SentenceKind::Gga => "GGA",
        }
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn match_prefix(prefix: &[u8]) -> Option<(Talker, SentenceKind)> {
    match prefix {
        b"$GPRMC" => Some((Talker::Gps, SentenceKind::Rmc)),
        b"$GNRMC" => Some((Talker::Gnss, SentenceKind::Rmc)),
        b"$GPGLL" => Some((Talker::Gps, SentenceKind::Gll)),
        b"$GNGLL" => Some((Talker::Gnss, SentenceKind::Gll)),
        b"$GPGGA" => Some((Talker::Gps, SentenceKind::Gga)),
        b"$GNGGA" => Some((Talker::Gnss, SentenceKind::Gga)),
        _ => None,
    }
}

/// A tokenized sentence borrowing from the line it was parsed from.
///
/// Field `0` is the address field (`$GPRMC`), so indices follow the numbering used in
/// receiver manuals. Field counts are not checked here, see
/// [`SentenceKind::min_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSentence<'a> {
    talker: Talker,
    kind: SentenceKind,
    body: &'a str,
    len: usize,
}

impl<'a> RawSentence<'a> {
    /// Tokenizes one line. Surrounding whitespace and line terminators are ignored, and
    /// a `*hh` checksum suffix is cut off without being verified.
    pub fn parse(line: &'a [u8]) -> Result<Self, SentenceError> {
        let line = core::str::from_utf8(line)
            .map_err(|_| SentenceError::MalformedSentence)?
            .trim();

        let (talker, kind) = line
            .as_bytes()
            .get(..NMEA_PREFIX_LEN)
            .and_then(match_prefix)
            .ok_or(SentenceError::MalformedSentence)?;

        let body = match line.rfind(NMEA_CHECKSUM_DELIMITER) {
            Some(pos) => &line[..pos],
            None => line,
        };
        let len = body.split(NMEA_FIELD_DELIMITER).count();

        Ok(Self {
            talker,
            kind,
            body,
            len,
        })
    }

    pub fn talker(&self) -> Talker {
        self.talker
    }

    pub fn kind(&self) -> SentenceKind {
        self.kind
    }

    /// Number of fields, the address field included
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, a sentence has at least its address field
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields().nth(index)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.body.split(NMEA_FIELD_DELIMITER)
    }

    /// Fails with [`SentenceError::TooFewFields`] unless the sentence has at least
    /// [`SentenceKind::min_fields`] fields.
    pub fn check_arity(&self) -> Result<(), SentenceError> {
        let expect = self.kind.min_fields();
        if self.len < expect {
            return Err(SentenceError::TooFewFields {
                kind: self.kind,
                expect,
                got: self.len,
            });
        }
        Ok(())
    }
}
