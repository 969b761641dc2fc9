use crate::{
    error::SentenceError,
    fields::{
        decode_angle, decode_date, decode_fix_validity, decode_satellite_count, decode_time,
        FixDate, FixValidity, UtcTime,
    },
    sentence::{RawSentence, SentenceKind},
    state::UpdatedFields,
};

/// A world position in signed decimal degrees.
///
/// Latitude and longitude always travel together, so a fix can never end up with the
/// latitude of one sentence and the longitude of another.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees, negative south of the equator
    pub lat: f64,

    /// Longitude in degrees, negative west of Greenwich
    pub lon: f64,
}

/// The fields one sentence contributes to the fix. Anything left `None` is kept as it is
/// in the [`FixState`](crate::FixState).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialFixUpdate {
    pub time_of_day: Option<UtcTime>,
    pub date: Option<FixDate>,
    pub position: Option<Position>,
    pub satellite_count: Option<u32>,
    /// Validity flag of RMC and GLL, `None` for GGA. Informational only: an invalid
    /// sentence already carries no other field, so [`PartialFixUpdate::fields`] and the
    /// reconciler never look at it.
    pub fix_validity: Option<FixValidity>,
}

impl PartialFixUpdate {
    pub const fn empty() -> Self {
        Self {
            time_of_day: None,
            date: None,
            position: None,
            satellite_count: None,
            fix_validity: None,
        }
    }

    /// What a sentence flagged as "no fix" contributes
    pub const fn no_fix() -> Self {
        Self {
            fix_validity: Some(FixValidity::Invalid),
            ..Self::empty()
        }
    }

    /// True when applying this update would change nothing
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn fields(&self) -> UpdatedFields {
        let mut fields = UpdatedFields::empty();
        fields.set(UpdatedFields::TIME, self.time_of_day.is_some());
        fields.set(UpdatedFields::DATE, self.date.is_some());
        fields.set(UpdatedFields::POSITION, self.position.is_some());
        fields.set(UpdatedFields::SATELLITES, self.satellite_count.is_some());
        fields
    }
}

/// Turns a tokenized sentence into the update it carries.
///
/// A sentence whose validity flag says "no fix" gives an empty update rather than an
/// error, so that it can never wipe out the last good fix. Any decode failure rejects the
/// whole sentence: a half-decoded position is never returned.
pub fn classify(sentence: &RawSentence<'_>) -> Result<PartialFixUpdate, SentenceError> {
    sentence.check_arity()?;
    match sentence.kind() {
        SentenceKind::Rmc => classify_rmc(sentence),
        SentenceKind::Gll => classify_gll(sentence),
        SentenceKind::Gga => classify_gga(sentence),
    }
}

fn field<'a>(sentence: &RawSentence<'a>, index: usize) -> &'a str {
    // Arity has been checked, a missing field is only possible in hand-built sentences
    sentence.field(index).unwrap_or_default()
}

fn decode_position(
    sentence: &RawSentence<'_>,
    lat: usize,
    lon: usize,
) -> Result<Position, SentenceError> {
    Ok(Position {
        lat: decode_angle(field(sentence, lat), field(sentence, lat + 1))?,
        lon: decode_angle(field(sentence, lon), field(sentence, lon + 1))?,
    })
}

// $GPRMC,hhmmss.ss,A,llll.ll,a,yyyyy.yy,a,x.x,x.x,ddmmyy,x.x,a*hh
fn classify_rmc(sentence: &RawSentence<'_>) -> Result<PartialFixUpdate, SentenceError> {
    if decode_fix_validity(field(sentence, 2)) == FixValidity::Invalid {
        return Ok(PartialFixUpdate::no_fix());
    }

    let date = decode_date(field(sentence, 9))?;
    let time_of_day = decode_time(field(sentence, 1))?;
    let position = decode_position(sentence, 3, 5)?;

    Ok(PartialFixUpdate {
        time_of_day: Some(time_of_day),
        date: Some(date),
        position: Some(position),
        fix_validity: Some(FixValidity::Valid),
        ..PartialFixUpdate::empty()
    })
}

// $GPGLL,llll.ll,a,yyyyy.yy,a,hhmmss.ss,A*hh
fn classify_gll(sentence: &RawSentence<'_>) -> Result<PartialFixUpdate, SentenceError> {
    if decode_fix_validity(field(sentence, 6)) == FixValidity::Invalid {
        return Ok(PartialFixUpdate::no_fix());
    }

    let time_of_day = decode_time(field(sentence, 5))?;
    let position = decode_position(sentence, 1, 3)?;

    Ok(PartialFixUpdate {
        time_of_day: Some(time_of_day),
        position: Some(position),
        fix_validity: Some(FixValidity::Valid),
        ..PartialFixUpdate::empty()
    })
}

// $GPGGA,hhmmss.ss,llll.ll,a,yyyyy.yy,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh
fn classify_gga(sentence: &RawSentence<'_>) -> Result<PartialFixUpdate, SentenceError> {
    let satellite_count = decode_satellite_count(field(sentence, 7))?;
    Ok(PartialFixUpdate {
        satellite_count: Some(satellite_count),
        ..PartialFixUpdate::empty()
    })
}
