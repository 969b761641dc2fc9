#![cfg(feature = "alloc")]

use nmea_fix::{
    classify, FixValidity, Parser, ParserIter, PartialFixUpdate, SentenceError, SentenceKind,
    Talker, MAX_VEC_LINE_LENGTH,
};

macro_rules! my_vec {
    ($($x:expr),*) => {{
        let v: Vec<Result<(Talker, SentenceKind), SentenceError>> = vec![$($x),*];
        v
    }};
}

fn extract_addresses<T: nmea_fix::UnderlyingBuffer>(
    mut it: ParserIter<T>,
) -> Vec<Result<(Talker, SentenceKind), SentenceError>> {
    let mut ret = vec![];
    while let Some(sentence) = it.next() {
        ret.push(sentence.map(|s| (s.talker(), s.kind())));
    }
    ret
}

fn classify_line(line: &str) -> Result<PartialFixUpdate, SentenceError> {
    let mut parser = Parser::default();
    let mut it = parser.consume(line.as_bytes());
    let res = match it.next() {
        Some(sentence) => sentence.and_then(|s| classify(&s)),
        None => panic!("no complete line in {:?}", line),
    };
    res
}

static GNRMC: &str = "$GNRMC,001031.00,A,4404.13993,N,12118.86023,W,0.146,,100117,,,A*7B\r\n";

#[test]
fn test_parse_empty_buffer() {
    let mut parser = Parser::default();
    assert!(parser.is_buffer_empty());
    assert_eq!(my_vec![], extract_addresses(parser.consume(&[])));
    assert!(parser.is_buffer_empty());
}

#[test]
fn test_parse_in_one_go() {
    let mut parser = Parser::default();
    assert_eq!(
        my_vec![Ok((Talker::Gnss, SentenceKind::Rmc))],
        extract_addresses(parser.consume(GNRMC.as_bytes())),
    );
    assert!(parser.is_buffer_empty());
}

#[test]
fn test_vec_buffer_is_bounded_on_noise() {
    let mut parser = Parser::default();
    let noise = [b'x'; 700];
    for _ in 0..10 {
        let mut it = parser.consume(&noise);
        while it.next().is_some() {}
    }
    assert!(parser.buffer_len() <= MAX_VEC_LINE_LENGTH);

    assert_eq!(
        my_vec![Ok((Talker::Gnss, SentenceKind::Rmc))],
        extract_addresses(parser.consume(format!("\n{}", GNRMC).as_bytes())),
    );
    assert!(parser.is_buffer_empty());
}

#[test]
fn test_parse_unknown_sentences() {
    let data = "$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n\
                $GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39\r\n\
                $GNGGA,001043.00,4404.14036,N,12118.85961,W,1,12,0.98,1113.0,M,-21.3,M,,*47\r\n\
                \r\n\
                $GPGLL\r\n";
    let mut parser = Parser::default();
    assert_eq!(
        my_vec![
            Err(SentenceError::MalformedSentence),
            Err(SentenceError::MalformedSentence),
            Ok((Talker::Gnss, SentenceKind::Gga)),
            Ok((Talker::Gps, SentenceKind::Gll))
        ],
        extract_addresses(parser.consume(data.as_bytes())),
    );
}

#[test]
fn test_non_utf8_line() {
    let mut parser = Parser::default();
    assert_eq!(
        my_vec![
            Err(SentenceError::MalformedSentence),
            Ok((Talker::Gps, SentenceKind::Gga))
        ],
        extract_addresses(parser.consume(b"$GPRMC,\xff\xfe,A\r\n$GPGGA,1,2,3,4,5,6,7\n")),
    );
}

#[test]
fn test_classify_gnss_talker() {
    let update = classify_line(GNRMC).unwrap();
    assert_eq!(update.fix_validity, Some(FixValidity::Valid));
    assert_eq!(update.date.unwrap().to_string(), "10-01-2017");
    assert_eq!(update.time_of_day.unwrap().to_string(), "00:10:31 UTC");
    let position = update.position.unwrap();
    assert!((position.lat - 44.068_998).abs() < 1e-5);
    assert!((position.lon + 121.314_337).abs() < 1e-5);
    assert_eq!(update.satellite_count, None);
}

#[test]
fn test_classify_too_few_fields() {
    assert_eq!(
        classify_line("$GPRMC,123519,A,4807.038,N\r\n"),
        Err(SentenceError::TooFewFields {
            kind: SentenceKind::Rmc,
            expect: 10,
            got: 5
        })
    );
    assert_eq!(
        classify_line("$GPGLL,4916.45,N,12311.12,W\n"),
        Err(SentenceError::TooFewFields {
            kind: SentenceKind::Gll,
            expect: 7,
            got: 5
        })
    );
    assert_eq!(
        classify_line("$GPGGA,123519,4807.038,N,01131.000,E,1\n"),
        Err(SentenceError::TooFewFields {
            kind: SentenceKind::Gga,
            expect: 8,
            got: 7
        })
    );
}

#[test]
fn test_classify_decode_failures() {
    assert_eq!(
        classify_line("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,2303,003.1,W*6A\n"),
        Err(SentenceError::InvalidDate)
    );
    assert_eq!(
        classify_line("$GPRMC,12h519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\n"),
        Err(SentenceError::InvalidTime)
    );
    assert_eq!(
        classify_line("$GPGLL,4916.45,N,,W,225444,A\n"),
        Err(SentenceError::InvalidAngle)
    );
    assert_eq!(
        classify_line("$GPGGA,123519,4807.038,N,01131.000,E,1,,0.9\n"),
        Err(SentenceError::InvalidCount)
    );
    assert_eq!(
        classify_line("$GPGGA,123519,4807.038,N,01131.000,E,1,-3,0.9\n"),
        Err(SentenceError::InvalidCount)
    );
}

#[test]
fn test_gga_with_no_fix_still_counts_satellites() {
    let update = classify_line("$GPGGA,,,,,,0,00,99.99,,,,,,*48\n").unwrap();
    assert_eq!(update.satellite_count, Some(0));
    assert_eq!(update.position, None);
}
