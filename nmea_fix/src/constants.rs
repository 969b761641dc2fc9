pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)
pub const NMEA_FIELD_DELIMITER: char = ',';
pub const NMEA_CHECKSUM_DELIMITER: char = '*';

/// Maximum sentence length allowed by NMEA 0183, terminators included
pub const NMEA_MAX_SENTENCE_LENGTH: usize = 82;

/// Line buffer size used by [`FixMonitor`](crate::FixMonitor) users who have no better idea.
/// Some receivers exceed [`NMEA_MAX_SENTENCE_LENGTH`], so leave them some slack.
pub const DEFAULT_LINE_CAPACITY: usize = 128;

/// Longest line a `Vec<u8>` line buffer grows to. Keeps a stream without line
/// terminators from eating the heap.
pub const MAX_VEC_LINE_LENGTH: usize = 1024;

pub(crate) const NMEA_PREFIX_LEN: usize = 6; // sync (1) + talker (2) + sentence type (3)
