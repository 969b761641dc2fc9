//! # nmea_fix
//!
//! This project turns the line-oriented NMEA output of a GNSS receiver into a single,
//! coherent "current fix" that degrades gracefully when the receiver goes quiet.
//!
//! Only three sentence families are understood, each from the `GP` (GPS) or `GN`
//! (multi-constellation) talker:
//!
//! * `RMC` carries time, date and position,
//! * `GLL` carries time and position,
//! * `GGA` is read for its satellite count.
//!
//! Anything else on the line is noise, and noise is expected: every malformed,
//! truncated or unknown line is absorbed and counted, never escalated.
//!
//! Parsing Sentences
//! =================
//!
//! Raw bytes from the serial port go into a `Parser`, which stitches them into lines and
//! hands back an iterator-like object over the tokenized sentences:
//! ```
//! # #[cfg(any(feature = "alloc", feature = "std"))] {
//! use nmea_fix::{classify, Parser};
//!
//! let mut parser = Parser::default();
//! let my_raw_data = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
//! let mut it = parser.consume(my_raw_data);
//! loop {
//!     match it.next() {
//!         Some(Ok(sentence)) => {
//!             let update = classify(&sentence).unwrap();
//!             assert_eq!(update.satellite_count, Some(8));
//!         }
//!         Some(Err(_)) => {
//!             // A line that is not one of ours
//!         }
//!         None => {
//!             // The internal buffer now only holds a partial line, if any
//!             break;
//!         }
//!     }
//! }
//! # }
//! ```
//!
//! Tracking the Fix
//! ================
//!
//! Most users want the whole pipeline at once. A `FixMonitor` owns the parser, the
//! `FixState` and the scheduler that drives decay, rendering and the heartbeat:
//! ```
//! use nmea_fix::{FixMonitor, FixedBuffer, Mode, MonitorConfig, Tick};
//!
//! let mut monitor = FixMonitor::new(FixedBuffer::<128>::new(), MonitorConfig::default(), Tick::ZERO);
//! monitor.feed(
//!     b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n\
//!       $GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n",
//!     Tick::from_millis(10),
//! );
//!
//! let snapshot = monitor.snapshot();
//! assert_eq!(snapshot.mode, Mode::Fixed);
//! assert_eq!(snapshot.state.satellite_count(), 8);
//! ```
//!
//! no_std Support
//! ==============
//!
//! Without the `std` and `alloc` features the crate is `no_std` and never allocates. Use a
//! `FixedBuffer` or a `FixedLinearBuffer` as line storage:
//! ```
//! let mut buf = [0; 96];
//! let buf = nmea_fix::FixedLinearBuffer::new(&mut buf[..]);
//! let mut parser = nmea_fix::Parser::new(buf);
//! ```
//! The buffer must be able to hold one complete line; 82 bytes is the longest sentence
//! the NMEA 0183 standard allows.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    constants::*,
    error::{DateTimeError, SentenceError},
    fields::{
        decode_angle, decode_date, decode_fix_validity, decode_satellite_count, decode_time,
        FixDate, FixValidity, UtcTime,
    },
    liveness::{DecayPolicy, Heartbeat, Mode},
    monitor::{Diagnostics, DisplaySink, FixMonitor, MonitorConfig, Snapshot, StatusIndicator},
    parser::{FixedBuffer, FixedLinearBuffer, Parser, ParserIter, UnderlyingBuffer},
    scheduler::{Clock, Due, Interval, Scheduler, Tick},
    sentence::{RawSentence, SentenceKind, Talker},
    state::{reconcile, FixState, UpdatedFields},
    update::{classify, PartialFixUpdate, Position},
};

#[cfg(feature = "std")]
pub use crate::{monitor::Shutdown, scheduler::MonotonicClock};

mod constants;
mod error;
mod fields;
mod liveness;
mod monitor;
mod parser;
mod scheduler;
mod sentence;
mod state;
mod update;
