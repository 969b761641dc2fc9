#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::{constants::NMEA_END_CHAR_2, error::SentenceError, sentence::RawSentence};

mod buffer;

pub use buffer::{FixedBuffer, FixedLinearBuffer, UnderlyingBuffer};

/// Streaming line parser with buffer. The default constructor will build a parser
/// containing a Vec, but you can pass your own underlying buffer by passing it to
/// Parser::new(). The Vec grows up to [`MAX_VEC_LINE_LENGTH`](crate::MAX_VEC_LINE_LENGTH);
/// for a serial port a [`FixedBuffer`] of
/// [`DEFAULT_LINE_CAPACITY`](crate::DEFAULT_LINE_CAPACITY) is the tighter choice.
///
/// Bytes are accumulated until a `\n` arrives, then the line is tokenized into a
/// [`RawSentence`]. A line that does not fit into the buffer is reported once as
/// [`SentenceError::LineTooLong`] and skipped up to its end.
pub struct Parser<T>
where
    T: UnderlyingBuffer,
{
    buf: T,
    overflowed: bool,
}

#[cfg(feature = "alloc")]
impl core::default::Default for Parser<Vec<u8>> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: UnderlyingBuffer> Parser<T> {
    pub fn new(underlying: T) -> Self {
        Self {
            buf: underlying,
            overflowed: false,
        }
    }

    pub fn is_buffer_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes of a partial line currently held
    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    pub fn consume<'a>(&'a mut self, new_data: &'a [u8]) -> ParserIter<'a, T> {
        ParserIter {
            parser: self,
            data: new_data,
            line_ready: false,
        }
    }
}

/// Iterator over the complete lines of the data passed to [`Parser::consume`]
pub struct ParserIter<'a, T: UnderlyingBuffer> {
    parser: &'a mut Parser<T>,
    data: &'a [u8],
    line_ready: bool,
}

impl<T: UnderlyingBuffer> ParserIter<'_, T> {
    /// Buffers the next chunk of line content. Returns `Some(true)` once a line is
    /// complete, `Some(false)` if the line was dropped, `None` when out of data.
    fn fill_line(&mut self) -> Option<Result<bool, SentenceError>> {
        let parser = &mut *self.parser;
        let (chunk, complete) = match self.data.iter().position(|&b| b == NMEA_END_CHAR_2) {
            Some(end) => {
                let chunk = &self.data[..end];
                self.data = &self.data[end + 1..];
                (chunk, true)
            },
            None => {
                let chunk = self.data;
                self.data = &[];
                (chunk, false)
            },
        };

        if parser.overflowed {
            if complete {
                parser.overflowed = false;
                parser.buf.clear();
                return Some(Ok(false));
            }
            return None;
        }

        let lost = parser.buf.extend_from_slice(chunk);
        if lost > 0 {
            log::warn!(
                "Dropping line longer than {} bytes",
                parser.buf.max_capacity()
            );
            parser.buf.clear();
            parser.overflowed = !complete;
            return Some(Err(SentenceError::LineTooLong {
                capacity: parser.buf.max_capacity(),
            }));
        }

        if complete {
            Some(Ok(true))
        } else {
            None
        }
    }

    #[allow(clippy::should_implement_trait)]
    /// Analog of `core::iter::Iterator::next`, should be switched to
    /// trait implementation after merge of `<https://github.com/rust-lang/rust/issues/44265>`
    pub fn next(&mut self) -> Option<Result<RawSentence<'_>, SentenceError>> {
        if self.line_ready {
            self.parser.buf.clear();
            self.line_ready = false;
        }

        while !self.data.is_empty() {
            match self.fill_line()? {
                Ok(true) => {
                    let len = self.parser.buf.len();
                    if self.parser.buf[0..len].iter().all(u8::is_ascii_whitespace) {
                        self.parser.buf.clear();
                        continue;
                    }
                    self.line_ready = true;
                    return Some(RawSentence::parse(&self.parser.buf[0..len]));
                },
                Ok(false) => {},
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

impl<T: UnderlyingBuffer> Drop for ParserIter<'_, T> {
    fn drop(&mut self) {
        // The last line handed out must not prefix the next one
        if self.line_ready {
            self.parser.buf.clear();
        }
    }
}
