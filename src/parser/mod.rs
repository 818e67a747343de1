//! The streaming driver: acquires lines from a buffered byte source, drives
//! the tokenizer over each one, and enforces the resource limits in
//! [`crate::limits::Limits`].

use std::fs::File;
use std::io::{self, BufRead, Cursor, Read};
use std::path::Path;

use memchr::memchr;

use crate::block::Block;
use crate::errors::ParseError;
use crate::limits::ParserOptions;
use crate::tokenizer::tokenize_line;
use crate::value::Word;

pub mod batch;

/// Default buffered-read capacity for every source (64 KiB).
pub(crate) const BUFSIZE: usize = 64 * 1024;

enum ReadOutcome {
    Eof,
    Line,
}

/// The streaming driver over a G-code byte source.
///
/// Mirrors an iterator: call [`Parser::next`] until it returns `None`. Each
/// `Ok` result is a [`Block`] borrowed from the parser's internal scratch and
/// valid only until the next call.
pub struct Parser<R: Read> {
    buf_reader: buffer_redux::BufReader<R>,
    options: ParserOptions,
    bytes_read: usize,
    line_number: u64,
    blocks_parsed: usize,
    last_line_number: Option<i64>,
    line_buffer: Vec<u8>,
    string_buffer: Vec<u8>,
    word_buffer: Vec<Word>,
    finished: bool,
}

impl<R: Read> Parser<R> {
    /// Creates a parser with default options and the default buffer capacity.
    pub fn new(reader: R) -> Self {
        Self::with_capacity_and_options(reader, BUFSIZE, ParserOptions::default())
    }

    /// Creates a parser with custom options and the default buffer capacity.
    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Self::with_capacity_and_options(reader, BUFSIZE, options)
    }

    /// Creates a parser with a given buffered-read capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self::with_capacity_and_options(reader, capacity, ParserOptions::default())
    }

    /// Creates a parser with both custom options and a custom buffer capacity.
    pub fn with_capacity_and_options(reader: R, capacity: usize, options: ParserOptions) -> Self {
        assert!(capacity >= 3, "buffer capacity must be at least 3 bytes");
        Self {
            buf_reader: buffer_redux::BufReader::with_capacity(capacity, reader),
            options,
            bytes_read: 0,
            line_number: 0,
            blocks_parsed: 0,
            last_line_number: None,
            line_buffer: Vec::new(),
            string_buffer: Vec::new(),
            word_buffer: Vec::new(),
            finished: false,
        }
    }

    /// Total bytes consumed from the source so far.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// The 1-based index of the most recently acquired source line.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Total blocks emitted so far.
    pub fn blocks_parsed(&self) -> usize {
        self.blocks_parsed
    }

    /// The options this parser was constructed with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Reads the next block, or `None` once the source is exhausted.
    ///
    /// Once this returns `Some(Err(_))`, the parser must be discarded: no
    /// further calls are guaranteed to behave sensibly.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<Block<'_>, ParseError>> {
        if self.finished {
            return None;
        }

        loop {
            self.word_buffer.clear();
            self.line_buffer.clear();

            match self.acquire_line() {
                Ok(ReadOutcome::Eof) => {
                    self.finished = true;
                    return None;
                }
                Ok(ReadOutcome::Line) => {}
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err.at_line(self.line_number)));
                }
            }

            let tokenized = tokenize_line(
                &self.line_buffer,
                &self.options,
                &mut self.last_line_number,
                &mut self.word_buffer,
                &mut self.string_buffer,
            );

            match tokenized {
                Ok(false) => continue,
                Ok(true) => {
                    self.blocks_parsed += 1;
                    if let Some(max) = self.options.limits.max_blocks {
                        if self.blocks_parsed > max {
                            self.finished = true;
                            return Some(Err(
                                ParseError::too_many_blocks(max).at_line(self.line_number)
                            ));
                        }
                    }
                    return Some(Ok(Block::new(&self.word_buffer, self.line_number)));
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err.at_line(self.line_number)));
                }
            }
        }
    }

    /// Reads one physical line into `self.line_buffer` (delimiter stripped),
    /// updating `bytes_read` / `line_number` accounting.
    fn acquire_line(&mut self) -> Result<ReadOutcome, ParseError> {
        if let Some(max) = self.options.limits.max_input_size {
            if self.bytes_read >= max {
                return Err(ParseError::input_too_large(max));
            }
        }

        let cap = self.options.limits.max_line_length;
        let mut delimited = false;

        loop {
            let available = self.buf_reader.fill_buf()?;
            if available.is_empty() {
                break;
            }
            match memchr(b'\n', available) {
                Some(pos) => {
                    let chunk_len = pos + 1;
                    Self::append_capped(&mut self.line_buffer, &available[..chunk_len], cap)?;
                    self.buf_reader.consume(chunk_len);
                    delimited = true;
                    break;
                }
                None => {
                    let chunk_len = available.len();
                    Self::append_capped(&mut self.line_buffer, available, cap)?;
                    self.buf_reader.consume(chunk_len);
                }
            }
        }

        if self.line_buffer.is_empty() {
            return Ok(ReadOutcome::Eof);
        }

        if delimited {
            // drop the trailing '\n'; a preceding '\r' is left for the
            // tokenizer to treat as whitespace.
            self.line_buffer.pop();
        }

        self.bytes_read += self.line_buffer.len() + usize::from(delimited);
        self.line_number += 1;
        if let Some(max_lines) = self.options.limits.max_lines {
            if self.line_number > max_lines {
                return Err(ParseError::too_many_lines(max_lines));
            }
        }

        Ok(ReadOutcome::Line)
    }

    fn append_capped(buffer: &mut Vec<u8>, chunk: &[u8], cap: Option<usize>) -> Result<(), ParseError> {
        if let Some(limit) = cap {
            if buffer.len() + chunk.len() > limit {
                return Err(ParseError::too_long_line(limit));
            }
        }
        buffer.try_reserve(chunk.len()).map_err(|_| ParseError::out_of_memory())?;
        buffer.extend_from_slice(chunk);
        Ok(())
    }
}

impl Parser<File> {
    /// Opens `path` and wraps it with default options.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        File::open(path).map(Self::new)
    }

    /// Opens `path` and wraps it with custom options.
    pub fn from_path_with_options<P: AsRef<Path>>(path: P, options: ParserOptions) -> io::Result<Self> {
        File::open(path).map(|f| Self::with_options(f, options))
    }
}

impl<'a> Parser<Cursor<&'a [u8]>> {
    /// Wraps a borrowed in-memory byte slice.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(Cursor::new(data))
    }

    /// Wraps a borrowed in-memory byte slice with custom options.
    pub fn from_slice_with_options(data: &'a [u8], options: ParserOptions) -> Self {
        Self::with_options(Cursor::new(data), options)
    }
}

impl Parser<Cursor<Vec<u8>>> {
    /// Wraps an owned in-memory byte buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::new(Cursor::new(data))
    }

    /// Wraps an owned in-memory byte buffer with custom options.
    pub fn from_bytes_with_options(data: Vec<u8>, options: ParserOptions) -> Self {
        Self::with_options(Cursor::new(data), options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ParseErrorKind;
    use crate::limits::Limits;
    use crate::value::Value;

    fn words_of(block: &Block<'_>) -> Vec<(u8, Value)> {
        block
            .words()
            .iter()
            .map(|w| (w.letter, w.value.clone()))
            .collect()
    }

    #[test]
    fn basic_stream() {
        let mut parser = Parser::from_slice(b"G1 X1.0 Y-2 Z0\n");
        let block = parser.next().unwrap().unwrap();
        assert_eq!(block.line_number(), 1);
        assert_eq!(
            words_of(&block),
            vec![
                (b'G', Value::Float(1.0)),
                (b'X', Value::Float(1.0)),
                (b'Y', Value::Float(-2.0)),
                (b'Z', Value::Float(0.0)),
            ]
        );
        assert!(parser.next().is_none());
    }

    #[test]
    fn mixed_line_endings_advance_line_numbers() {
        let mut parser = Parser::from_slice(b"G1 X1\r\nG1 X2\nG1 X3\r");
        let mut line_numbers = Vec::new();
        while let Some(block) = parser.next() {
            let block = block.unwrap();
            line_numbers.push(block.line_number());
            assert_eq!(block.words().len(), 2);
        }
        assert_eq!(line_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn line_number_validation_fails_stream() {
        let mut parser = Parser::from_slice(b"N10 G1\nN5 G1\n");
        assert!(parser.next().unwrap().is_ok());
        let err = parser.next().unwrap().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLineNumber);
    }

    #[test]
    fn strict_comments_toggle_changes_where_blocks_start() {
        let mut opts = ParserOptions::default();
        opts.strict_comments = false;
        let mut parser = Parser::from_slice_with_options(b"(unclosed\nG1 X1\n", opts);
        let block = parser.next().unwrap().unwrap();
        assert_eq!(block.line_number(), 2);
        assert_eq!(block.words().len(), 2);
        assert!(parser.next().is_none());

        let mut strict = Parser::from_slice(b"(unclosed\nG1 X1\n");
        let err = strict.next().unwrap().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedComment);
    }

    #[test]
    fn only_whitespace_and_comments_yields_no_blocks() {
        let mut parser = Parser::from_slice(b"   \n; comment\n(paren)\n/skip delete\n%\n\n");
        assert!(parser.next().is_none());
    }

    #[test]
    fn input_too_large_fails_on_the_crossing_call() {
        let mut opts = ParserOptions::default();
        opts.limits = Limits {
            max_input_size: Some(10),
            ..Limits::unbounded()
        };
        let mut parser = Parser::from_slice_with_options(b"G1 X1\nG1 X2\nG1 X3\n", opts);
        loop {
            match parser.next() {
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    assert_eq!(e.kind, ParseErrorKind::InputTooLarge);
                    break;
                }
                None => panic!("expected InputTooLarge before EOF"),
            }
        }
    }

    #[test]
    fn line_at_exactly_the_cap_with_newline_succeeds_one_byte_more_fails() {
        let mut opts = ParserOptions::default();
        opts.limits = Limits {
            max_line_length: Some(6),
            ..Limits::unbounded()
        };
        let ok_line = b"X1   \n".to_vec(); // 6 bytes total including the newline
        let mut parser = Parser::from_slice_with_options(&ok_line, opts.clone());
        assert!(parser.next().unwrap().is_ok());

        let too_long = b"X1    \n".to_vec(); // 7 bytes total including the newline
        let mut parser = Parser::from_slice_with_options(&too_long, opts);
        let err = parser.next().unwrap().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooLongLine);
    }

    #[test]
    fn block_scratch_is_reused_not_reallocated() {
        let mut parser = Parser::from_slice(b"X1\nY2\n");
        let first_ptr = parser.next().unwrap().unwrap().words().as_ptr();
        let second_ptr = parser.next().unwrap().unwrap().words().as_ptr();
        assert_eq!(first_ptr, second_ptr);
    }

    #[test]
    fn to_owned_block_survives_past_the_next_call() {
        let mut parser = Parser::from_slice(b"P\"hi\"\nX1\n");
        let owned = parser.next().unwrap().unwrap().to_owned_block();
        let _ = parser.next().unwrap().unwrap();
        assert_eq!(owned.words[0].value, Value::String(b"hi".to_vec()));
    }

    #[test]
    fn file_source_round_trips() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "G1 X1\nG1 X2\n").unwrap();
        let mut parser = Parser::from_path(file.path()).unwrap();
        let mut count = 0;
        while let Some(block) = parser.next() {
            block.unwrap();
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn externally_owned_reader_is_not_consumed_by_constructor() {
        let data = b"G1 X1\n".to_vec();
        let cursor = Cursor::new(data.as_slice());
        let mut parser = Parser::new(cursor);
        assert!(parser.next().unwrap().is_ok());
    }
}
