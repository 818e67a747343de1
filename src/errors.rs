//! The errors this crate can return; only when parsing a G-code stream

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// The type of error that occurred during parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A numeric value had an empty body, e.g. a bare `X` with nothing after it
    EmptyValue,
    /// A numeric literal could not be parsed (or used scientific notation)
    InvalidNumber,
    /// A `(` comment was never closed and `strict_comments` is on
    UnclosedComment,
    /// A `"..."` string was never closed before end of line
    UnclosedString,
    /// A byte was encountered that `ignore_unknown_characters` does not allow
    UnexpectedCharacter,
    /// A buffer could not be grown to hold more data
    OutOfMemory,
    /// `Limits::max_input_size` would be exceeded
    InputTooLarge,
    /// The underlying byte source returned an I/O error
    IoFailure,
    /// `Limits::max_blocks` would be exceeded
    TooManyBlocks,
    /// `Limits::max_lines` would be exceeded
    TooManyLines,
    /// `Limits::max_line_length` was exceeded before a newline was found
    TooLongLine,
    /// `Limits::max_words_per_block` was exceeded
    BlockTooLarge,
    /// The checksum following `*` did not match the computed XOR
    ChecksumMismatch,
    /// The digits following `*` were missing, non-numeric, or too long
    InvalidChecksum,
    /// An `N` word was negative, non-integral, or not strictly increasing
    InvalidLineNumber,
    /// `AddressConfig` was constructed with an empty letter set
    EmptyLetterSet,
    /// `AddressConfig` was constructed with a non-ASCII-alphabetic byte
    NonAsciiLetter,
}

/// The only error type this crate returns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// A description of what went wrong
    pub msg: String,
    /// The type of error that occurred
    pub kind: ParseErrorKind,
    /// 1-based line number being tokenized when the error occurred, if any
    pub line_number: Option<u64>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line_number: None,
        }
    }

    pub(crate) fn at_line(mut self, line_number: u64) -> Self {
        self.line_number = Some(line_number);
        self
    }

    pub fn empty_value() -> Self {
        Self::new(ParseErrorKind::EmptyValue, "word has an empty value")
    }

    pub fn invalid_number(text: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidNumber,
            format!("'{text}' is not a valid number"),
        )
    }

    pub fn unclosed_comment() -> Self {
        Self::new(ParseErrorKind::UnclosedComment, "unclosed '(' comment")
    }

    pub fn unclosed_string() -> Self {
        Self::new(ParseErrorKind::UnclosedString, "unclosed '\"' string")
    }

    pub fn unexpected_character(byte: u8) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedCharacter,
            format!("unexpected character '{}'", (byte as char).escape_default()),
        )
    }

    pub fn out_of_memory() -> Self {
        Self::new(ParseErrorKind::OutOfMemory, "failed to allocate scratch buffer")
    }

    pub fn input_too_large(limit: usize) -> Self {
        Self::new(
            ParseErrorKind::InputTooLarge,
            format!("input exceeded the {limit}-byte limit"),
        )
    }

    pub fn too_many_blocks(limit: usize) -> Self {
        Self::new(
            ParseErrorKind::TooManyBlocks,
            format!("more than {limit} blocks were emitted"),
        )
    }

    pub fn too_many_lines(limit: u64) -> Self {
        Self::new(
            ParseErrorKind::TooManyLines,
            format!("more than {limit} lines were read"),
        )
    }

    pub fn too_long_line(limit: usize) -> Self {
        Self::new(
            ParseErrorKind::TooLongLine,
            format!("line exceeded the {limit}-byte limit before a newline was found"),
        )
    }

    pub fn block_too_large(limit: usize) -> Self {
        Self::new(
            ParseErrorKind::BlockTooLarge,
            format!("block has more than {limit} words"),
        )
    }

    pub fn checksum_mismatch(expected: u8, computed: u8) -> Self {
        Self::new(
            ParseErrorKind::ChecksumMismatch,
            format!("checksum mismatch: expected {expected}, computed {computed}"),
        )
    }

    pub fn invalid_checksum(text: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidChecksum,
            format!("'{text}' is not a valid 1-3 digit checksum"),
        )
    }

    pub fn invalid_line_number(msg: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::InvalidLineNumber, msg)
    }

    pub fn empty_letter_set() -> Self {
        Self::new(
            ParseErrorKind::EmptyLetterSet,
            "AddressConfig requires at least one letter",
        )
    }

    pub fn non_ascii_letter(byte: u8) -> Self {
        Self::new(
            ParseErrorKind::NonAsciiLetter,
            format!("'{}' is not an ASCII letter", (byte as char).escape_default()),
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)?;
        if let Some(line) = self.line_number {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        Self {
            msg: err.to_string(),
            kind: ParseErrorKind::IoFailure,
            line_number: None,
        }
    }
}

impl StdError for ParseError {
    fn cause(&self) -> Option<&dyn StdError> {
        // We don't keep the underlying io::Error around so that ParseError
        // stays Clone + PartialEq.
        None
    }
}
