//! The line-level finite state machine: turns one raw line of bytes into a
//! sequence of [`Word`]s. Contains no I/O; the streaming driver in
//! [`crate::parser`] is the only caller.

use crate::errors::ParseError;
use crate::limits::ParserOptions;
use crate::value::{Value, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    AfterLetter,
    ReadingNumber,
    ReadingString,
    SemicolonComment,
    ParenComment,
    BlockDelete,
    ProgramMarker,
    SkippingUnknown,
}

const NUMBER_BYTES: fn(u8) -> bool = |c| {
    c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+' || c == b'e' || c == b'E'
};

/// Tokenizes one line (trailing `\n` already stripped by the driver) into
/// `words`, which the caller is expected to have cleared beforehand.
///
/// Returns `Ok(true)` if any words were produced, `Ok(false)` for a blank /
/// comment-only / block-delete / program-marker line, or `Err` on a parse
/// failure.
pub(crate) fn tokenize_line(
    line: &[u8],
    options: &ParserOptions,
    last_line_number: &mut Option<i64>,
    words: &mut Vec<Word>,
    string_scratch: &mut Vec<u8>,
) -> Result<bool, ParseError> {
    let body = if options.validate_checksum {
        verify_checksum(line)?
    } else {
        line
    };

    let mut state = State::Idle;
    let mut current_letter = 0u8;
    let mut value_start = 0usize;
    let mut i = 0usize;
    let n = body.len();

    while i < n {
        let c = body[i];
        match state {
            State::Idle => match c {
                b' ' | b'\t' | b'\r' => i += 1,
                b';' => {
                    state = State::SemicolonComment;
                    i += 1;
                }
                b'(' => {
                    state = State::ParenComment;
                    i += 1;
                }
                b'/' if i == 0 => {
                    state = State::BlockDelete;
                    i += 1;
                }
                b'%' => {
                    state = State::ProgramMarker;
                    i += 1;
                }
                _ if c.is_ascii_digit() => {
                    return Err(ParseError::unexpected_character(c));
                }
                _ if c.is_ascii_alphabetic() => {
                    if options.address_config.accepts(c) {
                        current_letter = options.address_config.normalize(c);
                        state = State::AfterLetter;
                    } else {
                        state = State::SkippingUnknown;
                    }
                    i += 1;
                }
                _ => {
                    if options.ignore_unknown_characters {
                        i += 1;
                    } else {
                        return Err(ParseError::unexpected_character(c));
                    }
                }
            },
            State::AfterLetter => {
                if c == b'"' && !options.support_quoted_strings {
                    // Quoted strings are off, so this '"' is just an unknown
                    // byte here, not the start of a value.
                    if options.ignore_unknown_characters {
                        i += 1;
                    } else {
                        return Err(ParseError::unexpected_character(c));
                    }
                } else if options.support_quoted_strings && c == b'"' {
                    string_scratch.clear();
                    state = State::ReadingString;
                    i += 1;
                } else {
                    value_start = i;
                    state = State::ReadingNumber;
                    // re-inspect c without advancing
                }
            }
            State::ReadingNumber => {
                if NUMBER_BYTES(c) {
                    i += 1;
                } else {
                    finalize_number(
                        body,
                        value_start,
                        i,
                        current_letter,
                        options,
                        last_line_number,
                        words,
                    )?;
                    state = State::Idle;
                    // re-inspect c without advancing
                }
            }
            State::ReadingString => {
                if c == b'"' {
                    if i + 1 < n && body[i + 1] == b'"' {
                        string_scratch.push(b'"');
                        i += 2;
                    } else {
                        let value = std::mem::take(string_scratch);
                        push_word(words, current_letter, Value::String(value), options)?;
                        state = State::Idle;
                        i += 1;
                    }
                } else {
                    string_scratch.push(c);
                    i += 1;
                }
            }
            State::SemicolonComment | State::BlockDelete | State::ProgramMarker => {
                i = n;
            }
            State::ParenComment => {
                if c == b')' {
                    state = State::Idle;
                }
                i += 1;
            }
            State::SkippingUnknown => {
                if c.is_ascii_alphanumeric() || c == b'.' || c == b'-' || c == b'+' {
                    i += 1;
                } else {
                    state = State::Idle;
                    // re-inspect c without advancing
                }
            }
        }
    }

    match state {
        State::ReadingNumber => {
            finalize_number(
                body,
                value_start,
                n,
                current_letter,
                options,
                last_line_number,
                words,
            )?;
        }
        State::ParenComment => {
            if options.strict_comments {
                return Err(ParseError::unclosed_comment());
            }
        }
        State::ReadingString => {
            return Err(ParseError::unclosed_string());
        }
        _ => {}
    }

    Ok(!words.is_empty())
}

fn finalize_number(
    body: &[u8],
    start: usize,
    end: usize,
    letter: u8,
    options: &ParserOptions,
    last_line_number: &mut Option<i64>,
    words: &mut Vec<Word>,
) -> Result<(), ParseError> {
    let text = &body[start..end];
    if text.is_empty() {
        return Err(ParseError::empty_value());
    }
    if text.contains(&b'e') || text.contains(&b'E') {
        return Err(ParseError::invalid_number(&String::from_utf8_lossy(text)));
    }
    let text_str =
        std::str::from_utf8(text).map_err(|_| ParseError::invalid_number("<non-utf8 bytes>"))?;
    let parsed: f64 = text_str
        .parse()
        .map_err(|_| ParseError::invalid_number(text_str))?;
    let value = options.float_precision.clamp(parsed);

    if matches!(letter, b'N' | b'n') && options.validate_line_numbers {
        if value < 0.0 || value.floor() != value {
            return Err(ParseError::invalid_line_number(format!(
                "line number '{text_str}' must be a non-negative integer"
            )));
        }
        let int_value = value as i64;
        if let Some(last) = *last_line_number {
            if int_value <= last {
                return Err(ParseError::invalid_line_number(format!(
                    "line number {int_value} does not exceed the previous {last}"
                )));
            }
        }
        *last_line_number = Some(int_value);
    }

    push_word(words, letter, Value::Float(value), options)
}

fn push_word(
    words: &mut Vec<Word>,
    letter: u8,
    value: Value,
    options: &ParserOptions,
) -> Result<(), ParseError> {
    if let Some(max) = options.limits.max_words_per_block {
        if words.len() >= max {
            return Err(ParseError::block_too_large(max));
        }
    }
    words.push(Word::new(letter, value));
    Ok(())
}

/// Strips and verifies a trailing `*<digits>` checksum, returning the prefix
/// to be tokenized. If there is no `*` in the line, returns the line as-is.
fn verify_checksum(line: &[u8]) -> Result<&[u8], ParseError> {
    let Some(star_idx) = line.iter().rposition(|&b| b == b'*') else {
        return Ok(line);
    };
    let prefix = &line[..star_idx];
    let xor = prefix.iter().fold(0u8, |acc, &b| acc ^ b);

    let digits_region = &line[star_idx + 1..];
    let digit_len = digits_region
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digit_len == 0 || digit_len > 3 {
        let text = String::from_utf8_lossy(&digits_region[..digit_len]);
        return Err(ParseError::invalid_checksum(&text));
    }
    let digit_text = std::str::from_utf8(&digits_region[..digit_len]).unwrap();
    let provided: u32 = digit_text
        .parse()
        .map_err(|_| ParseError::invalid_checksum(digit_text))?;
    if provided > 255 {
        return Err(ParseError::invalid_checksum(digit_text));
    }
    if provided as u8 != xor {
        return Err(ParseError::checksum_mismatch(provided as u8, xor));
    }
    Ok(prefix)
}
