//! Draining a [`Parser`] into one contiguous, fully-owned buffer.
//!
//! Useful when a caller wants every block from a source at once rather than
//! walking the streaming iterator, at the cost of holding the whole parsed
//! result in memory.

use std::io::Read;

use crate::errors::ParseError;
use crate::parser::Parser;
use crate::value::Word;

/// Where one block's words live within [`ParseResult::words`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedBlockHeader {
    pub start: usize,
    pub len: usize,
    pub line_number: u64,
}

/// The fully-materialized output of draining a [`Parser`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub headers: Vec<OwnedBlockHeader>,
    pub words: Vec<Word>,
}

impl ParseResult {
    /// Number of blocks collected.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The words belonging to block `index`, in source order.
    pub fn block_words(&self, index: usize) -> &[Word] {
        let header = &self.headers[index];
        &self.words[header.start..header.start + header.len]
    }
}

/// Drains a [`Parser`] into a single [`ParseResult`].
///
/// On error the parser's already-emitted blocks are discarded along with the
/// partially filled buffers: they go out of scope with this function's
/// return and are dropped normally, so nothing needs manual cleanup.
pub struct BatchCollector;

impl BatchCollector {
    pub fn collect<R: Read>(parser: &mut Parser<R>) -> Result<ParseResult, ParseError> {
        let block_hint = parser
            .options()
            .limits
            .max_blocks
            .map(|m| m.min(1000))
            .unwrap_or(1000);
        let words_per_block_hint = parser.options().limits.max_words_per_block.unwrap_or(50);

        let mut headers = Vec::with_capacity(block_hint);
        let mut words = Vec::with_capacity(block_hint * words_per_block_hint);

        while let Some(block) = parser.next() {
            let block = block?;
            let start = words.len();
            words.extend_from_slice(block.words());
            headers.push(OwnedBlockHeader {
                start,
                len: block.words().len(),
                line_number: block.line_number(),
            });
        }

        Ok(ParseResult { headers, words })
    }
}
