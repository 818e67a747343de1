//! Resource ceilings and behavioral toggles

use crate::address::AddressConfig;

/// Optional numeric ceilings enforced by the streaming driver. A `None` field
/// means the corresponding quantity is unbounded.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Total bytes the driver may consume from its source.
    pub max_input_size: Option<usize>,
    /// Total blocks the driver may emit.
    pub max_blocks: Option<usize>,
    /// Words allowed in a single block.
    pub max_words_per_block: Option<usize>,
    /// Bytes allowed per line, including the trailing delimiter in accounting.
    pub max_line_length: Option<usize>,
    /// Total delimited (or final undelimited) lines the driver may read.
    pub max_lines: Option<u64>,
}

impl Limits {
    /// 100 MiB
    pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;
    /// 10,000,000 blocks
    pub const DEFAULT_MAX_BLOCKS: usize = 10_000_000;
    /// 50 words
    pub const DEFAULT_MAX_WORDS_PER_BLOCK: usize = 50;
    /// 256 KiB
    pub const DEFAULT_MAX_LINE_LENGTH: usize = 256 * 1024;
    /// 5,000,000 lines
    pub const DEFAULT_MAX_LINES: u64 = 5_000_000;

    /// No ceilings at all; only bounded by available memory and `usize`/`u64` range.
    pub fn unbounded() -> Self {
        Self {
            max_input_size: None,
            max_blocks: None,
            max_words_per_block: None,
            max_line_length: None,
            max_lines: None,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_size: Some(Self::DEFAULT_MAX_INPUT_SIZE),
            max_blocks: Some(Self::DEFAULT_MAX_BLOCKS),
            max_words_per_block: Some(Self::DEFAULT_MAX_WORDS_PER_BLOCK),
            max_line_length: Some(Self::DEFAULT_MAX_LINE_LENGTH),
            max_lines: Some(Self::DEFAULT_MAX_LINES),
        }
    }
}

/// Precision used to store parsed numeric word values.
///
/// Values are always stored as `f64` internally; `Bits32` additionally
/// round-trips every parsed value through `f32` so repeated reads are stable
/// at the precision the caller actually cares about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FloatPrecision {
    /// Round-trip parsed values through `f32`.
    Bits32,
    /// Keep the full `f64` precision (default).
    #[default]
    Bits64,
}

impl FloatPrecision {
    #[inline]
    pub(crate) fn clamp(self, value: f64) -> f64 {
        match self {
            FloatPrecision::Bits32 => value as f32 as f64,
            FloatPrecision::Bits64 => value,
        }
    }
}

/// Immutable, fully-resolved behavior for a [`crate::Parser`].
#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub address_config: AddressConfig,
    pub limits: Limits,
    /// Unclosed `(` comments at end-of-line fail instead of being silently closed.
    pub strict_comments: bool,
    /// Documented toggle kept for API compatibility; see crate docs for why
    /// zero-word lines never yield a `Block` regardless of this flag.
    pub skip_empty_lines: bool,
    /// Skip (rather than reject) unrecognized bytes while idle.
    pub ignore_unknown_characters: bool,
    /// Allow `"..."` string values after an accepted letter.
    pub support_quoted_strings: bool,
    /// Verify trailing `*<digits>` checksums.
    pub validate_checksum: bool,
    /// Enforce that `N` word values are strictly increasing non-negative integers.
    pub validate_line_numbers: bool,
    /// Precision to store parsed numeric values at.
    pub float_precision: FloatPrecision,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            address_config: AddressConfig::full(),
            limits: Limits::default(),
            strict_comments: true,
            skip_empty_lines: true,
            ignore_unknown_characters: true,
            support_quoted_strings: true,
            validate_checksum: true,
            validate_line_numbers: true,
            float_precision: FloatPrecision::default(),
        }
    }
}

impl ParserOptions {
    /// Starts from [`ParserOptions::default`]; use the builder-style `with_*`
    /// methods to adjust individual fields.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address_config(mut self, config: AddressConfig) -> Self {
        self.address_config = config;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_strict_comments(mut self, value: bool) -> Self {
        self.strict_comments = value;
        self
    }

    pub fn with_skip_empty_lines(mut self, value: bool) -> Self {
        self.skip_empty_lines = value;
        self
    }

    pub fn with_ignore_unknown_characters(mut self, value: bool) -> Self {
        self.ignore_unknown_characters = value;
        self
    }

    pub fn with_support_quoted_strings(mut self, value: bool) -> Self {
        self.support_quoted_strings = value;
        self
    }

    pub fn with_validate_checksum(mut self, value: bool) -> Self {
        self.validate_checksum = value;
        self
    }

    pub fn with_validate_line_numbers(mut self, value: bool) -> Self {
        self.validate_line_numbers = value;
        self
    }

    pub fn with_float_precision(mut self, value: FloatPrecision) -> Self {
        self.float_precision = value;
        self
    }
}
