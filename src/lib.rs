#![crate_name = "gcode_core"]
//! A streaming, memory-bounded tokenizer for G-code (RS274/ISO 6983-1) text.
//!
//! The parser reads from any [`std::io::Read`] source one line at a time,
//! tokenizes each line into a [`Block`] of [`Word`]s, and enforces a set of
//! configurable resource limits so that arbitrarily large or adversarial
//! input can be streamed in bounded memory.
//!
//! ```
//! use gcode_core::Parser;
//!
//! let mut parser = Parser::from_slice(b"G1 X1.0 Y-2.5\nM30\n");
//! while let Some(block) = parser.next() {
//!     let block = block.expect("valid block");
//!     for word in block.words() {
//!         print!("{word} ");
//!     }
//!     println!();
//! }
//! ```

pub mod address;
pub mod block;
pub mod errors;
pub mod limits;
pub mod parser;
pub mod tokenizer;
pub mod value;

pub use address::AddressConfig;
pub use block::{Block, OwnedBlock};
pub use errors::{ParseError, ParseErrorKind};
pub use limits::{FloatPrecision, Limits, ParserOptions};
pub use parser::batch::{BatchCollector, OwnedBlockHeader, ParseResult};
pub use parser::Parser;
pub use value::{Value, Word};
