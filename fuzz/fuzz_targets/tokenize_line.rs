#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate gcode_core;

use gcode_core::Parser;

fuzz_target!(|data: &[u8]| {
    // No embedded newline: exercises a single line through to EOF, including
    // the undelimited-final-line path.
    let mut parser = Parser::from_slice(data);
    while let Some(block) = parser.next() {
        let _ = block;
    }
});
