#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate gcode_core;

use gcode_core::Parser;

fuzz_target!(|data: &[u8]| {
    // Full multi-line program, default limits in effect.
    let mut parser = Parser::from_slice(data);
    loop {
        match parser.next() {
            Some(Ok(_)) => continue,
            Some(Err(_)) | None => break,
        }
    }
});
