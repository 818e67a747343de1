use gcode_core::{BatchCollector, Limits, ParseErrorKind, Parser, ParserOptions, Value};

#[test]
fn crlf_and_trailing_lone_cr_all_advance_line_numbers() {
    let mut parser = Parser::from_slice(b"G1 X1\r\nG1 X2\nG1 X3\r");
    let mut seen = Vec::new();
    while let Some(block) = parser.next() {
        let block = block.unwrap();
        seen.push(block.line_number());
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn too_many_blocks_limit_is_enforced() {
    let mut opts = ParserOptions::default();
    opts.limits = Limits {
        max_blocks: Some(2),
        ..Limits::unbounded()
    };
    let data = b"G1 X1\nG1 X2\nG1 X3\n".to_vec();
    let mut parser = Parser::from_slice_with_options(&data, opts);
    assert!(parser.next().unwrap().is_ok());
    assert!(parser.next().unwrap().is_ok());
    let err = parser.next().unwrap().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyBlocks);
}

#[test]
fn too_many_lines_limit_counts_blank_and_comment_lines_too() {
    let mut opts = ParserOptions::default();
    opts.limits = Limits {
        max_lines: Some(2),
        ..Limits::unbounded()
    };
    let data = b"; comment\nG1 X1\nG1 X2\n".to_vec();
    let mut parser = Parser::from_slice_with_options(&data, opts);
    assert!(parser.next().unwrap().is_ok()); // line 2
    let err = parser.next().unwrap().unwrap_err(); // line 3 crosses the cap
    assert_eq!(err.kind, ParseErrorKind::TooManyLines);
}

#[test]
fn input_too_large_is_checked_before_reading_the_next_line() {
    let mut opts = ParserOptions::default();
    opts.limits = Limits {
        max_input_size: Some(6),
        ..Limits::unbounded()
    };
    let data = b"G1 X1\nG1 X2\n".to_vec();
    let mut parser = Parser::from_slice_with_options(&data, opts);
    assert!(parser.next().unwrap().is_ok());
    let err = parser.next().unwrap().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InputTooLarge);
}

#[test]
fn batch_collector_matches_iterative_blocks() {
    let data = b"G1 X1 Y2\nN10 G0 Z3\n; skip\nG1 X4\n".to_vec();

    let streamed: Vec<(u64, usize)> = {
        let mut parser = Parser::from_slice(&data);
        let mut out = Vec::new();
        while let Some(block) = parser.next() {
            let block = block.unwrap();
            out.push((block.line_number(), block.words().len()));
        }
        out
    };

    let mut parser = Parser::from_slice(&data);
    let result = BatchCollector::collect(&mut parser).unwrap();
    let collected: Vec<(u64, usize)> = result
        .headers
        .iter()
        .map(|h| (h.line_number, h.len))
        .collect();

    assert_eq!(streamed, collected);
    assert_eq!(result.block_words(0)[1].value, Value::Float(2.0));
}

#[test]
fn file_source_can_be_constructed_from_a_real_path() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "G1 X1").unwrap();
    writeln!(file, "G1 X2").unwrap();

    let mut parser = Parser::from_path(file.path()).unwrap();
    let mut count = 0;
    while let Some(block) = parser.next() {
        block.unwrap();
        count += 1;
    }
    assert_eq!(count, 2);
}
