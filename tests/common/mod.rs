#![allow(dead_code)]

use nure::Regex;

pub fn cat(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Printable form of a byte string for failure messages.
pub fn show(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}

pub fn parse(pattern: &[u8]) -> Regex {
    nure::parse(pattern)
        .unwrap_or_else(|err| panic!("/{}/ failed to parse: {}", show(pattern), err))
}

pub fn assert_matches(pattern: &[u8], input: &[u8], expected: bool) {
    let regex = parse(pattern);
    assert_eq!(
        regex.is_match(input),
        expected,
        "/{}/ against '{}'",
        show(pattern),
        show(input)
    );
}

pub fn assert_parse_error(pattern: &[u8]) {
    if let Ok(regex) = nure::parse(pattern) {
        panic!("/{}/ parsed as {}", show(pattern), regex);
    }
}

/// Checks one pattern against many inputs, parsing it once.
pub fn check(pattern: &[u8], cases: &[(&[u8], bool)]) {
    let regex = parse(pattern);
    for &(input, expected) in cases {
        assert_eq!(
            regex.is_match(input),
            expected,
            "/{}/ against '{}'",
            show(pattern),
            show(input)
        );
    }
}

pub fn check_all(cases: &[(&[u8], &[u8], bool)]) {
    for &(pattern, input, expected) in cases {
        assert_matches(pattern, input, expected);
    }
}
