use std::env;
use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::process;

use anyhow::{bail, Context, Result};
use bytes::Bytes;

use nure::Regex;

const USAGE: &str = "usage: nure -E <pattern> [--tree]";

#[derive(Debug, PartialEq)]
struct Args {
    pattern: Vec<u8>,
    tree: bool,
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Args> {
    let mut args = args.into_iter();
    if args.next().as_deref() != Some(OsStr::new("-E")) {
        bail!("expected first argument to be '-E'\n{}", USAGE);
    }
    let Some(pattern) = args.next() else {
        bail!("missing pattern\n{}", USAGE);
    };
    let pattern = pattern_bytes(pattern)?;
    let mut tree = false;
    for arg in args {
        match arg.to_str() {
            Some("--tree") => tree = true,
            _ => bail!("unexpected argument {:?}\n{}", arg, USAGE),
        }
    }
    Ok(Args { pattern, tree })
}

// Patterns are byte strings, so take the argument's raw bytes.
#[cfg(unix)]
fn pattern_bytes(pattern: OsString) -> Result<Vec<u8>> {
    use std::os::unix::ffi::OsStringExt;
    Ok(pattern.into_vec())
}

#[cfg(not(unix))]
fn pattern_bytes(pattern: OsString) -> Result<Vec<u8>> {
    match pattern.into_string() {
        Ok(pattern) => Ok(pattern.into_bytes()),
        Err(pattern) => bail!("pattern {:?} is not valid unicode", pattern),
    }
}

fn read_stdin() -> Result<Bytes> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .context("failed to read input from stdin")?;
    Ok(Bytes::from(buf))
}

// Splits on '\n'; a final newline does not start another line.
fn lines(input: &Bytes) -> Vec<Bytes> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &byte) in input.iter().enumerate() {
        if byte == b'\n' {
            lines.push(input.slice(start..i));
            start = i + 1;
        }
    }
    if start < input.len() || input.is_empty() {
        lines.push(input.slice(start..));
    }
    lines
}

fn run() -> Result<bool> {
    let args = parse_args(env::args_os().skip(1))?;
    let regex = nure::parse(&args.pattern)
        .with_context(|| format!("invalid pattern \"{}\"", args.pattern.escape_ascii()))?;
    if args.tree {
        eprintln!("{}", regex);
    }
    let input = read_stdin()?;
    Ok(any_line_matches(&regex, &input))
}

fn any_line_matches(regex: &Regex, input: &Bytes) -> bool {
    lines(input).iter().any(|line| regex.is_match(line))
}

// Usage: echo <input_text> | nure -E <pattern>
fn main() {
    match run() {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(2)
        }
    }
}
