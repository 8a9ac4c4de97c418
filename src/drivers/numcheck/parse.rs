//! Command Parser
//!
//! Scans a sanitized buffer as a fixed number of decimal integers
//! followed by nothing but whitespace.
//!
//! # Scan model
//! Each integer skips leading whitespace, takes an optional `-` and one or
//! more ASCII digits. Whitespace between integers may be empty, so `3-4`
//! reads as `3` and `-4`. A `+` sign is not accepted. After the last
//! integer a single non-whitespace byte anywhere in the rest of the buffer
//! rejects the command.
//!
//! Values outside the `i32` range are rejected with
//! [`ParseError::OutOfRange`] rather than wrapped.

use core::fmt;

use super::sanitize::SanitizedBuffer;

/// Number of integers a device expects per write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Arity {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Arity {
    /// Number of integer tokens
    #[inline]
    pub const fn count(self) -> usize {
        self as usize
    }
}

/// A well-formed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Three operands `(a, b, c)`
    Triple(i32, i32, i32),
    /// One operand
    Single(i32),
    /// Two operands `(a, b)`
    Pair(i32, i32),
}

impl Command {
    /// Arity this command was parsed with
    pub const fn arity(&self) -> Arity {
        match self {
            Command::Triple(..) => Arity::Three,
            Command::Single(_) => Arity::One,
            Command::Pair(..) => Arity::Two,
        }
    }
}

/// Reason a buffer is not a well-formed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer integers than required before input ran out or a
    /// non-numeric token was hit
    Missing { expected: usize, found: usize },
    /// Non-whitespace input after the last required integer
    Trailing,
    /// An integer does not fit in `i32`
    OutOfRange,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Missing { expected, found } => {
                write!(f, "found {} of {} integers", found, expected)
            }
            ParseError::Trailing => f.write_str("unexpected trailing input"),
            ParseError::OutOfRange => f.write_str("integer out of range"),
        }
    }
}

/// Parse a buffer as exactly `arity` integers.
///
/// No partial command is ever produced.
pub fn parse(buffer: &SanitizedBuffer, arity: Arity) -> Result<Command, ParseError> {
    parse_bytes(buffer.as_bytes(), arity)
}

fn parse_bytes(input: &[u8], arity: Arity) -> Result<Command, ParseError> {
    let mut scanner = Scanner::new(input);
    let mut values = [0i32; 3];
    let expected = arity.count();

    for (found, slot) in values.iter_mut().take(expected).enumerate() {
        *slot = scanner
            .next_int()?
            .ok_or(ParseError::Missing { expected, found })?;
    }

    scanner.skip_space();
    if !scanner.at_end() {
        return Err(ParseError::Trailing);
    }

    let [a, b, c] = values;
    Ok(match arity {
        Arity::One => Command::Single(a),
        Arity::Two => Command::Pair(a, b),
        Arity::Three => Command::Triple(a, b, c),
    })
}

/// Same set as the kernel's `isspace`
#[inline]
const fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Scan one integer.
    ///
    /// `Ok(None)` means no integer starts here; the position is left on
    /// the offending byte.
    fn next_int(&mut self) -> Result<Option<i32>, ParseError> {
        self.skip_space();

        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }

        if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos = start;
            return Ok(None);
        }

        let mut magnitude: i64 = 0;
        while let Some(byte) = self.peek().filter(u8::is_ascii_digit) {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(i64::from(byte - b'0')))
                .ok_or(ParseError::OutOfRange)?;
            self.pos += 1;
        }

        let value = if negative { -magnitude } else { magnitude };
        i32::try_from(value)
            .map(Some)
            .map_err(|_| ParseError::OutOfRange)
    }
}
