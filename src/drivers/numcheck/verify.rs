//! Numeric Checks
//!
//! Pure predicates over parsed operands. Arithmetic is widened to `i64`
//! where a square or product could overflow `i32`, so every check is
//! total over its input domain.

use core::fmt;

use super::parse::Command;

/// Pythagorean relation with `c` as the hypotenuse.
///
/// Only the positional ordering is tested: `(3, 4, 5)` holds, `(5, 3, 4)`
/// does not.
pub fn pythagorean(a: i32, b: i32, c: i32) -> bool {
    let (a, b, c) = (i64::from(a), i64::from(b), i64::from(c));
    c * c == a * a + b * b
}

/// Primality by trial division up to `floor(sqrt(n))`.
pub fn is_prime(n: i32) -> bool {
    if n < 2 {
        return false;
    }

    let n = i64::from(n);
    let mut i: i64 = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// `a` divisible by `b`. A zero divisor is never divisible.
pub fn divisible(a: i32, b: i32) -> bool {
    // i32::MIN % -1 is 0 mathematically; wrapping_rem gives that instead of trapping
    b != 0 && a.wrapping_rem(b) == 0
}

/// The check bound to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Pythagorean,
    Prime,
    Divisible,
}

impl Check {
    /// Evaluate this check against a command.
    ///
    /// Returns `None` when the command's shape does not belong to this
    /// check.
    pub fn evaluate(self, command: Command) -> Option<Verdict> {
        let holds = match (self, command) {
            (Check::Pythagorean, Command::Triple(a, b, c)) => pythagorean(a, b, c),
            (Check::Prime, Command::Single(n)) => is_prime(n),
            (Check::Divisible, Command::Pair(a, b)) => divisible(a, b),
            _ => return None,
        };
        Some(Verdict { command, holds })
    }
}

/// Result of a check together with its operands.
///
/// Only ever formatted into a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    command: Command,
    holds: bool,
}

impl Verdict {
    #[inline]
    pub const fn holds(&self) -> bool {
        self.holds
    }

    #[inline]
    pub const fn command(&self) -> Command {
        self.command
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = if self.holds { "" } else { "not " };
        match self.command {
            Command::Triple(a, b, c) => {
                let verb = if self.holds { "satisfy" } else { "do not satisfy" };
                write!(f, "{}, {} and {} {} the Pythagorean theorem", a, b, c, verb)
            }
            Command::Single(n) => write!(f, "{} is {}prime", n, not),
            Command::Pair(a, b) => write!(f, "{} is {}divisible by {}", a, not, b),
        }
    }
}
