//! Device Dispatch
//!
//! Routes a write on minor `n` through sanitize, parse and check.
//!
//! # Security Considerations
//! - The minor is validated before any user memory is touched
//! - Each write works on call-local state only
//! - Malformed input is reported out of band; the call still accepts
//!   every byte

use core::fmt;

use crate::chrdev::CharDeviceOps;
use crate::config::devices::{DIVISIBLE_MINOR, NUM_DEVICES, PRIME_MINOR, PYTHAGOREAN_MINOR};
use crate::config::DRIVER_NAME;
use crate::error::{DriverError, DriverResult};
use crate::uaccess::{UserMemory, UserSlice};

use super::parse::{self, Arity, ParseError};
use super::sanitize::SanitizedBuffer;
use super::verify::{Check, Verdict};

/// Display name of a device node, e.g. `numcheck1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeName(pub u32);

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DRIVER_NAME, self.0)
    }
}

/// One device's pipeline: how many integers it reads and what it checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    minor: u32,
    arity: Arity,
    check: Check,
}

impl Binding {
    const fn new(minor: u32, arity: Arity, check: Check) -> Self {
        Self { minor, arity, check }
    }

    #[inline]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    #[inline]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    #[inline]
    pub const fn check(&self) -> Check {
        self.check
    }

    /// Parse and check a sanitized buffer.
    pub fn run(&self, buffer: &SanitizedBuffer) -> Outcome {
        let malformed = |error| Outcome::Malformed {
            minor: self.minor,
            arity: self.arity,
            error,
        };

        match parse::parse(buffer, self.arity) {
            Ok(command) => match self.check.evaluate(command) {
                Some(verdict) => Outcome::Checked(verdict),
                None => malformed(ParseError::Missing {
                    expected: self.arity.count(),
                    found: command.arity().count(),
                }),
            },
            Err(error) => malformed(error),
        }
    }
}

/// What a single write produced.
///
/// Exists only to be written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Well-formed input; the check passed or failed
    Checked(Verdict),
    /// Input was not the expected number of integers
    Malformed {
        minor: u32,
        arity: Arity,
        error: ParseError,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checked(verdict) => fmt::Display::fmt(verdict, f),
            Outcome::Malformed { minor, arity, error } => {
                let noun = if *arity == Arity::One { "integer" } else { "integers" };
                write!(
                    f,
                    "{}: exactly {} {} required ({})",
                    NodeName(*minor),
                    arity.count(),
                    noun,
                    error
                )
            }
        }
    }
}

/// Immutable minor-to-pipeline table
#[derive(Debug)]
pub struct DispatchTable {
    bindings: [Binding; NUM_DEVICES as usize],
}

impl DispatchTable {
    /// The fixed device layout
    pub const fn new() -> Self {
        Self {
            bindings: [
                Binding::new(PYTHAGOREAN_MINOR, Arity::Three, Check::Pythagorean),
                Binding::new(PRIME_MINOR, Arity::One, Check::Prime),
                Binding::new(DIVISIBLE_MINOR, Arity::Two, Check::Divisible),
            ],
        }
    }

    /// Find the pipeline for a minor.
    ///
    /// # Returns
    /// * `Err(Einval)` - minor is outside the configured set
    pub fn lookup(&self, minor: u32) -> DriverResult<&Binding> {
        self.bindings
            .iter()
            .find(|binding| binding.minor == minor)
            .ok_or(DriverError::Einval)
    }

    /// All bindings in minor order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The driver's file operations
#[derive(Debug)]
pub struct NumCheck {
    table: DispatchTable,
}

impl NumCheck {
    pub const fn new() -> Self {
        Self {
            table: DispatchTable::new(),
        }
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Run one write and return its outcome without logging it.
    pub fn evaluate(
        &self,
        minor: u32,
        mem: &dyn UserMemory,
        input: &UserSlice,
    ) -> DriverResult<Outcome> {
        let binding = self.table.lookup(minor)?;
        let buffer = SanitizedBuffer::copy_from(mem, input)?;
        Ok(binding.run(&buffer))
    }
}

impl Default for NumCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CharDeviceOps for NumCheck {
    fn open(&self, minor: u32) -> DriverResult<()> {
        log::info!("{}: device opened", NodeName(minor));
        Ok(())
    }

    fn write(&self, minor: u32, mem: &dyn UserMemory, input: UserSlice) -> DriverResult<usize> {
        let outcome = match self.evaluate(minor, mem, &input) {
            Ok(outcome) => outcome,
            Err(DriverError::Einval) => {
                log::error!("invalid device minor {}", minor);
                return Err(DriverError::Einval);
            }
            Err(e) => {
                log::warn!("{}: copy from user failed: {}", NodeName(minor), e);
                return Err(e);
            }
        };

        log::info!("{}", outcome);
        Ok(input.len())
    }

    fn release(&self, minor: u32) -> DriverResult<()> {
        log::info!("{}: device closed", NodeName(minor));
        Ok(())
    }
}
