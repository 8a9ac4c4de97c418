//! Number-Check Driver
//!
//! Three device nodes, each running one check on what is written to it:
//! - minor 0: `a b c` - Pythagorean triple with `c` as hypotenuse
//! - minor 1: `n` - primality by trial division
//! - minor 2: `a b` - divisibility of `a` by `b`
//!
//! # Pipeline
//! `write` -> [`DispatchTable`] -> [`SanitizedBuffer`] -> [`parse`] ->
//! [`Check`] -> log line
//!
//! No state survives a call. The only observable result of a write is
//! the log line; the call itself fails only for an unknown minor or a
//! faulting user copy.

pub mod dispatch;
pub mod parse;
pub mod sanitize;
pub mod verify;

pub use dispatch::{Binding, DispatchTable, NodeName, NumCheck, Outcome};
pub use parse::{parse, Arity, Command, ParseError};
pub use sanitize::SanitizedBuffer;
pub use verify::{divisible, is_prime, pythagorean, Check, Verdict};
