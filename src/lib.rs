//! numcheck - Number-Check Character Device Driver
//!
//! Three write-only device nodes, each checking the integers written to
//! it:
//! - `numcheck0`: `a b c` form a Pythagorean triple with `c` as hypotenuse
//! - `numcheck1`: `n` is prime
//! - `numcheck2`: `a` is divisible by `b`
//!
//! Results are reported through the `log` facade only. There is no read
//! channel.
//!
//! # Security Features
//! - User memory is only reached through a bounds-checked copy primitive
//! - Every write is copied into a fixed-size kernel buffer before parsing
//! - Malformed input never panics and never fails the write
//! - Registration is scoped: everything acquired is released on unload
//!   or on partial failure
//!
//! # Host Integration
//! The kernel side implements [`chrdev::DeviceHost`] (region, class,
//! cdev and node management) and [`uaccess::UserMemory`] (user copies),
//! installs a `log` backend such as [`drivers::console::ConsoleLogger`],
//! and routes file operations to [`module::LoadedModule::device`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod chrdev;
pub mod config;
pub mod drivers;
pub mod error;
pub mod module;
pub mod uaccess;

#[cfg(test)]
mod testing;

pub use chrdev::{CharDeviceOps, DevT, DeviceHost, FileOps, Registration};
pub use drivers::numcheck::{NumCheck, Outcome};
pub use error::{DriverError, DriverResult};
pub use module::LoadedModule;
pub use uaccess::{UserMemory, UserSlice};
