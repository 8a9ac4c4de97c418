//! User-Space Memory Access
//!
//! Every byte the driver reads from a writer comes through this module.
//!
//! # Security Model
//! - Caller-declared ranges are validated before any copy
//! - Data is copied into kernel-owned storage, never referenced in place
//! - The copy itself goes through the host's [`UserMemory`] primitive
//! - Faults are returned as `EFAULT`, never panics

mod validate;

pub use validate::{regions, FlatUserMemory, UserMemory, UserRegion, UserSlice};
