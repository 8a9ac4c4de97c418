//! Character Device Plumbing
//!
//! Types shared between the driver and the host that registers it:
//! device numbers, the file-operation set, and the operations trait the
//! host calls on every open, write and release.

mod registration;

use core::fmt;

use bitflags::bitflags;

use crate::error::DriverResult;
use crate::uaccess::{UserMemory, UserSlice};

pub use registration::{DeviceHost, Registration, DEVICE_OPS};

/// Bits reserved for the minor number in a [`DevT`]
pub const MINORBITS: u32 = 20;
/// Mask for the minor number
pub const MINORMASK: u32 = (1 << MINORBITS) - 1;

/// Packed major:minor device number
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DevT(u32);

impl DevT {
    /// Pack a major and minor number
    #[inline]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self((major << MINORBITS) | (minor & MINORMASK))
    }

    /// Wrap a raw packed value
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn major(self) -> u32 {
        self.0 >> MINORBITS
    }

    #[inline]
    pub const fn minor(self) -> u32 {
        self.0 & MINORMASK
    }

    /// Same major, minor advanced by `n`
    #[inline]
    pub const fn offset(self, n: u32) -> Self {
        Self::new(self.major(), self.minor() + n)
    }
}

impl fmt::Debug for DevT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DevT({}:{})", self.major(), self.minor())
    }
}

impl fmt::Display for DevT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major(), self.minor())
    }
}

bitflags! {
    /// File operations a device node implements
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileOps: u32 {
        const OPEN = 1 << 0;
        const READ = 1 << 1;
        const WRITE = 1 << 2;
        const RELEASE = 1 << 3;
    }
}

/// Entry points the host calls on a registered device
///
/// `minor` is the minor number of the node the call arrived on.
pub trait CharDeviceOps: Send + Sync {
    /// A process opened the node
    fn open(&self, minor: u32) -> DriverResult<()>;

    /// A process wrote `input` to the node.
    ///
    /// Returns the number of bytes accepted.
    fn write(&self, minor: u32, mem: &dyn UserMemory, input: UserSlice) -> DriverResult<usize>;

    /// The last handle to the node was closed
    fn release(&self, minor: u32) -> DriverResult<()>;
}
