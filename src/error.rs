//! Driver Error Codes
//!
//! Errors that surface through a file operation's own return status.
//! Values are the negative errno codes the host expects.

use core::fmt;

/// Errno-style error returned by driver entry points
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Bad address (user copy faulted, or the claimed range is inconsistent)
    Efault = -14,
    /// Out of memory
    Enomem = -12,
    /// Resource busy
    Ebusy = -16,
    /// No such device
    Enodev = -19,
    /// Invalid argument (unknown device minor)
    Einval = -22,
}

impl DriverError {
    /// Raw negative errno value
    #[inline]
    pub const fn errno(self) -> i32 {
        self as i32
    }

    /// Short symbolic name
    pub const fn name(self) -> &'static str {
        match self {
            DriverError::Efault => "EFAULT",
            DriverError::Enomem => "ENOMEM",
            DriverError::Ebusy => "EBUSY",
            DriverError::Enodev => "ENODEV",
            DriverError::Einval => "EINVAL",
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.errno())
    }
}

/// Result alias for driver entry points
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_values() {
        assert_eq!(DriverError::Einval.errno(), -22);
        assert_eq!(DriverError::Efault.errno(), -14);
    }

    #[test]
    fn test_display() {
        assert_eq!(DriverError::Einval.to_string(), "EINVAL (-22)");
    }
}
