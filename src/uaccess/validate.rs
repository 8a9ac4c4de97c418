//! User Buffer Validation and Copy
//!
//! # Security Principles
//! - Validate the declared range before use
//! - Fail-secure: an inconsistent range is `EFAULT`
//! - Prevent common vulnerabilities:
//!   - Buffer overflows (copies are bounded by the destination)
//!   - Over-reads (copies are bounded by the declared length)
//!   - TOCTOU races (copy to kernel space once, parse the copy)
//!   - Null pointer dereference (explicit checks)

use crate::error::{DriverError, DriverResult};

/// Default user-space window for a flat-mapped address space
pub mod regions {
    /// Start of user-accessible memory
    pub const USER_START: usize = 0x4000_0000;
    /// End of user-accessible memory (exclusive)
    pub const USER_END: usize = 0x4008_0000;
}

/// Host primitive that copies bytes out of user space.
///
/// Implementations must check that `src..src + dst.len()` is readable by
/// the calling process and return `Efault` otherwise. They must never
/// read outside that range.
pub trait UserMemory {
    /// Copy `dst.len()` bytes starting at user address `src` into `dst`.
    fn copy_from_user(&self, dst: &mut [u8], src: usize) -> DriverResult<()>;
}

/// A caller-declared user-space range.
///
/// Construction only checks that the range is self-consistent. Whether
/// the memory is actually readable is decided by the [`UserMemory`]
/// implementation at copy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSlice {
    addr: usize,
    len: usize,
}

impl UserSlice {
    /// Validate a declared range.
    ///
    /// # Returns
    /// * `Ok(UserSlice)` - range is usable
    /// * `Err(Efault)` - null address with nonzero length, or `addr + len`
    ///   overflows
    pub fn new(addr: usize, len: usize) -> DriverResult<Self> {
        // Zero-length ranges are valid whatever the address
        if len == 0 {
            return Ok(Self { addr, len: 0 });
        }

        if addr == 0 {
            return Err(DriverError::Efault);
        }

        addr.checked_add(len).ok_or(DriverError::Efault)?;

        Ok(Self { addr, len })
    }

    /// Start address
    #[inline]
    pub const fn addr(&self) -> usize {
        self.addr
    }

    /// Declared length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the range is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the leading bytes of the range into `dst`.
    ///
    /// Copies `min(self.len(), dst.len())` bytes and returns that count.
    pub fn read_prefix<M>(&self, mem: &M, dst: &mut [u8]) -> DriverResult<usize>
    where
        M: UserMemory + ?Sized,
    {
        let count = self.len.min(dst.len());
        if count == 0 {
            return Ok(0);
        }
        mem.copy_from_user(&mut dst[..count], self.addr)?;
        Ok(count)
    }
}

/// Bounds of the user-accessible window, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRegion {
    start: usize,
    end: usize,
}

impl UserRegion {
    /// Create a region. An inverted range yields an empty region.
    pub const fn new(start: usize, end: usize) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Check that `addr..addr + len` lies inside the region.
    ///
    /// # Security Checks
    /// 1. Pointer is non-null
    /// 2. Start is inside the region
    /// 3. Pointer + length doesn't overflow
    /// 4. End is inside the region
    pub fn check(&self, addr: usize, len: usize) -> DriverResult<()> {
        if len == 0 {
            return Ok(());
        }

        if addr == 0 {
            return Err(DriverError::Efault);
        }

        if addr < self.start || addr >= self.end {
            return Err(DriverError::Efault);
        }

        let end = addr.checked_add(len).ok_or(DriverError::Efault)?;

        if end > self.end {
            return Err(DriverError::Efault);
        }

        Ok(())
    }
}

impl Default for UserRegion {
    fn default() -> Self {
        Self::new(regions::USER_START, regions::USER_END)
    }
}

/// [`UserMemory`] for a flat address space where user memory is mapped
/// and readable from the kernel inside a known window.
#[derive(Debug, Clone, Copy)]
pub struct FlatUserMemory {
    region: UserRegion,
}

impl FlatUserMemory {
    /// Create an accessor for the given window.
    ///
    /// # Safety
    /// Every address inside `region` must be mapped and readable for the
    /// lifetime of the accessor.
    pub const unsafe fn new(region: UserRegion) -> Self {
        Self { region }
    }

    /// The window this accessor copies from
    #[inline]
    pub const fn region(&self) -> UserRegion {
        self.region
    }
}

impl UserMemory for FlatUserMemory {
    fn copy_from_user(&self, dst: &mut [u8], src: usize) -> DriverResult<()> {
        self.region.check(src, dst.len())?;
        if dst.is_empty() {
            return Ok(());
        }

        // SAFETY:
        // - `src..src + dst.len()` was checked to lie inside the region
        // - The region is mapped and readable per `FlatUserMemory::new`
        // - `dst` is a distinct kernel buffer, so the ranges cannot overlap
        unsafe {
            core::ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }
}
