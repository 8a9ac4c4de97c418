//! Input Sanitizer
//!
//! Turns a writer's raw bytes into a bounded, NUL-terminated kernel copy.
//!
//! # Rules
//! - At most [`MAX_DATA_LEN`] bytes are copied from user space, and never
//!   more than the writer declared
//! - The data ends at the first `\r`, `\n` or NUL, which is not kept
//! - The result is always NUL-terminated
//!
//! Truncation is silent: an over-long write is judged on its first
//! [`MAX_DATA_LEN`] bytes.

use crate::config::buffer::{BUFFER_CAPACITY, MAX_DATA_LEN};
use crate::error::DriverResult;
use crate::uaccess::{UserMemory, UserSlice};

/// Owned, bounded copy of one write's payload
pub struct SanitizedBuffer {
    bytes: [u8; BUFFER_CAPACITY],
    len: usize,
}

impl SanitizedBuffer {
    /// Copy and sanitize a user range.
    ///
    /// Fails only if the copy primitive faults.
    pub fn copy_from<M>(mem: &M, input: &UserSlice) -> DriverResult<Self>
    where
        M: UserMemory + ?Sized,
    {
        let mut bytes = [0u8; BUFFER_CAPACITY];
        let copied = input.read_prefix(mem, &mut bytes[..MAX_DATA_LEN])?;
        Ok(Self::terminate(bytes, copied))
    }

    /// Sanitize bytes already held by the kernel.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut bytes = [0u8; BUFFER_CAPACITY];
        let copied = raw.len().min(MAX_DATA_LEN);
        bytes[..copied].copy_from_slice(&raw[..copied]);
        Self::terminate(bytes, copied)
    }

    fn terminate(mut bytes: [u8; BUFFER_CAPACITY], copied: usize) -> Self {
        let len = bytes[..copied]
            .iter()
            .position(|&b| matches!(b, b'\r' | b'\n' | 0))
            .unwrap_or(copied);

        // Everything from the boundary on is cleared so the buffer holds
        // nothing but the data and its terminator.
        bytes[len..].fill(0);

        Self { bytes, len }
    }

    /// Data bytes, terminator excluded
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Data bytes followed by the NUL terminator
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    /// Number of data bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no data bytes were kept
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl core::fmt::Debug for SanitizedBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SanitizedBuffer")
            .field("data", &core::str::from_utf8(self.as_bytes()).unwrap_or("<non-utf8>"))
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use crate::testing::UserPages;

    #[test]
    fn test_strips_line_terminators() {
        assert_eq!(SanitizedBuffer::from_bytes(b"3 4 5\n").as_bytes(), b"3 4 5");
        assert_eq!(SanitizedBuffer::from_bytes(b"3 4 5\r\n").as_bytes(), b"3 4 5");
        assert_eq!(SanitizedBuffer::from_bytes(b"17\r").as_bytes(), b"17");
    }

    #[test]
    fn test_stops_at_first_boundary() {
        let buf = SanitizedBuffer::from_bytes(b"10 5\n7 8\n");
        assert_eq!(buf.as_bytes(), b"10 5");
        assert_eq!(buf.as_bytes_with_nul(), b"10 5\0");
    }

    #[test]
    fn test_stops_at_nul() {
        assert_eq!(SanitizedBuffer::from_bytes(b"5\0 9").as_bytes(), b"5");
    }

    #[test]
    fn test_empty_input() {
        let buf = SanitizedBuffer::from_bytes(b"");
        assert!(buf.is_empty());
        assert_eq!(buf.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn test_truncates_to_capacity() {
        let raw = [b'7'; 400];
        let buf = SanitizedBuffer::from_bytes(&raw);
        assert_eq!(buf.len(), MAX_DATA_LEN);
        assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn test_copy_never_exceeds_capacity() {
        let pages = UserPages::new(&[b'1'; 1024]);
        let buf = SanitizedBuffer::copy_from(&pages, &pages.slice()).unwrap();

        assert_eq!(buf.len(), MAX_DATA_LEN);
        assert_eq!(pages.max_end(), pages.base() + MAX_DATA_LEN);
    }

    #[test]
    fn test_copy_respects_declared_length() {
        // The writer declares two bytes of a longer mapping
        let pages = UserPages::new(b"42 garbage");
        let slice = UserSlice::new(pages.base(), 2).unwrap();
        let buf = SanitizedBuffer::copy_from(&pages, &slice).unwrap();

        assert_eq!(buf.as_bytes(), b"42");
        assert_eq!(pages.max_end(), pages.base() + 2);
    }

    #[test]
    fn test_copy_fault() {
        let pages = UserPages::faulting();
        let slice = UserSlice::new(pages.base(), 8).unwrap();
        assert_eq!(
            SanitizedBuffer::copy_from(&pages, &slice).err(),
            Some(DriverError::Efault)
        );
    }
}
