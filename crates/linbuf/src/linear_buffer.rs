use alloc::{boxed::Box, vec::Vec};
use core::{ffi::CStr, fmt};

use bstr::BStr;
use tracing::{debug, trace};

use crate::{error::BufferError, options::BufferOptions};

/// Fixed-capacity byte buffer with a read cursor and a write cursor.
///
/// The unread bytes always occupy `storage[read..write]`, and
/// `storage[write]` is always `0`. The storage holds one byte more than the
/// capacity so the terminator fits even when the buffer is full.
///
/// Cursor invariants, upheld by every method:
///
/// - `read <= write <= capacity`
/// - when `read == write` both cursors are `0`
pub struct LinearBuffer {
    storage: Box<[u8]>,
    read: usize,
    write: usize,
}

impl LinearBuffer {
    /// Allocate a buffer described by `options`.
    ///
    /// # Errors
    ///
    /// See [`LinearBuffer::with_capacity`].
    pub fn new(options: BufferOptions) -> Result<Self, BufferError> {
        Self::with_capacity(options.capacity)
    }

    /// Allocate a buffer that holds up to `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ZeroCapacity`] for a zero capacity and
    /// [`BufferError::Allocation`] if the allocator cannot provide
    /// `capacity + 1` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            debug!("rejecting zero-capacity buffer");
            return Err(BufferError::ZeroCapacity);
        }
        let len = capacity
            .checked_add(1)
            .ok_or(BufferError::CapacityOverflow { capacity })?;

        let mut storage = Vec::new();
        storage.try_reserve_exact(len).map_err(|source| {
            debug!(capacity, "buffer allocation failed");
            BufferError::Allocation { capacity, source }
        })?;
        storage.resize(len, 0);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            read: 0,
            write: 0,
        })
    }

    /// Number of bytes the buffer can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len() - 1
    }

    /// `true` when there is nothing to read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// `true` when no byte can be appended, even after compaction.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.used() == self.capacity()
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn used(&self) -> usize {
        self.write - self.read
    }

    /// Free space, counting bytes reclaimable by [`shift`](Self::shift).
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Free space after the write cursor, usable without compacting.
    ///
    /// This is the length of [`writable_view`](Self::writable_view) and can be
    /// smaller than [`available`](Self::available).
    #[must_use]
    pub fn max_contiguous_writable(&self) -> usize {
        self.capacity() - self.write
    }

    /// The unread bytes.
    #[must_use]
    pub fn readable_view(&self) -> &[u8] {
        &self.storage[self.read..self.write]
    }

    /// The contiguous free region after the write cursor.
    ///
    /// Bytes written here become readable once committed with
    /// [`extend`](Self::extend).
    pub fn writable_view(&mut self) -> &mut [u8] {
        let end = self.capacity();
        &mut self.storage[self.write..end]
    }

    /// The unread bytes as a NUL-terminated string.
    ///
    /// The string stops at the first NUL, so unread data that contains a zero
    /// byte is cut short.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.storage[self.read..=self.write]).unwrap_or_default()
    }

    /// The unread bytes as a byte string, for display and text searches.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.readable_view())
    }

    /// Move the unread bytes to the front of the storage.
    ///
    /// After this call `max_contiguous_writable() == available()`. Does nothing
    /// when the read cursor is already at the front.
    pub fn shift(&mut self) {
        if self.read == 0 {
            return;
        }
        if self.read == self.write {
            self.reset();
            return;
        }
        let used = self.used();
        self.storage.copy_within(self.read..self.write, 0);
        trace!(moved = used, reclaimed = self.read, "buffer compacted");
        self.read = 0;
        self.write = used;
        self.storage[self.write] = 0;
    }

    /// Commit `n` bytes previously written into
    /// [`writable_view`](Self::writable_view).
    ///
    /// `n` is clamped to [`max_contiguous_writable`](Self::max_contiguous_writable).
    /// Returns the number of bytes committed.
    pub fn extend(&mut self, n: usize) -> usize {
        let n = n.min(self.max_contiguous_writable());
        self.write += n;
        self.storage[self.write] = 0;
        n
    }

    /// Drop unread bytes from either end.
    ///
    /// A positive `n` consumes from the front, a negative `n` retracts that
    /// many of the most recently written bytes. The magnitude is clamped to
    /// [`used`](Self::used).
    pub fn discard(&mut self, n: isize) {
        if n < 0 {
            self.discard_back(n.unsigned_abs());
        } else {
            self.discard_front(n.unsigned_abs());
        }
    }

    /// Consume up to `n` bytes from the front.
    pub fn discard_front(&mut self, n: usize) {
        let n = n.min(self.used());
        self.read += n;
        self.normalize();
    }

    /// Retract up to `n` bytes from the back.
    pub fn discard_back(&mut self, n: usize) {
        let n = n.min(self.used());
        self.write -= n;
        self.storage[self.write] = 0;
        self.normalize();
    }

    /// Drop everything.
    pub fn discard_all(&mut self) {
        self.reset();
    }

    /// Append as much of `src` as fits.
    ///
    /// Compacts first when the tail is too short. Returns the number of bytes
    /// accepted, which is less than `src.len()` only when the buffer fills up.
    pub fn push_bytes(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.available());
        if self.max_contiguous_writable() < n {
            self.shift();
        }
        self.writable_view()[..n].copy_from_slice(&src[..n]);
        self.extend(n)
    }

    /// Append one byte. Returns `false` if the buffer is full.
    #[must_use = "a full buffer rejects the byte"]
    pub fn push_byte(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        if self.max_contiguous_writable() == 0 {
            self.shift();
        }
        self.storage[self.write] = byte;
        self.extend(1);
        true
    }

    /// Move as many unread bytes from `src` as fit into `self`.
    ///
    /// The moved bytes are consumed from `src`. Returns the number of bytes
    /// moved; `0` when `src` is empty or `self` is full.
    pub fn push_from(&mut self, src: &mut LinearBuffer) -> usize {
        let n = src.used().min(self.available());
        if n == 0 {
            return 0;
        }
        if self.max_contiguous_writable() < n {
            self.shift();
        }
        self.writable_view()[..n].copy_from_slice(&src.readable_view()[..n]);
        self.extend(n);
        src.discard_front(n);
        n
    }

    /// Copy up to `dst.len()` unread bytes into `dst` and consume them.
    ///
    /// Returns the number of bytes copied.
    pub fn pull_bytes(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.used());
        dst[..n].copy_from_slice(&self.readable_view()[..n]);
        self.discard_front(n);
        n
    }

    /// Consume and return the next unread byte.
    pub fn pull_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.discard_front(1);
        Some(byte)
    }

    /// Return the next unread byte without consuming it.
    #[must_use]
    pub fn peek_byte(&self) -> Option<u8> {
        self.readable_view().first().copied()
    }

    /// Assert the cursor invariants.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    pub fn check_invariants(&self) {
        assert!(self.read <= self.write, "read cursor past write cursor");
        assert!(self.write <= self.capacity(), "write cursor past capacity");
        assert_eq!(self.storage[self.write], 0, "missing terminator");
        if self.read == self.write {
            assert_eq!(self.read, 0, "empty buffer not normalized");
        }
        assert_eq!(self.used() + self.available(), self.capacity());
    }

    fn normalize(&mut self) {
        if self.read == self.write {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.read = 0;
        self.write = 0;
        self.storage[0] = 0;
    }
}

impl AsRef<[u8]> for LinearBuffer {
    fn as_ref(&self) -> &[u8] {
        self.readable_view()
    }
}

impl fmt::Debug for LinearBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearBuffer")
            .field("capacity", &self.capacity())
            .field("read", &self.read)
            .field("write", &self.write)
            .field("data", &self.as_bstr())
            .finish()
    }
}
