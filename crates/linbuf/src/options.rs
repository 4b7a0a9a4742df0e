/// Capacity used by [`BufferOptions::default`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Configuration for a [`LinearBuffer`](crate::LinearBuffer).
///
/// # Examples
///
/// ```rust
/// use linbuf::{BufferOptions, LinearBuffer};
///
/// let buf = LinearBuffer::new(BufferOptions { capacity: 2048 }).unwrap();
/// assert_eq!(buf.capacity(), 2048);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    /// Number of usable bytes. Fixed for the lifetime of the buffer.
    ///
    /// One extra byte is allocated past the end so the unread span can always
    /// be followed by a NUL terminator.
    ///
    /// # Default
    ///
    /// [`DEFAULT_CAPACITY`] (4096)
    pub capacity: usize,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
