//! A fixed-capacity linear byte buffer that sits between raw I/O and protocol
//! code.
//!
//! [`LinearBuffer`] owns a single allocation and two cursors. Producers append
//! at the write cursor, consumers drain from the read cursor, and the unread
//! span slides back to the front of the storage whenever the tail runs out of
//! contiguous room. The buffer never grows: every append reports how many
//! bytes it actually accepted.
//!
//! ```rust
//! use linbuf::LinearBuffer;
//!
//! let mut buf = LinearBuffer::with_capacity(16).unwrap();
//! assert_eq!(buf.push_bytes(b"hello, "), 7);
//! linbuf::appendf!(buf, "{}!", "world");
//! assert_eq!(buf.readable_view(), b"hello, world!");
//!
//! let mut out = [0u8; 5];
//! assert_eq!(buf.pull_bytes(&mut out), 5);
//! assert_eq!(&out, b"hello");
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod format;
mod linear_buffer;
mod options;

#[cfg(feature = "std")]
mod std_io;
#[cfg(all(unix, feature = "std"))]
mod transport;


pub use error::BufferError;
pub use linear_buffer::LinearBuffer;
pub use options::{BufferOptions, DEFAULT_CAPACITY};
#[cfg(all(unix, feature = "std"))]
pub use transport::{MessageTransport, MsgFlags};

/// Append formatted text to a [`LinearBuffer`], returning the number of bytes
/// committed.
///
/// Output that does not fit is truncated, exactly like
/// [`LinearBuffer::append_fmt`].
///
/// ```rust
/// # use linbuf::{appendf, LinearBuffer};
/// let mut buf = LinearBuffer::with_capacity(4).unwrap();
/// assert_eq!(appendf!(buf, "{}-{}", 12, 34), 4);
/// assert_eq!(buf.readable_view(), b"12-3");
/// ```
#[macro_export]
macro_rules! appendf {
    ($buf:expr, $($arg:tt)*) => {
        $buf.append_fmt(::core::format_args!($($arg)*))
    };
}
