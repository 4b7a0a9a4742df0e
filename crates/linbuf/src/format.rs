use core::fmt::{self, Write};

use crate::LinearBuffer;

/// `fmt::Write` sink over a fixed slice that keeps the prefix that fits.
struct Truncating<'a> {
    dst: &'a mut [u8],
    len: usize,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.dst.len() - self.len;
        let n = s.len().min(room);
        self.dst[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        if n < s.len() { Err(fmt::Error) } else { Ok(()) }
    }
}

impl LinearBuffer {
    /// Render `args` directly into the free tail of the buffer.
    ///
    /// The buffer is compacted first, so the whole of
    /// [`available`](Self::available) space can be used. Output that does not
    /// fit is cut off at the byte level and the rest is dropped. Returns the
    /// number of bytes committed.
    ///
    /// Usually called through [`appendf!`](crate::appendf).
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        self.shift();
        let mut out = Truncating {
            dst: self.writable_view(),
            len: 0,
        };
        // An error only means the output was truncated; keep what was written.
        let _ = out.write_fmt(args);
        let len = out.len;
        self.extend(len)
    }
}
