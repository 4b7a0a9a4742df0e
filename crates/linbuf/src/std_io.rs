//! `std::io` integration: filling from readers, draining into writers, and
//! the `Read`/`Write`/`BufRead` impls of the buffer itself.

use std::io::{self, BufRead, Read, Write};

use tracing::{debug, trace};

use crate::LinearBuffer;

impl LinearBuffer {
    /// Fill the free tail with a single `read` call on `src`.
    ///
    /// The buffer is compacted first, then `src` is offered the whole
    /// contiguous free region. `Ok(0)` is passed through unchanged: it means
    /// end of stream, or that the buffer was already full. Errors (including
    /// `WouldBlock`) are returned as-is and leave the cursors untouched.
    ///
    /// # Errors
    ///
    /// Whatever `src.read` returns.
    pub fn read_from<R: Read + ?Sized>(&mut self, src: &mut R) -> io::Result<usize> {
        self.shift();
        let requested = self.max_contiguous_writable();
        match src.read(self.writable_view()) {
            Ok(n) => {
                trace!(requested, transferred = n, "read_from");
                Ok(self.extend(n))
            }
            Err(err) => {
                debug!(requested, kind = ?err.kind(), "read_from failed");
                Err(err)
            }
        }
    }

    /// Drain unread bytes with a single `write` call on `dst`.
    ///
    /// Only the bytes `dst` accepted are consumed; a short write leaves the
    /// rest for the next call. Errors leave the cursors untouched.
    ///
    /// # Errors
    ///
    /// Whatever `dst.write` returns.
    pub fn write_to<W: Write + ?Sized>(&mut self, dst: &mut W) -> io::Result<usize> {
        let requested = self.used();
        match dst.write(self.readable_view()) {
            Ok(n) => {
                trace!(requested, transferred = n, "write_to");
                self.discard_front(n);
                Ok(n)
            }
            Err(err) => {
                debug!(requested, kind = ?err.kind(), "write_to failed");
                Err(err)
            }
        }
    }
}

impl Write for LinearBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.push_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for LinearBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.pull_bytes(buf))
    }
}

impl BufRead for LinearBuffer {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.readable_view())
    }

    fn consume(&mut self, amt: usize) {
        self.discard_front(amt);
    }
}
