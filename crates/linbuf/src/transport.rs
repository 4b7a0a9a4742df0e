//! Message-oriented transports: `recv(2)`/`send(2)` with pass-through flags.

use core::ops::{BitOr, BitOrAssign};
use std::{
    io,
    net::{TcpStream, UdpSocket},
    os::{
        fd::{AsRawFd, RawFd},
        unix::net::{UnixDatagram, UnixStream},
    },
};

use tracing::{debug, trace};

use crate::LinearBuffer;

/// Flag word handed unmodified to `recv(2)` and `send(2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MsgFlags(libc::c_int);

impl MsgFlags {
    /// No flags.
    pub const EMPTY: Self = Self(0);
    /// Return data without removing it from the receive queue.
    pub const PEEK: Self = Self(libc::MSG_PEEK);
    /// Fail with `WouldBlock` instead of blocking.
    pub const DONTWAIT: Self = Self(libc::MSG_DONTWAIT);
    /// Block until the full request is satisfied.
    pub const WAITALL: Self = Self(libc::MSG_WAITALL);
    /// Do not raise `SIGPIPE` when the peer has closed a stream.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub const NOSIGNAL: Self = Self(libc::MSG_NOSIGNAL);

    /// Wrap a raw flag word.
    #[must_use]
    pub const fn from_bits(bits: libc::c_int) -> Self {
        Self(bits)
    }

    /// The raw flag word.
    #[must_use]
    pub const fn bits(self) -> libc::c_int {
        self.0
    }

    /// `true` if every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MsgFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MsgFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A socket-like endpoint that accepts per-call flags.
///
/// Each method performs exactly one underlying transfer and reports the byte
/// count or the error without retrying.
pub trait MessageTransport {
    /// Receive into `buf`. `Ok(0)` means end of stream (or an empty datagram).
    ///
    /// # Errors
    ///
    /// The error reported by the transport, unmodified.
    fn recv(&self, buf: &mut [u8], flags: MsgFlags) -> io::Result<usize>;

    /// Send from `buf`, possibly only a prefix of it.
    ///
    /// # Errors
    ///
    /// The error reported by the transport, unmodified.
    fn send(&self, buf: &[u8], flags: MsgFlags) -> io::Result<usize>;
}

fn recv_fd(fd: RawFd, buf: &mut [u8], flags: MsgFlags) -> io::Result<usize> {
    // SAFETY: `buf` is a valid, writable region of `buf.len()` bytes for the
    // duration of the call.
    let ret = unsafe { libc::recv(fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len(), flags.0) };
    // A negative return is the only error signal; the cast is lossless otherwise.
    usize::try_from(ret).map_err(|_| io::Error::last_os_error())
}

fn send_fd(fd: RawFd, buf: &[u8], flags: MsgFlags) -> io::Result<usize> {
    // SAFETY: `buf` is a valid, readable region of `buf.len()` bytes for the
    // duration of the call.
    let ret = unsafe { libc::send(fd, buf.as_ptr().cast::<libc::c_void>(), buf.len(), flags.0) };
    usize::try_from(ret).map_err(|_| io::Error::last_os_error())
}

macro_rules! fd_transport {
    ($($ty:ty),* $(,)?) => {$(
        impl MessageTransport for $ty {
            fn recv(&self, buf: &mut [u8], flags: MsgFlags) -> io::Result<usize> {
                recv_fd(self.as_raw_fd(), buf, flags)
            }

            fn send(&self, buf: &[u8], flags: MsgFlags) -> io::Result<usize> {
                send_fd(self.as_raw_fd(), buf, flags)
            }
        }
    )*};
}

fd_transport!(TcpStream, UdpSocket, UnixStream, UnixDatagram);

impl<T: MessageTransport + ?Sized> MessageTransport for &T {
    fn recv(&self, buf: &mut [u8], flags: MsgFlags) -> io::Result<usize> {
        (**self).recv(buf, flags)
    }

    fn send(&self, buf: &[u8], flags: MsgFlags) -> io::Result<usize> {
        (**self).send(buf, flags)
    }
}

impl LinearBuffer {
    /// Fill the free tail with a single `recv` on `src`.
    ///
    /// Behaves like [`read_from`](Self::read_from), with `flags` passed
    /// through to the transport.
    ///
    /// # Errors
    ///
    /// Whatever `src.recv` returns; the cursors are left untouched.
    pub fn recv_from<T: MessageTransport + ?Sized>(
        &mut self,
        src: &T,
        flags: MsgFlags,
    ) -> io::Result<usize> {
        self.shift();
        let requested = self.max_contiguous_writable();
        match src.recv(self.writable_view(), flags) {
            Ok(n) => {
                trace!(requested, transferred = n, flags = flags.0, "recv_from");
                Ok(self.extend(n))
            }
            Err(err) => {
                debug!(requested, flags = flags.0, kind = ?err.kind(), "recv_from failed");
                Err(err)
            }
        }
    }

    /// Drain unread bytes with a single `send` on `dst`.
    ///
    /// Behaves like [`write_to`](Self::write_to), with `flags` passed through
    /// to the transport.
    ///
    /// # Errors
    ///
    /// Whatever `dst.send` returns; the cursors are left untouched.
    pub fn send_to<T: MessageTransport + ?Sized>(
        &mut self,
        dst: &T,
        flags: MsgFlags,
    ) -> io::Result<usize> {
        let requested = self.used();
        match dst.send(self.readable_view(), flags) {
            Ok(n) => {
                trace!(requested, transferred = n, flags = flags.0, "send_to");
                self.discard_front(n);
                Ok(n)
            }
            Err(err) => {
                debug!(requested, flags = flags.0, kind = ?err.kind(), "send_to failed");
                Err(err)
            }
        }
    }
}
