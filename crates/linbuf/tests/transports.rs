#![expect(missing_docs)]
#![cfg(unix)]

use std::{
    io::{self, BufRead, ErrorKind, Read, Write},
    os::unix::net::{UnixDatagram, UnixStream},
};

use linbuf::{LinearBuffer, MessageTransport, MsgFlags, appendf};

#[test]
fn pipe_round_trip_and_back_discard() {
    let mut buf = LinearBuffer::with_capacity(2048).unwrap();
    let (mut reader, mut writer) = io::pipe().unwrap();

    assert_eq!(buf.push_bytes(b"Hola mundo C"), 12);
    assert_eq!(buf.write_to(&mut writer).unwrap(), 12);
    assert!(buf.is_empty());

    assert_eq!(buf.read_from(&mut reader).unwrap(), 12);
    assert_eq!(buf.readable_view(), b"Hola mundo C");

    buf.discard(-1);
    assert_eq!(buf.as_c_str(), c"Hola mundo ");
    assert_eq!(buf.used(), 11);
}

#[test]
fn read_from_reports_end_of_stream() {
    let mut buf = LinearBuffer::with_capacity(16).unwrap();
    let (mut reader, writer) = io::pipe().unwrap();
    drop(writer);
    assert_eq!(buf.read_from(&mut reader).unwrap(), 0);
    assert!(buf.is_empty());
}

#[test]
fn read_from_is_a_single_bounded_call() {
    let mut buf = LinearBuffer::with_capacity(4).unwrap();
    let mut src: &[u8] = b"abcdefgh";
    assert_eq!(buf.read_from(&mut src).unwrap(), 4);
    assert!(buf.is_full());
    // Full buffer: the reader is offered an empty slice.
    assert_eq!(buf.read_from(&mut src).unwrap(), 0);
    assert_eq!(src, b"efgh");

    buf.discard_front(3);
    assert_eq!(buf.read_from(&mut src).unwrap(), 3);
    assert_eq!(buf.readable_view(), b"defg");
}

/// Accepts at most `limit` bytes per call.
struct Trickle {
    out: Vec<u8>,
    limit: usize,
}

impl Write for Trickle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit);
        self.out.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn short_write_leaves_remainder() {
    let mut buf = LinearBuffer::with_capacity(16).unwrap();
    buf.push_bytes(b"abcdefg");
    let mut sink = Trickle {
        out: Vec::new(),
        limit: 3,
    };
    assert_eq!(buf.write_to(&mut sink).unwrap(), 3);
    assert_eq!(buf.readable_view(), b"defg");
    assert_eq!(buf.write_to(&mut sink).unwrap(), 3);
    assert_eq!(buf.write_to(&mut sink).unwrap(), 1);
    assert_eq!(buf.write_to(&mut sink).unwrap(), 0);
    assert_eq!(sink.out, b"abcdefg");
    assert_eq!(buf.max_contiguous_writable(), 16);
}

struct Broken(ErrorKind);

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(self.0.into())
    }
}

impl Write for Broken {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(self.0.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn transport_errors_leave_cursors_alone() {
    let mut buf = LinearBuffer::with_capacity(8).unwrap();
    buf.push_bytes(b"xyz");
    buf.discard_front(1);

    let err = buf.read_from(&mut Broken(ErrorKind::Interrupted)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Interrupted);
    assert_eq!(buf.readable_view(), b"yz");

    let err = buf.write_to(&mut Broken(ErrorKind::BrokenPipe)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    assert_eq!(buf.readable_view(), b"yz");
}

#[test]
fn nonblocking_socket_would_block_passes_through() {
    let (a, _b) = UnixStream::pair().unwrap();
    a.set_nonblocking(true).unwrap();
    let mut buf = LinearBuffer::with_capacity(8).unwrap();
    let err = buf.read_from(&mut &a).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);
    assert!(buf.is_empty());

    let err = buf.recv_from(&a, MsgFlags::EMPTY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);
}

#[test]
fn recv_dontwait_on_blocking_socket() {
    let (a, _b) = UnixStream::pair().unwrap();
    let mut buf = LinearBuffer::with_capacity(8).unwrap();
    let err = buf.recv_from(&a, MsgFlags::DONTWAIT).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);
    assert!(buf.is_empty());
}

#[test]
fn stream_send_and_recv() {
    let (a, b) = UnixStream::pair().unwrap();
    let mut out = LinearBuffer::with_capacity(64).unwrap();
    let mut inp = LinearBuffer::with_capacity(64).unwrap();

    appendf!(out, "ping {}\n", 7);
    assert_eq!(out.send_to(&a, MsgFlags::EMPTY).unwrap(), 7);
    assert!(out.is_empty());

    assert_eq!(inp.recv_from(&b, MsgFlags::PEEK).unwrap(), 7);
    assert_eq!(inp.readable_view(), b"ping 7\n");
    inp.discard_all();
    assert_eq!(inp.recv_from(&b, MsgFlags::EMPTY).unwrap(), 7);

    let mut line = String::new();
    inp.read_line(&mut line).unwrap();
    assert_eq!(line, "ping 7\n");
    assert!(inp.is_empty());
}

#[test]
fn datagram_boundaries_are_preserved() {
    let (a, b) = UnixDatagram::pair().unwrap();
    a.send(b"one").unwrap();
    a.send(b"three").unwrap();

    let mut buf = LinearBuffer::with_capacity(32).unwrap();
    assert_eq!(buf.recv_from(&b, MsgFlags::EMPTY).unwrap(), 3);
    assert_eq!(buf.recv_from(&b, MsgFlags::EMPTY).unwrap(), 5);
    assert_eq!(buf.readable_view(), b"onethree");
}

#[test]
fn recv_compacts_before_reading() {
    let (a, b) = UnixStream::pair().unwrap();
    let mut buf = LinearBuffer::with_capacity(6).unwrap();
    buf.push_bytes(b"abcdef");
    buf.discard_front(4);
    assert_eq!(buf.max_contiguous_writable(), 0);

    MessageTransport::send(&a, b"wxyz", MsgFlags::EMPTY).unwrap();
    assert_eq!(buf.recv_from(&b, MsgFlags::EMPTY).unwrap(), 4);
    assert_eq!(buf.readable_view(), b"efwxyz");
}

#[test]
fn recv_reports_peer_shutdown() {
    let (a, b) = UnixStream::pair().unwrap();
    drop(a);
    let mut buf = LinearBuffer::with_capacity(8).unwrap();
    assert_eq!(buf.recv_from(&b, MsgFlags::EMPTY).unwrap(), 0);
}

#[test]
fn flags_compose() {
    let flags = MsgFlags::PEEK | MsgFlags::DONTWAIT;
    assert!(flags.contains(MsgFlags::PEEK));
    assert!(flags.contains(MsgFlags::DONTWAIT));
    assert!(!flags.contains(MsgFlags::WAITALL));
    assert_eq!(MsgFlags::from_bits(flags.bits()), flags);
    assert_eq!(MsgFlags::default(), MsgFlags::EMPTY);
}

#[test]
fn std_io_adapters() {
    let mut buf = LinearBuffer::with_capacity(8).unwrap();
    assert_eq!(buf.write(b"0123456789").unwrap(), 8);
    assert_eq!(buf.write(b"x").unwrap(), 0);

    let mut head = [0u8; 3];
    buf.read_exact(&mut head).unwrap();
    assert_eq!(&head, b"012");

    assert_eq!(buf.fill_buf().unwrap(), b"34567");
    buf.consume(2);
    let mut rest = Vec::new();
    buf.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"567");
    assert!(buf.is_empty());
}
