//! Line-oriented echo over a `UnixStream` pair.
//!
//! A client thread sends a few newline-terminated requests in irregular
//! pieces. The server side accumulates whatever arrives in a
//! [`LinearBuffer`], peels off complete lines, and echoes each one back in
//! upper case. Partial lines simply stay in the buffer until the rest shows
//! up.
//!
//! Run with `RUST_LOG=linbuf=trace` to watch every transport call.

use std::{io, net::Shutdown, os::unix::net::UnixStream, thread};

use linbuf::{LinearBuffer, MsgFlags, appendf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const REQUESTS: &[&[u8]] = &[b"hel", b"lo\nwor", b"ld\n", b"bye\n"];

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (client, server) = UnixStream::pair()?;

    let sender = thread::spawn(move || -> io::Result<Vec<u8>> {
        let mut out = LinearBuffer::with_capacity(64).map_err(io::Error::other)?;
        let mut replies = LinearBuffer::with_capacity(256).map_err(io::Error::other)?;
        for piece in REQUESTS {
            out.push_bytes(piece);
            while !out.is_empty() {
                out.send_to(&client, MsgFlags::EMPTY)?;
            }
        }
        client.shutdown(Shutdown::Write)?;
        while replies.recv_from(&client, MsgFlags::EMPTY)? > 0 {}
        Ok(replies.readable_view().to_vec())
    });

    let mut inbox = LinearBuffer::with_capacity(16).map_err(io::Error::other)?;
    let mut outbox = LinearBuffer::with_capacity(64).map_err(io::Error::other)?;
    loop {
        let n = inbox.recv_from(&server, MsgFlags::EMPTY)?;
        while let Some(end) = inbox.readable_view().iter().position(|&b| b == b'\n') {
            let line = inbox.readable_view()[..end].to_ascii_uppercase();
            inbox.discard_front(end + 1);
            info!(line = %String::from_utf8_lossy(&line), "request");
            outbox.push_bytes(&line);
            appendf!(outbox, " ({} bytes)\n", line.len());
        }
        while !outbox.is_empty() {
            outbox.send_to(&server, MsgFlags::EMPTY)?;
        }
        if n == 0 {
            break;
        }
    }
    server.shutdown(Shutdown::Write)?;

    let replies = sender
        .join()
        .map_err(|_| io::Error::other("client thread panicked"))??;
    print!("{}", String::from_utf8_lossy(&replies));
    Ok(())
}
