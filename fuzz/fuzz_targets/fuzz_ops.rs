#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use linbuf::{LinearBuffer, appendf};

#[derive(Debug, Arbitrary)]
enum Op {
    PushBytes(Vec<u8>),
    PushByte(u8),
    PullBytes(u8),
    PullByte,
    PeekByte,
    Discard(i16),
    DiscardAll,
    Shift,
    AppendFmt(u64),
    Extend { data: Vec<u8>, claim: u16 },
    PushFrom(Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

fn run(input: Input) {
    let capacity = usize::from(input.capacity) + 1;
    let mut buf = LinearBuffer::with_capacity(capacity).unwrap();
    let mut model: VecDeque<u8> = VecDeque::new();

    for op in input.ops {
        match op {
            Op::PushBytes(src) => {
                let n = buf.push_bytes(&src);
                assert_eq!(n, src.len().min(capacity - model.len()));
                model.extend(&src[..n]);
            }
            Op::PushByte(b) => {
                if buf.push_byte(b) {
                    model.push_back(b);
                } else {
                    assert_eq!(model.len(), capacity);
                }
            }
            Op::PullBytes(want) => {
                let mut dst = vec![0u8; usize::from(want)];
                let n = buf.pull_bytes(&mut dst);
                let expected: Vec<u8> = model.drain(..n).collect();
                assert_eq!(&dst[..n], expected.as_slice());
            }
            Op::PullByte => assert_eq!(buf.pull_byte(), model.pop_front()),
            Op::PeekByte => assert_eq!(buf.peek_byte(), model.front().copied()),
            Op::Discard(n) => {
                buf.discard(isize::from(n));
                let k = usize::from(n.unsigned_abs()).min(model.len());
                if n < 0 {
                    model.truncate(model.len() - k);
                } else {
                    model.drain(..k);
                }
            }
            Op::DiscardAll => {
                buf.discard_all();
                model.clear();
            }
            Op::Shift => buf.shift(),
            Op::AppendFmt(v) => {
                let text = format!("{v:x}/{v}");
                let n = appendf!(buf, "{v:x}/{v}");
                assert_eq!(n, text.len().min(capacity - model.len()));
                model.extend(&text.as_bytes()[..n]);
            }
            Op::Extend { data, claim } => {
                let k = data.len().min(buf.max_contiguous_writable());
                buf.writable_view()[..k].copy_from_slice(&data[..k]);
                let claim = usize::from(claim).min(k);
                assert_eq!(buf.extend(claim), claim);
                model.extend(&data[..claim]);
            }
            Op::PushFrom(data) => {
                let mut src = LinearBuffer::with_capacity(128).unwrap();
                let staged = src.push_bytes(&data);
                let n = buf.push_from(&mut src);
                assert_eq!(n, staged.min(capacity - model.len()));
                model.extend(&data[..n]);
                src.check_invariants();
            }
        }
        buf.check_invariants();
        assert_eq!(buf.readable_view(), model.make_contiguous());
    }
}

fuzz_target!(|input: Input| run(input));
