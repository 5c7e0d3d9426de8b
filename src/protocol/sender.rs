use std::io::{self, ErrorKind, Write};

/// Result of a single write attempt.
#[derive(Debug)]
pub enum SendOutcome {
    /// The socket accepted this many bytes (always > 0).
    Sent(usize),
    /// Nothing was accepted; wait for the socket to become writable.
    WouldBlock,
    /// The whole payload has been delivered.
    Done,
    /// Unrecoverable socket error. The cursor was not moved.
    Fault(io::Error),
}

/// Streams an owned payload in chunks of at most `chunk_size` bytes.
///
/// The cursor only moves by what the socket actually accepted, so a short
/// write or a would-block never skips or repeats bytes.
pub struct ChunkedSender {
    payload: Vec<u8>,
    sent: usize,
    chunk_size: usize,
    scratch: Vec<u8>,
}

impl ChunkedSender {
    pub fn new(payload: Vec<u8>, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);

        Self {
            payload,
            sent: 0,
            chunk_size,
            scratch: Vec::with_capacity(chunk_size),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Bytes accepted by the socket so far.
    pub fn position(&self) -> usize {
        self.sent
    }

    pub fn remaining(&self) -> usize {
        self.payload.len() - self.sent
    }

    pub fn is_done(&self) -> bool {
        self.remaining() == 0
    }

    /// Makes one write attempt of the next chunk.
    ///
    /// Calling this after `Done` keeps returning `Done`.
    pub fn send_next_chunk<W: Write>(&mut self, sink: &mut W) -> SendOutcome {
        let remaining = self.remaining();
        if remaining == 0 {
            return SendOutcome::Done;
        }

        let chunk = remaining.min(self.chunk_size);
        self.scratch.clear();
        self.scratch
            .extend_from_slice(&self.payload[self.sent..self.sent + chunk]);

        loop {
            match sink.write(&self.scratch) {
                Ok(0) => {
                    return SendOutcome::Fault(io::Error::new(
                        ErrorKind::WriteZero,
                        "socket accepted no bytes",
                    ));
                }
                Ok(n) => {
                    let n = n.min(chunk);
                    self.sent += n;
                    return SendOutcome::Sent(n);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return SendOutcome::WouldBlock,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return SendOutcome::Fault(e),
            }
        }
    }
}
