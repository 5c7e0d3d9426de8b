//! Scripted in-memory socket shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

/// What the mock does on the next write attempt.
#[derive(Debug, Clone, Copy)]
pub enum WriteStep {
    /// Accept at most this many bytes.
    Accept(usize),
    WouldBlock,
    Fail,
}

/// What the mock does on the next read attempt.
#[derive(Debug, Clone)]
pub enum ReadStep {
    Data(Vec<u8>),
    WouldBlock,
    Eof,
    Fail,
}

/// A socket whose reads and writes follow a script. Once the write script
/// runs out every write is accepted in full; once the read script runs out
/// every read would block.
#[derive(Debug, Default)]
pub struct MockSocket {
    pub reads: VecDeque<ReadStep>,
    pub writes: VecDeque<WriteStep>,
    pub written: Vec<u8>,
    pub write_calls: usize,
}

impl MockSocket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reads(mut self, steps: impl IntoIterator<Item = ReadStep>) -> Self {
        self.reads.extend(steps);
        self
    }

    pub fn with_writes(mut self, steps: impl IntoIterator<Item = WriteStep>) -> Self {
        self.writes.extend(steps);
        self
    }

    pub fn push_read(&mut self, step: ReadStep) {
        self.reads.push_back(step);
    }

    pub fn push_write(&mut self, step: WriteStep) {
        self.writes.push_back(step);
    }
}

impl Read for MockSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(ReadStep::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.reads.push_front(ReadStep::Data(data.split_off(n)));
                }
                Ok(n)
            }
            Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::Fail) => Err(io::Error::new(ErrorKind::ConnectionReset, "reset")),
            Some(ReadStep::WouldBlock) | None => Err(ErrorKind::WouldBlock.into()),
        }
    }
}

impl Write for MockSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_calls += 1;
        match self.writes.pop_front() {
            Some(WriteStep::Accept(limit)) => {
                let n = limit.min(buf.len());
                self.written.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            Some(WriteStep::WouldBlock) => Err(ErrorKind::WouldBlock.into()),
            Some(WriteStep::Fail) => Err(io::Error::new(ErrorKind::BrokenPipe, "broken pipe")),
            None => {
                self.written.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `len` bytes of a repeating, position-dependent pattern.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
