use bytes::{Buf, BytesMut};
use std::io::{ErrorKind, Read, Write};

use crate::catalog::Catalog;
use crate::config::Tuning;
use crate::protocol::parser::{ParseError, try_parse_request};
use crate::protocol::response::{Response, respond};
use crate::protocol::sender::{ChunkedSender, SendOutcome};

const READ_CHUNK: usize = 1024;

/// Shared, read-only inputs every connection needs to answer a request.
#[derive(Clone, Copy)]
pub struct ServeContext<'a> {
    pub catalog: &'a Catalog,
    pub chunk_size: usize,
    pub max_request_size: usize,
}

impl<'a> ServeContext<'a> {
    pub fn new(catalog: &'a Catalog, tuning: &Tuning) -> Self {
        Self {
            catalog,
            chunk_size: tuning.chunk_size,
            max_request_size: tuning.max_request_size,
        }
    }
}

pub enum ConnectionState {
    Receiving,
    Sending(ChunkedSender),
    Closing,
}

/// Readiness the connection needs next from the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Stay registered for input only.
    Read,
    /// A response is in flight; output readiness is required.
    Write,
    /// The connection is finished and must be torn down.
    Close,
}

/// Per-client protocol state over any non-blocking byte stream.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Receiving,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_receiving(&self) -> bool {
        matches!(self.state, ConnectionState::Receiving)
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.state, ConnectionState::Sending(_))
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.state, ConnectionState::Closing)
    }

    /// Request bytes received but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Handles an input-ready notification.
    ///
    /// Reads until the socket would block, the peer closes, or a complete
    /// request has been turned into a response.
    pub fn handle_input(&mut self, ctx: &ServeContext<'_>) -> Next {
        match self.state {
            ConnectionState::Receiving => {}
            // One request per connection; anything after it is ignored.
            ConnectionState::Sending(_) => return Next::Write,
            ConnectionState::Closing => return Next::Close,
        }

        let mut temp = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut temp) {
                Ok(0) => {
                    tracing::debug!(buffered = self.buffer.len(), "Peer closed before a full request");
                    self.close();
                    return Next::Close;
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&temp[..n]);

                    if let Some(next) = self.try_request(ctx) {
                        return next;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Next::Read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "Read failed");
                    self.close();
                    return Next::Close;
                }
            }
        }
    }

    /// Handles an output-ready notification by draining the sender until
    /// the socket pushes back or the payload is finished.
    pub fn handle_output(&mut self) -> Next {
        let sender = match &mut self.state {
            ConnectionState::Sending(sender) => sender,
            ConnectionState::Receiving => return Next::Read,
            ConnectionState::Closing => return Next::Close,
        };

        let next = loop {
            match sender.send_next_chunk(&mut self.stream) {
                SendOutcome::Sent(n) => {
                    tracing::trace!(bytes = n, sent = sender.position(), total = sender.len(), "Sent chunk");
                }
                SendOutcome::WouldBlock => break Next::Write,
                SendOutcome::Done => {
                    tracing::debug!(bytes = sender.len(), "Response delivered");
                    break Next::Close;
                }
                SendOutcome::Fault(e) => {
                    tracing::warn!(
                        error = %e,
                        sent = sender.position(),
                        total = sender.len(),
                        "Send failed, abandoning response"
                    );
                    break Next::Close;
                }
            }
        };

        if next == Next::Close {
            self.close();
        }
        next
    }

    /// Moves to the terminal state, dropping any unsent payload.
    /// Calling this more than once has no further effect.
    pub fn close(&mut self) {
        if !self.is_closing() {
            self.state = ConnectionState::Closing;
            self.buffer.clear();
        }
    }

    fn try_request(&mut self, ctx: &ServeContext<'_>) -> Option<Next> {
        let response = match try_parse_request(&self.buffer) {
            Ok((request, consumed)) => {
                self.buffer.advance(consumed);
                tracing::info!(?request, "Request received");
                respond(ctx.catalog, &request)
            }

            Err(ParseError::Incomplete) => {
                if self.buffer.len() <= ctx.max_request_size {
                    return None;
                }
                tracing::warn!(buffered = self.buffer.len(), "Request too large");
                Response::error("request too large")
            }

            Err(e) => {
                tracing::warn!(error = ?e, "Malformed request");
                Response::error(&e.reason())
            }
        };

        if response.is_error() {
            let reply = String::from_utf8_lossy(&response.payload);
            tracing::debug!(reply = %reply.trim_end(), "Replying with error");
        }

        self.state = ConnectionState::Sending(ChunkedSender::new(response.payload, ctx.chunk_size));
        Some(Next::Write)
    }
}
