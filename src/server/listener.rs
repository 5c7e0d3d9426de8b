use anyhow::Context;
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::config::Tuning;
use crate::protocol::connection::{Connection, Next, ServeContext};
use crate::server::table::{ConnectionTable, LISTENER};

/// Flags of one readiness notification, copied out of the event buffer.
#[derive(Debug, Clone, Copy)]
struct Readiness {
    token: Token,
    readable: bool,
    writable: bool,
    hangup: bool,
}

/// Single-threaded event loop serving the catalog.
pub struct Server {
    poll: Poll,
    events: Events,
    listener: TcpListener,
    catalog: Catalog,
    tuning: Tuning,
    connections: ConnectionTable<TcpStream>,
}

impl Server {
    /// Binds the listener and registers it for input readiness.
    pub fn bind(addr: SocketAddr, catalog: Catalog, tuning: Tuning) -> anyhow::Result<Self> {
        let poll = Poll::new().context("failed to create poll instance")?;

        let mut listener =
            TcpListener::bind(addr).with_context(|| format!("failed to bind {addr}"))?;

        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)
            .context("failed to register listener")?;

        info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            poll,
            events: Events::with_capacity(tuning.events_capacity),
            listener,
            catalog,
            tuning,
            connections: ConnectionTable::new(),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Serves forever. Only a broken poll instance ends the loop.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.turn(None)?;
        }
    }

    /// Waits for readiness once and dispatches everything reported.
    ///
    /// Returns the number of notifications handled.
    pub fn turn(&mut self, timeout: Option<Duration>) -> anyhow::Result<usize> {
        if let Err(e) = self.poll.poll(&mut self.events, timeout) {
            if e.kind() == ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(e).context("poll failed");
        }

        let batch: Vec<Readiness> = self
            .events
            .iter()
            .map(|event| Readiness {
                token: event.token(),
                readable: event.is_readable(),
                writable: event.is_writable(),
                hangup: event.is_error() || event.is_read_closed() || event.is_write_closed(),
            })
            .collect();

        for readiness in &batch {
            self.dispatch(*readiness);
        }

        Ok(batch.len())
    }

    fn dispatch(&mut self, readiness: Readiness) {
        let Readiness {
            token,
            readable,
            writable,
            hangup,
        } = readiness;

        if token == LISTENER {
            if readable {
                self.accept_connections();
            }
            return;
        }

        if hangup {
            debug!(token = token.0, "Peer hung up");
            self.close_connection(token);
            return;
        }

        if readable {
            let ctx = ServeContext::new(&self.catalog, &self.tuning);
            let Some(connection) = self.connections.get_mut(token) else {
                return;
            };
            let was_receiving = connection.is_receiving();
            let next = connection.handle_input(&ctx);

            match next {
                Next::Close => {
                    self.close_connection(token);
                    return;
                }
                Next::Write if was_receiving => {
                    if !self.update_interest(token, Interest::READABLE | Interest::WRITABLE) {
                        return;
                    }
                }
                _ => {}
            }
        }

        if writable {
            let Some(connection) = self.connections.get_mut(token) else {
                return;
            };

            if connection.handle_output() == Next::Close {
                self.close_connection(token);
            }
        }
    }

    /// Accepts until the listener would block.
    fn accept_connections(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => self.register_client(stream, peer),
                Err(e) => match e.kind() {
                    ErrorKind::WouldBlock => break,
                    ErrorKind::Interrupted => continue,
                    ErrorKind::ConnectionAborted | ErrorKind::ConnectionReset => {
                        warn!(error = %e, "Transient accept error");
                        continue;
                    }
                    _ => {
                        error!(error = %e, "Error accepting connection");
                        break;
                    }
                },
            }
        }
    }

    fn register_client(&mut self, mut stream: TcpStream, peer: SocketAddr) {
        let token = self.connections.next_token();

        if let Err(e) = self
            .poll
            .registry()
            .register(&mut stream, token, Interest::READABLE)
        {
            warn!(%peer, error = %e, "Failed to register connection, dropping it");
            return;
        }

        info!(token = token.0, %peer, "Accepted connection");
        self.connections.insert(token, Connection::new(stream));
    }

    /// Re-arms the connection's interest set. On failure the connection is
    /// closed and `false` is returned.
    fn update_interest(&mut self, token: Token, interest: Interest) -> bool {
        let Some(connection) = self.connections.get_mut(token) else {
            return false;
        };

        match self
            .poll
            .registry()
            .reregister(connection.stream_mut(), token, interest)
        {
            Ok(()) => true,
            Err(e) => {
                warn!(token = token.0, error = %e, "Failed to update interest");
                self.close_connection(token);
                false
            }
        }
    }

    /// Deregisters, closes and erases a connection. Unknown tokens are ignored.
    fn close_connection(&mut self, token: Token) {
        let Some(mut connection) = self.connections.remove(token) else {
            return;
        };

        connection.close();

        if let Err(e) = self.poll.registry().deregister(connection.stream_mut()) {
            debug!(token = token.0, error = %e, "Deregister failed");
        }

        info!(
            token = token.0,
            open = self.connections.len(),
            "Closed connection"
        );
        // Dropping the stream closes the socket.
    }
}
