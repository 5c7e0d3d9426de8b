//! Mapping from readiness token to live connection.

use mio::Token;
use std::collections::HashMap;

use crate::protocol::connection::Connection;

/// Token reserved for the listening socket.
pub const LISTENER: Token = Token(0);

const FIRST_CLIENT_TOKEN: usize = 1;

/// Owns every live connection, keyed by a token that is never handed out
/// twice.
pub struct ConnectionTable<S> {
    connections: HashMap<Token, Connection<S>>,
    next_token: usize,
}

impl<S> ConnectionTable<S> {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
            next_token: FIRST_CLIENT_TOKEN,
        }
    }

    /// Reserves the token for the next connection.
    pub fn next_token(&mut self) -> Token {
        let token = Token(self.next_token);
        self.next_token += 1;
        token
    }

    /// Stores a connection under a token obtained from `next_token`.
    pub fn insert(&mut self, token: Token, connection: Connection<S>) {
        let previous = self.connections.insert(token, connection);
        debug_assert!(previous.is_none(), "token {token:?} reused");
    }

    pub fn get(&self, token: Token) -> Option<&Connection<S>> {
        self.connections.get(&token)
    }

    pub fn get_mut(&mut self, token: Token) -> Option<&mut Connection<S>> {
        self.connections.get_mut(&token)
    }

    /// Erases a connection. Removing an unknown token returns `None`.
    pub fn remove(&mut self, token: Token) -> Option<Connection<S>> {
        self.connections.remove(&token)
    }

    pub fn contains(&self, token: Token) -> bool {
        self.connections.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.connections.keys().copied()
    }
}

impl<S> Default for ConnectionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}
