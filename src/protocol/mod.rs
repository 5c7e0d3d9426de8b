//! Jukebox wire protocol.
//!
//! A client opens a connection, sends one request line and receives one
//! response. The server closes the connection to mark the end of the
//! response; there is no length header.
//!
//! ```text
//! LIST\n        -> "<id> <name>\n" for every track
//! INFO <id>\n   -> descriptive text of the track
//! PLAY <id>\n   -> raw track bytes
//! anything else -> "ERR <reason>\n"
//! ```
//!
//! # Architecture
//!
//! - **`connection`**: The per-client state machine driven by readiness events
//! - **`parser`**: Parses a request line out of the receive buffer
//! - **`request`**: Request representation
//! - **`response`**: Resolves requests against the catalog
//! - **`sender`**: Streams a payload in bounded chunks across partial writes
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Receiving  │ ← Accumulate bytes until a full request line
//!        └──────┬──────┘
//!               │ Request parsed (or rejected)
//!               ▼
//!        ┌──────────────────┐
//!        │     Sending      │ ← Drain the payload whenever writable
//!        └──────┬───────────┘
//!               │ Payload delivered / send fault
//!               ▼
//!        ┌──────────────────┐
//!        │     Closing      │ ← Deregistered, socket dropped
//!        └──────────────────┘
//! ```
//!
//! A hangup from the peer moves any state straight to `Closing`.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod sender;
