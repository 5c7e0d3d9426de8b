//! Connection multiplexer.
//!
//! [`listener::Server`] owns the poll instance, the listening socket and the
//! [`table::ConnectionTable`]; it is the only place connections are created
//! or destroyed.

pub mod listener;
pub mod table;

pub use listener::Server;
pub use table::ConnectionTable;
