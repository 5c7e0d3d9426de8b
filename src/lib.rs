//! Jukebox - non-blocking track streaming server
//!
//! Core library for the catalog, the request protocol and the event loop.

pub mod catalog;
pub mod config;
pub mod protocol;
pub mod server;
