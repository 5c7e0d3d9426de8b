use crate::catalog::Catalog;
use crate::protocol::request::Request;

/// Outcome category of a response.
///
/// - `Ok`: the request was served
/// - `Error`: the client gets a short `ERR <reason>` line instead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

/// A complete response payload, streamed verbatim and followed by a close.
#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload: payload.into(),
        }
    }

    /// # Example
    ///
    /// ```
    /// # use jukebox::protocol::response::Response;
    /// assert_eq!(Response::error("no such track 9").payload, b"ERR no such track 9\n");
    /// ```
    pub fn error(reason: &str) -> Self {
        Self {
            status: Status::Error,
            payload: format!("ERR {reason}\n").into_bytes(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

/// Resolves a parsed request against the catalog.
pub fn respond(catalog: &Catalog, request: &Request) -> Response {
    match *request {
        Request::List => Response::ok(catalog.listing()),

        Request::Info(id) => match catalog.get(id) {
            Some(track) => match &track.info {
                Some(info) => Response::ok(info.clone()),
                None => Response::ok(format!("No info available for {}\n", track.name)),
            },
            None => Response::error(&format!("no such track {id}")),
        },

        Request::Play(id) => match catalog.get(id) {
            Some(track) => match track.load() {
                Ok(bytes) => Response::ok(bytes),
                Err(e) => {
                    tracing::warn!(track = %track.name, error = %e, "Failed to load track");
                    Response::error("unable to load track")
                }
            },
            None => Response::error(&format!("no such track {id}")),
        },
    }
}
