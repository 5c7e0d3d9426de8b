/// Commands a client can send.
///
/// Each connection carries exactly one request; the server closes the
/// connection once the response has been streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// LIST - Describe every track in the catalog
    List,
    /// INFO - Send the descriptive text of one track
    Info(usize),
    /// PLAY - Stream the bytes of one track
    Play(usize),
}

/// Request keywords understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Info,
    Play,
}

impl Command {
    /// Parses a command keyword, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use jukebox::protocol::request::Command;
    /// assert_eq!(Command::from_keyword("play"), Some(Command::Play));
    /// assert_eq!(Command::from_keyword("STOP"), None);
    /// ```
    pub fn from_keyword(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("LIST") {
            Some(Command::List)
        } else if s.eq_ignore_ascii_case("INFO") {
            Some(Command::Info)
        } else if s.eq_ignore_ascii_case("PLAY") {
            Some(Command::Play)
        } else {
            None
        }
    }

    pub fn takes_track_id(&self) -> bool {
        !matches!(self, Command::List)
    }
}

impl Request {
    /// The track this request refers to, if any.
    pub fn track_id(&self) -> Option<usize> {
        match self {
            Request::List => None,
            Request::Info(id) | Request::Play(id) => Some(*id),
        }
    }
}
