use crate::protocol::request::{Command, Request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No line terminator yet; keep reading.
    Incomplete,
    InvalidEncoding,
    Empty,
    UnknownCommand(String),
    MissingTrackId,
    InvalidTrackId(String),
    TrailingArguments,
}

impl ParseError {
    /// Short reason sent back to the client.
    pub fn reason(&self) -> String {
        match self {
            ParseError::Incomplete => "incomplete request".to_string(),
            ParseError::InvalidEncoding => "request is not ASCII text".to_string(),
            ParseError::Empty => "empty request".to_string(),
            ParseError::UnknownCommand(cmd) => format!("unknown command {cmd}"),
            ParseError::MissingTrackId => "missing track id".to_string(),
            ParseError::InvalidTrackId(id) => format!("invalid track id {id}"),
            ParseError::TrailingArguments => "too many arguments".to_string(),
        }
    }
}

/// Parses one newline-terminated request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, terminator
/// included.
pub fn try_parse_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let line_end = buf
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(ParseError::Incomplete)?;

    let mut line = &buf[..line_end];
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }

    if !line.is_ascii() {
        return Err(ParseError::InvalidEncoding);
    }
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;

    let mut parts = line.split_ascii_whitespace();

    let keyword = parts.next().ok_or(ParseError::Empty)?;
    let command = Command::from_keyword(keyword)
        .ok_or_else(|| ParseError::UnknownCommand(keyword.to_string()))?;

    let request = if command.takes_track_id() {
        let raw = parts.next().ok_or(ParseError::MissingTrackId)?;
        let id = raw
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidTrackId(raw.to_string()))?;

        match command {
            Command::Info => Request::Info(id),
            _ => Request::Play(id),
        }
    } else {
        Request::List
    };

    if parts.next().is_some() {
        return Err(ParseError::TrailingArguments);
    }

    Ok((request, line_end + 1))
}
