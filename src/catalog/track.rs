//! A single streamable track.

use bytes::Bytes;
use std::io;
use std::path::PathBuf;

/// Where a track's bytes come from.
#[derive(Debug, Clone)]
pub enum TrackSource {
    /// Read from disk each time the track is requested.
    File(PathBuf),
    /// Held in memory.
    Memory(Bytes),
}

/// One entry of the catalog.
#[derive(Debug, Clone)]
pub struct Track {
    /// Position in the catalog, used by clients to request the track
    pub id: usize,

    /// File name, e.g. "song.mp3"
    pub name: String,

    pub source: TrackSource,

    /// Contents of the matching `.mp3.info` file, if there was one
    pub info: Option<String>,
}

impl Track {
    pub fn new(id: usize, name: impl Into<String>, source: TrackSource) -> Self {
        Self {
            id,
            name: name.into(),
            source,
            info: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Returns an owned copy of the track's bytes.
    pub fn load(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            TrackSource::File(path) => std::fs::read(path),
            TrackSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}
