//! Track catalog
//!
//! Built once at startup from a directory scan and only read afterwards.

pub mod track;

pub use track::{Track, TrackSource};

use anyhow::Context;
use std::fmt::Write as _;
use std::path::Path;

const TRACK_EXTENSION: &str = "mp3";
const INFO_SUFFIX: &str = ".info";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Renumbers the given tracks by position.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let tracks = tracks
            .into_iter()
            .enumerate()
            .map(|(id, track)| Track { id, ..track })
            .collect();

        Self { tracks }
    }

    /// Collects every `.mp3` file in `dir`, ordered by file name.
    ///
    /// A sibling `<name>.mp3.info` file supplies the track's description.
    pub fn scan(dir: &Path) -> anyhow::Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to list {}", dir.display()))?
                .path();

            let is_track = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(TRACK_EXTENSION));

            if is_track {
                files.push(path);
            }
        }
        files.sort();

        let mut tracks = Vec::with_capacity(files.len());
        for (id, path) in files.into_iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let info_path = dir.join(format!("{name}{INFO_SUFFIX}"));
            let info = if info_path.is_file() {
                let text = std::fs::read_to_string(&info_path)
                    .with_context(|| format!("failed to read {}", info_path.display()))?;
                Some(text)
            } else {
                None
            };

            tracing::debug!(id, name = %name, has_info = info.is_some(), "Found track");

            tracks.push(Track {
                id,
                name,
                source: TrackSource::File(path),
                info,
            });
        }

        Ok(Self { tracks })
    }

    pub fn get(&self, id: usize) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// One `<id> <name>` line per track.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for track in &self.tracks {
            let _ = writeln!(out, "{} {}", track.id, track.name);
        }
        out
    }
}
