//! Server configuration.
//!
//! The port and music directory come from the command line. Everything else
//! lives in an optional YAML tuning file named by `JUKEBOX_TUNING`.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

/// Environment variable naming the YAML tuning file.
pub const TUNING_ENV: &str = "JUKEBOX_TUNING";

pub const DEFAULT_CHUNK_SIZE: usize = 4096;
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024;
pub const DEFAULT_EVENTS_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub music_dir: PathBuf,
    pub tuning: Tuning,
}

/// Knobs that are uniform across every connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Address the listener binds to.
    pub bind_host: String,
    /// Upper bound on the bytes handed to a single write attempt.
    pub chunk_size: usize,
    /// A request line longer than this is rejected.
    pub max_request_size: usize,
    /// Readiness notifications fetched per wakeup.
    pub events_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            events_capacity: DEFAULT_EVENTS_CAPACITY,
        }
    }
}

impl Tuning {
    /// Parses a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_yaml::from_str(yaml).context("invalid tuning file")?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Loads the file named by `JUKEBOX_TUNING`, or the defaults when unset.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(TUNING_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            bail!("chunk_size must be at least 1");
        }
        if self.max_request_size == 0 {
            bail!("max_request_size must be at least 1");
        }
        if self.events_capacity == 0 {
            bail!("events_capacity must be at least 1");
        }
        Ok(())
    }
}

impl Config {
    /// Builds the configuration from `argv`, program name included.
    ///
    /// Expects exactly `<port> <file-directory>` after the program name.
    pub fn from_args<I>(args: I, tuning: Tuning) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let program = args.first().map(String::as_str).unwrap_or("jukebox");

        if args.len() != 3 {
            bail!("usage: {} <port> <file-directory>", program);
        }

        let port = args[1]
            .parse::<u16>()
            .with_context(|| format!("invalid port: {}", args[1]))?;

        let music_dir = PathBuf::from(&args[2]);
        if !music_dir.is_dir() {
            bail!("{} is not a directory", music_dir.display());
        }

        Ok(Self {
            port,
            music_dir,
            tuning,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.tuning.bind_host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("cannot resolve {}", self.tuning.bind_host))?
            .next()
            .with_context(|| format!("no address for {}", self.tuning.bind_host))
    }
}
