use anyhow::Context;
use jukebox::catalog::Catalog;
use jukebox::config::{Config, Tuning};
use jukebox::server::Server;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let tuning = Tuning::load()?;
    let cfg = Config::from_args(std::env::args(), tuning)?;

    let catalog = Catalog::scan(&cfg.music_dir)
        .with_context(|| format!("failed to scan {}", cfg.music_dir.display()))?;

    tracing::info!("Found {} songs", catalog.len());
    for track in catalog.iter() {
        match &track.info {
            Some(info) => tracing::info!(id = track.id, info = %info.trim_end(), "{}", track.name),
            None => tracing::info!(id = track.id, "{}", track.name),
        }
    }

    let mut server = Server::bind(cfg.listen_addr()?, catalog, cfg.tuning)?;
    server.run()
}
