// src/core/commands/status.rs

use super::Params;
use crate::core::handler::CommandContext;
use crate::core::protocol::AckError;
use std::collections::BTreeSet;

/// Reports the player status. Playback is not implemented, so everything but
/// the queue fields is fixed.
pub fn status(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    let (version, length) = {
        let playlist = ctx.state().playlist.lock();
        (playlist.version(), playlist.len())
    };
    Ok(vec![
        "volume: 100".to_string(),
        "repeat: 0".to_string(),
        "random: 0".to_string(),
        "single: 0".to_string(),
        "consume: 0".to_string(),
        format!("playlist: {version}"),
        format!("playlistlength: {length}"),
        "xfade: 0".to_string(),
        "state: stop".to_string(),
    ])
}

/// Reports catalog totals and the server uptime.
pub fn stats(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    let state = ctx.state();
    let tracks = state.catalog.tracks();

    let artists: BTreeSet<&str> = tracks.iter().filter_map(|t| t.artist.as_deref()).collect();
    let albums: BTreeSet<&str> = tracks.iter().filter_map(|t| t.album.as_deref()).collect();
    let db_playtime: u64 = tracks
        .iter()
        .filter_map(|t| t.duration)
        .map(u64::from)
        .sum();

    Ok(vec![
        format!("artists: {}", artists.len()),
        format!("albums: {}", albums.len()),
        format!("songs: {}", tracks.len()),
        format!("uptime: {}", state.started_at.elapsed().as_secs()),
        "playtime: 0".to_string(),
        format!("db_playtime: {db_playtime}"),
    ])
}
