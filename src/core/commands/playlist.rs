// src/core/commands/playlist.rs

//! Queue commands backed by the shared `Playlist` and the media catalog.

use super::{CommandId, Params};
use crate::core::handler::CommandContext;
use crate::core::library::PlaylistEntry;
use crate::core::metrics;
use crate::core::protocol::{AckError, AckKind};

pub fn playlistinfo(
    ctx: &mut CommandContext<'_>,
    params: &Params,
) -> Result<Vec<String>, AckError> {
    let playlist = ctx.state().playlist.lock();
    match params.get("pos") {
        Some(pos) => {
            let entry = pos
                .parse::<usize>()
                .ok()
                .and_then(|position| playlist.get(position).map(|entry| (position, entry)));
            match entry {
                Some((position, entry)) => Ok(entry_lines(position, entry)),
                None => Err(AckError::new(
                    AckKind::Arg,
                    CommandId::PlaylistInfo.name(),
                    "Bad song index",
                )),
            }
        }
        None => Ok(playlist
            .entries()
            .iter()
            .enumerate()
            .flat_map(|(position, entry)| entry_lines(position, entry))
            .collect()),
    }
}

pub fn add(ctx: &mut CommandContext<'_>, params: &Params) -> Result<Vec<String>, AckError> {
    let uri = params.get("uri").map(String::as_str).unwrap_or_default();
    let Some(track) = ctx.state().catalog.get(uri) else {
        return Err(AckError::new(
            AckKind::NoExist,
            CommandId::Add.name(),
            "No such song",
        ));
    };

    let added = ctx.state().mutate_playlist(|playlist| {
        let id = playlist.add(track);
        metrics::PLAYLIST_LENGTH.set(playlist.len() as f64);
        id
    });
    match added {
        Some(_) => Ok(Vec::new()),
        None => Err(AckError::new(
            AckKind::PlaylistMax,
            CommandId::Add.name(),
            "Playlist is too large",
        )),
    }
}

pub fn clear(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    ctx.state().mutate_playlist(|playlist| {
        playlist.clear();
        metrics::PLAYLIST_LENGTH.set(0.0);
    });
    Ok(Vec::new())
}

fn entry_lines(position: usize, entry: &PlaylistEntry) -> Vec<String> {
    let mut lines = entry.track.to_lines();
    lines.push(format!("Pos: {position}"));
    lines.push(format!("Id: {}", entry.id));
    lines
}
