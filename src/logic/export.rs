//! Export of a finished ranking: playlist payload and CSV.

use crate::models::{BracketError, Participant, Track};
use serde::{Deserialize, Serialize};

/// What the playlist sink receives: a name and track URIs, best first.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlaylistExport {
    pub name: String,
    pub uris: Vec<String>,
}

/// `Ranked Playlist - <today>` in local time.
pub fn default_playlist_name() -> String {
    format!("Ranked Playlist - {}", chrono::Local::now().format("%Y-%m-%d"))
}

/// Build the export payload. An empty placement list is rejected.
pub fn build_playlist_export(
    name: Option<&str>,
    placements: &[Participant<Track>],
) -> Result<PlaylistExport, BracketError> {
    if placements.is_empty() {
        return Err(BracketError::EmptyExportSet);
    }
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default_playlist_name(),
    };
    Ok(PlaylistExport {
        name,
        uris: placements.iter().map(|p| p.payload.uri.clone()).collect(),
    })
}

#[derive(Serialize)]
struct PlacementRow<'a> {
    rank: usize,
    seed: usize,
    name: &'a str,
    artist: &'a str,
    uri: &'a str,
}

/// One CSV row per placement: `rank,seed,name,artist,uri` with a header line.
pub fn placements_to_csv(placements: &[Participant<Track>]) -> Result<String, BracketError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (i, p) in placements.iter().enumerate() {
        writer.serialize(PlacementRow {
            rank: i + 1,
            seed: p.seed,
            name: &p.payload.name,
            artist: &p.payload.artist,
            uri: &p.payload.uri,
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| BracketError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BracketError::Csv(e.to_string()))
}
