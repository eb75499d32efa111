//! Track payload carried by bracket participants.

use serde::{Deserialize, Serialize};

/// Popularity assumed for tracks the music service reports without one.
pub const DEFAULT_POPULARITY: u32 = 30;

/// Track metadata as supplied by the playlist source.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Large cover image.
    #[serde(default)]
    pub album_art: String,
    /// Smallest cover image (thumbnails, blurred backgrounds).
    #[serde(default)]
    pub album_art_tiny: String,
    #[serde(default)]
    pub name: String,
    /// Artist names, comma separated.
    #[serde(default)]
    pub artist: String,
    /// Playable preview reference. May be empty.
    #[serde(default)]
    pub preview: String,
    /// Stable track reference used when exporting a playlist.
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

impl Track {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Builder-style popularity setter.
    pub fn with_popularity(mut self, popularity: u32) -> Self {
        self.popularity = Some(popularity);
        self
    }

    /// A track without a name is treated as an empty slot (bye).
    pub fn is_present(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn popularity_or_default(&self) -> u32 {
        self.popularity.unwrap_or(DEFAULT_POPULARITY)
    }
}
