use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// A single playable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub artist: String,
    /// Pre-formatted length shown in the list. The real duration comes from
    /// the transport once metadata has loaded.
    pub duration_label: String,
    /// Opaque artwork reference (path or URL). Only ever displayed.
    #[serde(default)]
    pub cover_ref: String,
    /// Opaque audio reference, interpreted by the transport.
    pub audio_ref: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must contain at least one track")]
    Empty,
    #[error("duplicate track id {0}")]
    DuplicateId(u32),
}

/// Non-empty, ordered, id-unique list of tracks.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for t in &tracks {
            if !seen.insert(t.id) {
                return Err(CatalogError::DuplicateId(t.id));
            }
        }

        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the track after `index`, wrapping to the first one.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    /// Index of the track before `index`, wrapping to the last one.
    pub fn prev_index(&self, index: usize) -> usize {
        if index == 0 || index >= self.tracks.len() {
            self.tracks.len() - 1
        } else {
            index - 1
        }
    }
}
