use thiserror::Error;

/// Identity of one attached audio source.
///
/// A new id is handed out every time a track is selected; notifications
/// carrying an older id describe a resource that is no longer attached.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceId(pub u64);

impl SourceId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("audio transport is no longer running")]
    Disconnected,
}

/// Commands understood by an audio-playback primitive.
///
/// All commands are fire-and-forget: their effect is observed later through
/// [`Notification`]s. The only synchronous failure is a transport that has
/// gone away.
pub trait Transport {
    /// Detach the current resource and attach `audio_ref`, tagged as `source`.
    /// Position and duration are unknown until the transport reports them.
    fn set_source(&mut self, source: SourceId, audio_ref: &str) -> Result<(), TransportError>;
    fn play(&mut self) -> Result<(), TransportError>;
    fn pause(&mut self) -> Result<(), TransportError>;
    fn set_position(&mut self, seconds: f64) -> Result<(), TransportError>;
    /// Release the attached resource and stop emitting notifications.
    fn release(&mut self);
}

/// Facts reported by the transport about a given source.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PositionChanged { source: SourceId, seconds: f64 },
    MetadataLoaded { source: SourceId, duration_seconds: f64 },
    Ended { source: SourceId },
    PlayStateConfirmed { source: SourceId, playing: bool },
    LoadFailed { source: SourceId, reason: String },
}

impl Notification {
    pub fn source(&self) -> SourceId {
        match self {
            Self::PositionChanged { source, .. }
            | Self::MetadataLoaded { source, .. }
            | Self::Ended { source }
            | Self::PlayStateConfirmed { source, .. }
            | Self::LoadFailed { source, .. } => *source,
        }
    }
}
