//! Commands sent to the audio thread and the errors it can report.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::player::SourceId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Drop the current sink and open `path` as `source`, paused at zero.
    SetSource { source: SourceId, path: PathBuf },
    /// Start or resume the attached source.
    Play,
    /// Pause the attached source.
    Pause,
    /// Move the playhead of the attached source.
    Seek(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
