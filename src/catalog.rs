//! Track catalog: the static, ordered list of playable tracks.
//!
//! The catalog is built once at startup (either the compiled-in tracks or
//! an override from the config file) and never changes afterwards, so
//! track indices are stable for the whole session.

mod builtin;
mod model;

pub use builtin::builtin_tracks;
pub use model::*;
