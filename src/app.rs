//! Application module: exposes the presentation model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor and the
//! view toggles. Playback state itself lives in the controller.

mod model;

pub use model::*;
