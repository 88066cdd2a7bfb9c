//! rodio-backed audio transport.
//!
//! A dedicated thread owns the output stream and the current `Sink`. The UI
//! side talks to it through [`AudioPlayer`], which implements
//! [`crate::player::Transport`], and hears back through a channel of
//! [`crate::player::Notification`]s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
