//! Playback controller and the transport seam it drives.
//!
//! The controller owns the intended playback state (current track, playing
//! flag) and mirrors the authoritative state (position, duration) reported
//! back by a [`Transport`] through [`Notification`]s.

mod controller;
mod seek;
mod state;
mod time;
mod transport;

pub use controller::*;
pub use seek::*;
pub use state::*;
pub use time::*;
pub use transport::*;

#[cfg(test)]
mod tests;
