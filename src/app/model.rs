//! Presentation-side state that is not part of playback: the list cursor,
//! popups and a transient status line.

/// The main application model.
pub struct App {
    pub selected: usize,
    track_count: usize,
    pub details_window: bool,
    /// One-off message shown in the status box until the next intent.
    pub notice: Option<String>,
}

impl App {
    /// Create a new `App` over a catalog of `track_count` tracks.
    pub fn new(track_count: usize) -> Self {
        Self {
            selected: 0,
            track_count,
            details_window: false,
            notice: None,
        }
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    /// Move the cursor to `idx`, ignoring indices outside the catalog.
    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.track_count {
            self.selected = idx;
        }
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        if self.track_count > 0 {
            self.selected = (self.selected + 1) % self.track_count;
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        if self.track_count > 0 {
            self.selected = match self.selected {
                0 => self.track_count - 1,
                n => n - 1,
            };
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.track_count.saturating_sub(1);
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
