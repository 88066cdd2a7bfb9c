use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle, PlaybackStatus};
use crate::player::{Notification, PlaybackController, PlayerError, PlayerView, Transport};
use crate::runtime::mpris_sync::{playback_status, update_mpris};
use crate::ui;

/// Everything a key press, click or media key can ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    CursorNext,
    CursorPrev,
    CursorFirst,
    CursorLast,
    PlaySelected,
    Select(usize),
    TogglePlay,
    Play,
    Pause,
    Stop,
    NextTrack,
    PrevTrack,
    SeekFraction(f64),
    SeekBy(f64),
    ToggleDetails,
    CloseDetails,
}

/// What MPRIS last saw, so it is only told about real changes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MprisSnapshot {
    index: usize,
    status: PlaybackStatus,
    total: Option<u64>,
}

impl MprisSnapshot {
    fn of(view: &PlayerView) -> Self {
        Self {
            index: view.current_index,
            status: playback_status(view),
            total: view.total_seconds.map(f64::to_bits),
        }
    }
}

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Area of the last drawn frame, for mouse hit-testing.
    pub last_area: Rect,
    last_mpris: Option<MprisSnapshot>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            pending_gg: false,
            last_area: Rect::default(),
            last_mpris: None,
        }
    }
}

/// Main terminal event loop: drains transport notifications, draws, and
/// turns input and MPRIS commands into controller intents. Returns `Ok(())`
/// when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<T>,
    notifications: &mpsc::Receiver<Notification>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(n) = notifications.try_recv() {
            controller.handle(n);
        }
        controller.tick(Instant::now())?;

        let snapshot = MprisSnapshot::of(&controller.view());
        if state.last_mpris != Some(snapshot) {
            update_mpris(mpris, &controller.view());
            state.last_mpris = Some(snapshot);
        }

        terminal.draw(|f| {
            state.last_area = f.area();
            ui::draw(f, app, &controller.view(), &settings.ui, &settings.controls)
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            debug!(?cmd, "control command");
            if apply_action(control_action(cmd), app, controller)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    key_action(key, settings, app, state)
                }
                Event::Mouse(mouse) => mouse_action(mouse, app, &ui::layout(state.last_area)),
                _ => None,
            };
            if let Some(action) = action {
                app.clear_notice();
                if apply_action(action, app, controller)? {
                    return Ok(());
                }
            }
        }
    }
}

pub fn control_action(cmd: ControlCmd) -> Action {
    match cmd {
        ControlCmd::Quit => Action::Quit,
        ControlCmd::Play => Action::Play,
        ControlCmd::Pause => Action::Pause,
        ControlCmd::PlayPause => Action::TogglePlay,
        ControlCmd::Stop => Action::Stop,
        ControlCmd::Next => Action::NextTrack,
        ControlCmd::Prev => Action::PrevTrack,
    }
}

pub fn key_action(
    key: KeyEvent,
    settings: &config::Settings,
    app: &App,
    state: &mut EventLoopState,
) -> Option<Action> {
    let was_pending_gg = std::mem::take(&mut state.pending_gg);
    let scrub = settings.controls.scrub_seconds as f64;

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc if app.details_window => Some(Action::CloseDetails),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorPrev),
        KeyCode::Char('g') => {
            if was_pending_gg {
                Some(Action::CursorFirst)
            } else {
                state.pending_gg = true;
                None
            }
        }
        KeyCode::Char('G') => Some(Action::CursorLast),
        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePlay),
        KeyCode::Char('l') => Some(Action::NextTrack),
        KeyCode::Char('h') => Some(Action::PrevTrack),
        KeyCode::Char('L') | KeyCode::Right => Some(Action::SeekBy(scrub)),
        KeyCode::Char('H') | KeyCode::Left => Some(Action::SeekBy(-scrub)),
        KeyCode::Char(c @ '0'..='9') => {
            let decile = c.to_digit(10).unwrap_or(0);
            Some(Action::SeekFraction(f64::from(decile) / 10.0))
        }
        KeyCode::Char('K') => Some(Action::ToggleDetails),
        _ => None,
    }
}

pub fn mouse_action(mouse: MouseEvent, app: &App, layout: &ui::UiLayout) -> Option<Action> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    if let Some(fraction) = ui::progress_fraction_at(layout, mouse.column, mouse.row) {
        return Some(Action::SeekFraction(fraction));
    }
    ui::track_at(layout, app, mouse.column, mouse.row).map(Action::Select)
}

/// Apply `action`. Returns `Ok(true)` when the loop should exit.
///
/// Out-of-range selections are reported in the UI; a dead transport is fatal.
pub fn apply_action<T: Transport>(
    action: Action,
    app: &mut App,
    controller: &mut PlaybackController<T>,
) -> Result<bool, PlayerError> {
    let result = match action {
        Action::Quit => return Ok(true),
        Action::CursorNext => {
            app.next();
            Ok(())
        }
        Action::CursorPrev => {
            app.prev();
            Ok(())
        }
        Action::CursorFirst => {
            app.first();
            Ok(())
        }
        Action::CursorLast => {
            app.last();
            Ok(())
        }
        Action::ToggleDetails => {
            app.toggle_details_window();
            Ok(())
        }
        Action::CloseDetails => {
            app.details_window = false;
            Ok(())
        }
        Action::PlaySelected => controller.select_track(app.selected),
        Action::Select(i) => {
            app.set_selected(i);
            controller.select_track(i)
        }
        Action::TogglePlay => controller.toggle_play(),
        Action::Play => controller.play(),
        Action::Pause => controller.pause(),
        Action::Stop => controller
            .pause()
            .and_then(|_| controller.seek_to_fraction(0.0).map(|_| ())),
        Action::NextTrack => controller.next_track(),
        Action::PrevTrack => controller.previous_track(),
        Action::SeekFraction(f) => controller.seek_to_fraction(f).map(|_| ()),
        Action::SeekBy(delta) => controller.seek_by(delta).map(|_| ()),
    };

    if matches!(action, Action::NextTrack | Action::PrevTrack) {
        app.set_selected(controller.state().current_index);
    }

    match result {
        Ok(()) => Ok(false),
        Err(e @ PlayerError::InvalidTrackIndex { .. }) => {
            warn!(error = %e, "rejected selection");
            app.set_notice(e.to_string());
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
