use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;
use crate::player::PlaybackController;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings);
    settings::report_config_problem(config_problem.as_deref());

    let catalog = settings.build_catalog()?;
    info!(tracks = catalog.len(), media_dir = %settings.media_dir().display(), "starting");

    let (audio_player, notifications) =
        AudioPlayer::new(settings.audio.clone(), settings.media_dir());
    let mut controller = PlaybackController::mount(
        catalog,
        audio_player,
        Duration::from_millis(settings.playback.start_delay_ms),
    )?;

    let mut app = App::new(controller.catalog().len());
    if let Some(problem) = config_problem {
        app.set_notice(problem);
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    startup::apply_playback_defaults(&mut controller, &settings)?;
    app.set_selected(controller.state().current_index);
    mpris_sync::update_mpris(&mpris, &controller.view());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut controller,
            &notifications,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    // Fades out and joins the audio thread before the terminal is restored.
    controller.release();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    info!("shutdown");
    run_result
}
