use ratatui::{Terminal, backend::TestBackend, layout::Rect};

use super::*;
use crate::catalog::{Catalog, builtin_tracks};
use crate::player::seek_target;

fn view_of(catalog: &Catalog) -> PlayerView<'_> {
    PlayerView {
        catalog,
        current_index: 0,
        is_playing: false,
        phase: Phase::Idle,
        loading: true,
        position_seconds: 0.0,
        total_seconds: None,
        progress: 0.0,
        last_error: None,
    }
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn progress_row_sits_inside_the_card() {
    let ui = layout(Rect::new(0, 0, 80, 30));
    assert_eq!(ui.progress.height, 1);
    assert!(ui.progress.y > ui.card.y && ui.progress.y < ui.card.y + ui.card.height);
    assert!(ui.progress.width > 0 && ui.progress.width < ui.card.width);
}

#[test]
fn click_on_progress_maps_to_fraction() {
    // 104 columns minus borders and padding leaves a 100-cell bar.
    let ui = layout(Rect::new(0, 0, 104, 30));
    let p = ui.progress;
    assert_eq!(p.width, 100);

    assert_eq!(progress_fraction_at(&ui, p.x, p.y), Some(0.0));

    let f = progress_fraction_at(&ui, p.x + 25, p.y).unwrap();
    assert_eq!(f, 0.25);
    assert_eq!(seek_target(f, Some(200.0)), Some(50.0));

    assert_eq!(progress_fraction_at(&ui, p.x + 99, p.y), Some(0.99));

    assert!(progress_fraction_at(&ui, p.x, p.y + 1).is_none());
    assert!(progress_fraction_at(&ui, p.x + p.width, p.y).is_none());
}

#[test]
fn click_on_list_row_maps_to_track() {
    let ui = layout(Rect::new(0, 0, 80, 30));
    let app = App::new(3);
    let top = ui.list.y + 1;

    assert_eq!(track_at(&ui, &app, ui.list.x + 2, top), Some(0));
    assert_eq!(track_at(&ui, &app, ui.list.x + 2, top + 2), Some(2));
    // Below the last track.
    assert_eq!(track_at(&ui, &app, ui.list.x + 2, top + 3), None);
    // On the border.
    assert_eq!(track_at(&ui, &app, ui.list.x, top), None);
}

#[test]
fn visible_window_centers_selection() {
    assert_eq!(visible_window(3, 10, 1), (0, 3, 1));
    assert_eq!(visible_window(100, 10, 50), (45, 55, 5));
    assert_eq!(visible_window(100, 10, 99), (90, 100, 9));
}

#[test]
fn time_labels_show_placeholder_until_metadata() {
    let catalog = Catalog::new(builtin_tracks()).unwrap();
    let mut view = view_of(&catalog);
    view.position_seconds = 61.4;
    assert_eq!(time_labels(&view), ("1:01".to_string(), "-:--".to_string()));

    view.total_seconds = Some(225.0);
    assert_eq!(time_labels(&view), ("1:01".to_string(), "3:45".to_string()));
}

#[test]
fn progress_bar_fills_proportionally() {
    let line = progress_bar(0.5, 10);
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "━━━━●─────");

    let empty = progress_bar(0.0, 4);
    let text: String = empty.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "────");
}

#[test]
fn draw_renders_catalog_and_error() {
    let catalog = Catalog::new(builtin_tracks()).unwrap();
    let mut view = view_of(&catalog);
    view.last_error = Some("cannot open media/cosmic-journey.wav");

    let app = App::new(catalog.len());
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| {
            draw(
                f,
                &app,
                &view,
                &UiSettings::default(),
                &ControlsSettings::default(),
            )
        })
        .unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("Cosmic Journey"));
    assert!(text.contains("Urban Beat"));
    assert!(text.contains("[4:12]"));
    assert!(text.contains("Error: cannot open"));
    assert!(text.contains("Paused"));
}
