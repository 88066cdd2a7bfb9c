use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::*;
use crate::catalog::{Catalog, Track};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetSource(SourceId, String),
    Play,
    Pause,
    SetPosition(f64),
    Release,
}

/// Transport double that records every command it receives.
#[derive(Clone, Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    disconnected: bool,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: Call) -> Result<(), TransportError> {
        if self.disconnected {
            return Err(TransportError::Disconnected);
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Transport for Recorder {
    fn set_source(&mut self, source: SourceId, audio_ref: &str) -> Result<(), TransportError> {
        self.push(Call::SetSource(source, audio_ref.to_string()))
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.push(Call::Play)
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        self.push(Call::Pause)
    }

    fn set_position(&mut self, seconds: f64) -> Result<(), TransportError> {
        self.push(Call::SetPosition(seconds))
    }

    fn release(&mut self) {
        self.calls.borrow_mut().push(Call::Release);
    }
}

fn t(id: u32, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: "Artist".into(),
        duration_label: "3:00".into(),
        cover_ref: String::new(),
        audio_ref: format!("{title}.wav"),
    }
}

fn catalog() -> Catalog {
    Catalog::new(vec![t(1, "one"), t(2, "two"), t(3, "three")]).unwrap()
}

fn mounted(delay: Duration) -> (PlaybackController<Recorder>, Recorder) {
    let rec = Recorder::default();
    let ctl = PlaybackController::mount(catalog(), rec.clone(), delay).unwrap();
    (ctl, rec)
}

fn loaded(ctl: &mut PlaybackController<Recorder>, duration: f64) {
    let source = ctl.source();
    ctl.handle(Notification::MetadataLoaded {
        source,
        duration_seconds: duration,
    });
}

#[test]
fn mount_attaches_first_track_without_playing() {
    let (ctl, rec) = mounted(Duration::ZERO);
    assert_eq!(*ctl.state(), PlaybackState::default());
    assert_eq!(ctl.state().phase(), Phase::Idle);
    assert!(ctl.state().is_loading());
    assert_eq!(
        rec.calls(),
        vec![Call::SetSource(ctl.source(), "one.wav".into())]
    );
}

#[test]
fn selecting_any_track_resets_progress() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    for i in 0..ctl.catalog().len() {
        loaded(&mut ctl, 180.0);
        let source = ctl.source();
        ctl.handle(Notification::PositionChanged {
            source,
            seconds: 42.0,
        });

        ctl.select_track(i).unwrap();
        assert_eq!(ctl.state().current_index, i);
        assert_eq!(ctl.state().position_seconds, 0.0);
        assert_eq!(ctl.state().total_seconds, None);
    }
}

#[test]
fn select_track_scenario_confirms_playing() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    rec.clear();

    ctl.select_track(2).unwrap();
    assert_eq!(ctl.state().current_index, 2);
    assert_eq!(ctl.state().position_seconds, 0.0);
    assert_eq!(
        rec.calls(),
        vec![
            Call::SetSource(ctl.source(), "three.wav".into()),
            Call::Play
        ]
    );

    let source = ctl.source();
    assert!(ctl.handle(Notification::PlayStateConfirmed {
        source,
        playing: true
    }));
    assert!(ctl.state().is_playing);
    assert_eq!(ctl.state().phase(), Phase::Active);
}

#[test]
fn out_of_range_selection_is_rejected() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    rec.clear();
    assert_eq!(
        ctl.select_track(3),
        Err(PlayerError::InvalidTrackIndex { index: 3, len: 3 })
    );
    assert_eq!(ctl.state().current_index, 0);
    assert!(rec.calls().is_empty());
}

#[test]
fn toggling_twice_from_idle_returns_to_idle() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    rec.clear();

    ctl.toggle_play().unwrap();
    assert_eq!(ctl.state().phase(), Phase::Active);
    ctl.toggle_play().unwrap();
    assert_eq!(ctl.state().phase(), Phase::Idle);

    assert_eq!(ctl.state().current_index, 0);
    assert_eq!(rec.calls(), vec![Call::Play, Call::Pause]);
}

#[test]
fn ended_always_goes_idle_at_zero() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    for playing in [true, false] {
        if playing {
            ctl.play().unwrap();
        }
        loaded(&mut ctl, 100.0);
        let source = ctl.source();
        ctl.handle(Notification::PositionChanged {
            source,
            seconds: 99.5,
        });
        ctl.handle(Notification::Ended { source });
        assert!(!ctl.state().is_playing);
        assert_eq!(ctl.state().position_seconds, 0.0);
    }
}

#[test]
fn seek_fraction_sets_position_when_duration_known() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    loaded(&mut ctl, 200.0);
    rec.clear();

    for f in [0.0, 0.1, 0.25, 0.5, 0.999, 1.0] {
        let target = ctl.seek_to_fraction(f).unwrap().unwrap();
        assert!((target - f * 200.0).abs() < 1e-9);
        assert!((ctl.state().position_seconds - f * 200.0).abs() < 1e-9);
    }
    assert_eq!(rec.calls().len(), 6);
}

#[test]
fn seek_is_ignored_while_duration_unknown() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    rec.clear();
    let before = ctl.state().clone();

    assert_eq!(ctl.seek_to_fraction(0.5).unwrap(), None);
    assert_eq!(ctl.seek_by(5.0).unwrap(), None);
    assert_eq!(*ctl.state(), before);
    assert!(rec.calls().is_empty());

    loaded(&mut ctl, 0.0);
    assert_eq!(ctl.seek_to_fraction(0.5).unwrap(), None);
}

#[test]
fn click_at_quarter_width_seeks_to_fifty_seconds() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    loaded(&mut ctl, 200.0);
    rec.clear();

    let f = fraction_from_offset(25.0, 100.0).unwrap();
    ctl.seek_to_fraction(f).unwrap();
    assert_eq!(ctl.state().position_seconds, 50.0);
    assert_eq!(rec.calls(), vec![Call::SetPosition(50.0)]);
}

#[test]
fn time_update_drives_progress() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    ctl.select_track(1).unwrap();
    loaded(&mut ctl, 245.0);
    let source = ctl.source();
    ctl.handle(Notification::PositionChanged {
        source,
        seconds: 122.5,
    });
    assert!((ctl.view().progress - 0.5).abs() < 1e-9);
}

#[test]
fn progress_is_zero_while_duration_unknown() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    let source = ctl.source();
    ctl.handle(Notification::PositionChanged {
        source,
        seconds: 12.0,
    });
    assert_eq!(ctl.state().position_seconds, 12.0);
    assert_eq!(ctl.view().progress, 0.0);
}

#[test]
fn stale_notifications_are_dropped() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    let old = ctl.source();
    ctl.select_track(1).unwrap();
    let before = ctl.state().clone();

    assert!(!ctl.handle(Notification::PlayStateConfirmed {
        source: old,
        playing: false
    }));
    assert!(!ctl.handle(Notification::MetadataLoaded {
        source: old,
        duration_seconds: 10.0
    }));
    assert!(!ctl.handle(Notification::Ended { source: old }));
    assert_eq!(*ctl.state(), before);
}

#[test]
fn late_pause_confirmation_overwrites_intent() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    ctl.play().unwrap();
    let source = ctl.source();
    ctl.handle(Notification::PlayStateConfirmed {
        source,
        playing: false,
    });
    assert!(!ctl.state().is_playing);
}

#[test]
fn load_failure_forces_idle_and_records_reason() {
    let (mut ctl, rec) = mounted(Duration::from_secs(60));
    ctl.select_track(2).unwrap();
    assert!(ctl.start_pending());

    let source = ctl.source();
    ctl.handle(Notification::LoadFailed {
        source,
        reason: "no such file".into(),
    });
    assert!(!ctl.state().is_playing);
    assert!(!ctl.start_pending());
    assert_eq!(ctl.last_error(), Some("no such file"));
    assert_eq!(ctl.view().last_error, Some("no such file"));

    rec.clear();
    ctl.tick(Instant::now() + Duration::from_secs(120)).unwrap();
    assert!(rec.calls().is_empty());

    ctl.select_track(0).unwrap();
    assert_eq!(ctl.last_error(), None);
}

#[test]
fn confirmed_playback_clears_previous_error() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    let source = ctl.source();
    ctl.handle(Notification::LoadFailed {
        source,
        reason: "device busy".into(),
    });
    assert_eq!(ctl.last_error(), Some("device busy"));

    ctl.play().unwrap();
    ctl.handle(Notification::PlayStateConfirmed {
        source,
        playing: false,
    });
    assert_eq!(ctl.last_error(), Some("device busy"));

    ctl.handle(Notification::PlayStateConfirmed {
        source,
        playing: true,
    });
    assert_eq!(ctl.last_error(), None);
    assert_eq!(ctl.view().last_error, None);
}

#[test]
fn view_reports_phase_and_loading() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    let view = ctl.view();
    assert_eq!(view.phase, Phase::Idle);
    assert!(view.loading);

    ctl.select_track(1).unwrap();
    loaded(&mut ctl, 120.0);
    let view = ctl.view();
    assert_eq!(view.phase, Phase::Active);
    assert!(!view.loading);
}

#[test]
fn deferred_start_is_issued_once_after_delay() {
    let (mut ctl, rec) = mounted(Duration::from_secs(5));
    ctl.select_track(1).unwrap();
    assert!(ctl.state().is_playing);
    rec.clear();

    ctl.tick(Instant::now()).unwrap();
    assert!(rec.calls().is_empty());

    let later = Instant::now() + Duration::from_secs(6);
    ctl.tick(later).unwrap();
    ctl.tick(later).unwrap();
    assert_eq!(rec.calls(), vec![Call::Play]);
}

#[test]
fn pause_before_deferred_start_cancels_it() {
    let (mut ctl, rec) = mounted(Duration::from_secs(5));
    ctl.select_track(1).unwrap();
    ctl.toggle_play().unwrap();
    rec.clear();

    ctl.tick(Instant::now() + Duration::from_secs(6)).unwrap();
    assert!(rec.calls().is_empty());
    assert_eq!(ctl.state().phase(), Phase::Idle);
}

#[test]
fn next_and_previous_wrap_around_catalog() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    ctl.previous_track().unwrap();
    assert_eq!(ctl.state().current_index, 2);
    ctl.next_track().unwrap();
    assert_eq!(ctl.state().current_index, 0);
}

#[test]
fn seek_by_clamps_within_track() {
    let (mut ctl, _rec) = mounted(Duration::ZERO);
    loaded(&mut ctl, 100.0);
    assert_eq!(ctl.seek_by(-10.0).unwrap(), Some(0.0));
    assert_eq!(ctl.seek_by(30.0).unwrap(), Some(30.0));
    assert_eq!(ctl.seek_by(500.0).unwrap(), Some(100.0));
}

#[test]
fn disconnected_transport_surfaces_error() {
    let rec = Recorder::default();
    let mut ctl = PlaybackController::mount(catalog(), rec.clone(), Duration::ZERO).unwrap();
    *ctl.transport_mut() = Recorder {
        calls: rec.calls.clone(),
        disconnected: true,
    };
    assert_eq!(
        ctl.toggle_play(),
        Err(PlayerError::Transport(TransportError::Disconnected))
    );
    assert!(!ctl.state().is_playing);
}

#[test]
fn release_happens_once_including_drop() {
    let (mut ctl, rec) = mounted(Duration::ZERO);
    ctl.release();
    ctl.release();
    drop(ctl);
    let releases = rec
        .calls()
        .into_iter()
        .filter(|c| *c == Call::Release)
        .count();
    assert_eq!(releases, 1);
}

#[test]
fn format_time_boundaries() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(59.0), "0:59");
    assert_eq!(format_time(59.9), "0:59");
    assert_eq!(format_time(60.0), "1:00");
    assert_eq!(format_time(3661.0), "61:01");
    assert_eq!(format_time(-3.0), "0:00");
    assert_eq!(format_time(f64::NAN), "0:00");
}

#[test]
fn fraction_from_offset_clamps_and_rejects_empty_surface() {
    assert_eq!(fraction_from_offset(50.0, 200.0), Some(0.25));
    assert_eq!(fraction_from_offset(-5.0, 200.0), Some(0.0));
    assert_eq!(fraction_from_offset(500.0, 200.0), Some(1.0));
    assert_eq!(fraction_from_offset(10.0, 0.0), None);
    assert_eq!(fraction_from_offset(f64::NAN, 10.0), None);
}
