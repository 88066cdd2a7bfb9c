use std::path::{Path, PathBuf};

use super::player::resolve_audio_ref;
use super::sink::probe_duration;

/// Minimal 16-bit mono PCM WAV holding `seconds` of silence at 8 kHz.
fn silent_wav(seconds: u32) -> Vec<u8> {
    let sample_rate: u32 = 8000;
    let data_len = sample_rate * 2 * seconds;
    let mut b = Vec::with_capacity(44 + data_len as usize);
    b.extend_from_slice(b"RIFF");
    b.extend_from_slice(&(36 + data_len).to_le_bytes());
    b.extend_from_slice(b"WAVE");
    b.extend_from_slice(b"fmt ");
    b.extend_from_slice(&16u32.to_le_bytes());
    b.extend_from_slice(&1u16.to_le_bytes()); // PCM
    b.extend_from_slice(&1u16.to_le_bytes()); // mono
    b.extend_from_slice(&sample_rate.to_le_bytes());
    b.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    b.extend_from_slice(&2u16.to_le_bytes());
    b.extend_from_slice(&16u16.to_le_bytes());
    b.extend_from_slice(b"data");
    b.extend_from_slice(&data_len.to_le_bytes());
    b.resize(44 + data_len as usize, 0);
    b
}

#[test]
fn relative_refs_resolve_under_media_dir() {
    assert_eq!(
        resolve_audio_ref(Path::new("/srv/media"), "a/b.wav"),
        PathBuf::from("/srv/media/a/b.wav")
    );
}

#[test]
fn absolute_refs_are_kept() {
    assert_eq!(
        resolve_audio_ref(Path::new("/srv/media"), "/tmp/x.flac"),
        PathBuf::from("/tmp/x.flac")
    );
}

#[test]
fn probe_duration_reads_wav_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.wav");
    std::fs::write(&path, silent_wav(2)).unwrap();

    let d = probe_duration(&path).unwrap();
    assert_eq!(d.as_secs(), 2);
}

#[test]
fn probe_duration_of_missing_file_is_none() {
    assert!(probe_duration(Path::new("/nonexistent/nocturne/none.wav")).is_none());
}
