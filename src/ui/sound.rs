/// Sound cues: soft procedural chimes via rodio.
///
/// All cues are rendered to in-memory WAV buffers at startup.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;
use crate::sim::session::GameOverCause;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::wave;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_capture: Arc<Vec<u8>>,
        sfx_level_start: Arc<Vec<u8>>,
        sfx_level_clear: Arc<Vec<u8>>,
        sfx_time_up: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_capture: Arc::new(wave::make_wav(&wave::capture())),
                sfx_level_start: Arc::new(wave::make_wav(&wave::level_start())),
                sfx_level_clear: Arc::new(wave::make_wav(&wave::level_clear())),
                sfx_time_up: Arc::new(wave::make_wav(&wave::time_up())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_capture(&self) { self.play(&self.sfx_capture); }
        pub fn play_level_start(&self) { self.play(&self.sfx_level_start); }
        pub fn play_level_clear(&self) { self.play(&self.sfx_level_clear); }
        pub fn play_time_up(&self) { self.play(&self.sfx_time_up); }
    }
}

/// Waveform generators. Mono f32 samples in [-1, 1].
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod wave {
    use std::f32::consts::TAU;

    pub const SAMPLE_RATE: u32 = 22050;

    /// One note: sine plus a touch of octave, with a power-curve decay.
    fn note(freq: f32, secs: f32, volume: f32, decay: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powf(decay);
                let w = (t * freq * TAU).sin() * 0.8 + (t * freq * 2.0 * TAU).sin() * 0.2;
                w * env * volume
            })
            .collect()
    }

    fn melody(notes: &[(f32, f32)], volume: f32, decay: f32) -> Vec<f32> {
        notes.iter().flat_map(|&(f, d)| note(f, d, volume, decay)).collect()
    }

    /// Flower caught: bright two-note sparkle E6→B6.
    pub fn capture() -> Vec<f32> {
        melody(&[(1319.0, 0.04), (1976.0, 0.09)], 0.22, 1.5)
    }

    /// New level: single soft bell A5.
    pub fn level_start() -> Vec<f32> {
        note(880.0, 0.2, 0.2, 2.0)
    }

    /// Level complete: rising arpeggio C5 E5 G5 C6 with a held top note.
    pub fn level_clear() -> Vec<f32> {
        melody(&[(523.0, 0.09), (659.0, 0.09), (784.0, 0.09), (1047.0, 0.35)], 0.25, 0.7)
    }

    /// Time's up: slow falling third G4→Eb4.
    pub fn time_up() -> Vec<f32> {
        melody(&[(392.0, 0.22), (311.0, 0.4)], 0.28, 0.5)
    }

    /// Wrap samples in a 16-bit PCM mono WAV container.
    pub fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits: u16 = 16;
        let block_align: u16 = bits / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_capture(&self) {}
    pub fn play_level_start(&self) {}
    pub fn play_level_clear(&self) {}
    pub fn play_time_up(&self) {}
}

/// Map one frame's events to cues.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::FlowerCaptured { .. } => sfx.play_capture(),
            GameEvent::LevelStarted { .. } => sfx.play_level_start(),
            GameEvent::LevelComplete { .. } => sfx.play_level_clear(),
            GameEvent::GameOver { cause: GameOverCause::TimeUp } => sfx.play_time_up(),
            GameEvent::GameOver { cause: GameOverCause::AllCaptured } => sfx.play_level_clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::wave;

    #[test]
    fn wav_header_is_well_formed() {
        let samples = wave::capture();
        let wav = wave::make_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
        assert_eq!(data_len, samples.len() * 2);
        assert_eq!(wav.len(), 44 + data_len);
    }

    #[test]
    fn cues_stay_in_range() {
        for cue in [wave::capture(), wave::level_start(), wave::level_clear(), wave::time_up()] {
            assert!(!cue.is_empty());
            assert!(cue.iter().all(|s| s.abs() <= 1.0));
        }
    }
}
