//! Tone sink — the audio output boundary oscillators start and stop voices on.
//!
//! In the browser the scope state lives on the main thread while audio is
//! rendered inside an AudioWorklet with its own wasm instance. The two sides
//! are bridged by `ToneCommand`s:
//!
//! - **main thread** owns a [`ToneQueue`]; oscillators start/stop voices on it
//!   and the page posts the drained commands to the worklet's message port
//! - **audio thread** owns a [`ToneBank`]; it applies the commands and renders
//!   the running voices into PCM blocks
//!
//! `ToneBank` is also a `ToneSink` on its own, for native and offline use.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::mixer::Mixer;

/// Opaque handle to a running voice held by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceHandle(pub u32);

/// A sound-output sink able to run continuous sine tones.
pub trait ToneSink {
    /// Start a continuous sine tone and return the handle of its voice.
    fn start_tone(&mut self, frequency: f64) -> VoiceHandle;
    /// Stop and release a voice. Unknown handles are ignored.
    fn stop_tone(&mut self, handle: VoiceHandle);
}

/// A voice change sent from the control side to the audio side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToneCommand {
    Start { voice: VoiceHandle, frequency: f64 },
    Stop { voice: VoiceHandle },
}

// ── Control side ────────────────────────────────────────────

/// Main-thread sink: hands out voice handles and queues the commands that
/// the audio side has to apply.
#[derive(Debug, Clone, Default)]
pub struct ToneQueue {
    pending: Vec<ToneCommand>,
    next_id: u32,
}

impl ToneQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands not yet taken.
    pub fn pending(&self) -> &[ToneCommand] {
        &self.pending
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> Vec<ToneCommand> {
        std::mem::take(&mut self.pending)
    }
}

impl ToneSink for ToneQueue {
    fn start_tone(&mut self, frequency: f64) -> VoiceHandle {
        let voice = VoiceHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(ToneCommand::Start { voice, frequency });
        voice
    }

    fn stop_tone(&mut self, handle: VoiceHandle) {
        self.pending.push(ToneCommand::Stop { voice: handle });
    }
}

// ── Audio side ──────────────────────────────────────────────

/// One running sine tone, as a phase accumulator.
#[derive(Debug, Clone)]
pub struct SineVoice {
    handle: VoiceHandle,
    frequency: f64,
    phase: f64,
}

impl SineVoice {
    pub fn new(handle: VoiceHandle, frequency: f64) -> Self {
        SineVoice {
            handle,
            frequency,
            phase: 0.0,
        }
    }

    pub fn handle(&self) -> VoiceHandle {
        self.handle
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn next_sample(&mut self, sample_rate: f64) -> f64 {
        let sample = (2.0 * PI * self.phase).sin();
        self.phase += self.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }
}

/// Software tone sink that synthesizes its running voices.
#[derive(Debug, Clone)]
pub struct ToneBank {
    sample_rate: f64,
    pub mixer: Mixer,
    voices: Vec<SineVoice>,
    next_id: u32,
}

impl ToneBank {
    pub fn new(sample_rate: f64) -> Self {
        ToneBank {
            sample_rate,
            mixer: Mixer::new(),
            voices: Vec::new(),
            next_id: 0,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of voices currently running.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn is_active(&self, handle: VoiceHandle) -> bool {
        self.voices.iter().any(|v| v.handle == handle)
    }

    /// Frequency of a running voice.
    pub fn frequency_of(&self, handle: VoiceHandle) -> Option<f64> {
        self.voices
            .iter()
            .find(|v| v.handle == handle)
            .map(|v| v.frequency)
    }

    /// Apply one command from the control side. A start for a handle that
    /// is already running retunes it in place.
    pub fn apply(&mut self, command: &ToneCommand) {
        match *command {
            ToneCommand::Start { voice, frequency } => {
                self.voices.retain(|v| v.handle != voice);
                self.voices.push(SineVoice::new(voice, frequency));
                log::info!("voice {} started at {frequency} Hz", voice.0);
            }
            ToneCommand::Stop { voice } => {
                let before = self.voices.len();
                self.voices.retain(|v| v.handle != voice);
                if self.voices.len() < before {
                    log::info!("voice {} stopped", voice.0);
                }
            }
        }
    }

    pub fn apply_all(&mut self, commands: &[ToneCommand]) {
        for c in commands {
            self.apply(c);
        }
    }

    /// Render the next `frames` mono samples of all running voices.
    pub fn render_f64(&mut self, frames: usize) -> Vec<f64> {
        self.mixer.mix(&mut self.voices, self.sample_rate, frames)
    }

    /// Render the next `frames` mono samples as f32 for an AudioWorklet.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        self.render_f64(frames).iter().map(|&s| s as f32).collect()
    }
}

impl ToneSink for ToneBank {
    fn start_tone(&mut self, frequency: f64) -> VoiceHandle {
        let voice = VoiceHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.apply(&ToneCommand::Start { voice, frequency });
        voice
    }

    fn stop_tone(&mut self, handle: VoiceHandle) {
        self.apply(&ToneCommand::Stop { voice: handle });
    }
}
