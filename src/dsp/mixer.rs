//! Mixer — turns the running sine voices into one mono block.

use super::sink::SineVoice;

/// Per-voice and master gain, with a tanh stage so four full-scale tones
/// never wrap around.
#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    pub voice_gain: f64,
    pub master_gain: f64,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            voice_gain: 0.25,
            master_gain: 0.8,
        }
    }

    /// Advance every voice by `frames` samples and return their mix.
    pub fn mix(&self, voices: &mut [SineVoice], sample_rate: f64, frames: usize) -> Vec<f64> {
        (0..frames)
            .map(|_| {
                let sum: f64 = voices
                    .iter_mut()
                    .map(|v| v.next_sample(sample_rate) * self.voice_gain)
                    .sum();
                (sum * self.master_gain).tanh()
            })
            .collect()
    }
}
