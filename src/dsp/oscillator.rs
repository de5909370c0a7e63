//! Sine oscillator model — the signal shown on the scope and the tone it plays.

use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

use crate::config::{DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY, MAX_FREQUENCY, MIN_FREQUENCY};

use super::sink::{ToneSink, VoiceHandle};

/// Anything whose instantaneous value can be sampled at time `t` (seconds).
pub trait Sampleable {
    fn value(&self, t: f64) -> f64;
}

impl<T: Sampleable + ?Sized> Sampleable for Rc<T> {
    fn value(&self, t: f64) -> f64 {
        (**self).value(t)
    }
}

/// Whether a frequency can be played. NaN never can.
pub fn is_valid_frequency(frequency: f64) -> bool {
    (MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency)
}

/// A sine-wave source with frequency and amplitude.
///
/// The voice it holds while playing lives in a `Cell` so that an oscillator
/// shared between scope snapshots can still be started and stopped.
#[derive(Debug)]
pub struct SineOscillator {
    frequency: f64,
    amplitude: f64,
    voice: Cell<Option<VoiceHandle>>,
}

impl Default for SineOscillator {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY, DEFAULT_AMPLITUDE)
    }
}

impl SineOscillator {
    /// Out-of-range frequencies are stored as given; they only disable playback.
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        SineOscillator {
            frequency,
            amplitude,
            voice: Cell::new(None),
        }
    }

    pub fn with_frequency(frequency: f64) -> Self {
        Self::new(frequency, DEFAULT_AMPLITUDE)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn is_valid_frequency(&self) -> bool {
        is_valid_frequency(self.frequency)
    }

    pub fn is_playing(&self) -> bool {
        self.voice.get().is_some()
    }

    /// The voice held on the sink, if playing.
    pub fn voice(&self) -> Option<VoiceHandle> {
        self.voice.get()
    }

    /// Start a tone at the current frequency. No-op if already playing or
    /// if the frequency is outside the playable range.
    pub fn play<S: ToneSink + ?Sized>(&self, sink: &mut S) {
        if self.is_playing() {
            return;
        }
        if !self.is_valid_frequency() {
            log::warn!("refusing to play invalid frequency {} Hz", self.frequency);
            return;
        }
        self.voice.set(Some(sink.start_tone(self.frequency)));
    }

    /// Stop and release the held voice, if any.
    pub fn pause<S: ToneSink + ?Sized>(&self, sink: &mut S) {
        if let Some(handle) = self.voice.take() {
            sink.stop_tone(handle);
        }
    }

    /// Change the frequency; a playing tone is restarted at the new pitch.
    pub fn set_frequency<S: ToneSink + ?Sized>(&mut self, frequency: f64, sink: &mut S) {
        self.frequency = frequency;
        if self.is_playing() {
            self.pause(sink);
            self.play(sink);
        }
    }
}

impl Sampleable for SineOscillator {
    /// A non-finite frequency (e.g. a cleared input field) reads as a flat line.
    fn value(&self, t: f64) -> f64 {
        if !self.frequency.is_finite() {
            return 0.0;
        }
        self.amplitude * (2.0 * PI * t * self.frequency).sin()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Sink double that records every start and stop.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub started: Vec<(VoiceHandle, f64)>,
        pub stopped: Vec<VoiceHandle>,
        next: u32,
    }

    impl RecordingSink {
        pub fn running(&self) -> usize {
            self.started.len() - self.stopped.len()
        }
    }

    impl ToneSink for RecordingSink {
        fn start_tone(&mut self, frequency: f64) -> VoiceHandle {
            let h = VoiceHandle(self.next);
            self.next += 1;
            self.started.push((h, frequency));
            h
        }

        fn stop_tone(&mut self, handle: VoiceHandle) {
            self.stopped.push(handle);
        }
    }

    #[test]
    fn value_matches_sine_formula() {
        let osc = SineOscillator::new(440.0, 0.5);
        for &t in &[0.0, 1.0e-4, 1.25e-3, 0.0123, 0.5] {
            let expected = 0.5 * (2.0 * PI * t * 440.0).sin();
            let got = osc.value(t);
            assert!((got - expected).abs() < 1e-12, "value({t}) = {got}, expected {expected}");
        }
    }

    #[test]
    fn defaults_are_440_unit_amplitude() {
        let osc = SineOscillator::default();
        assert_eq!(osc.frequency(), 440.0);
        assert_eq!(osc.amplitude(), 1.0);
        assert!(!osc.is_playing());
    }

    #[test]
    fn frequency_validity_boundaries() {
        assert!(SineOscillator::with_frequency(80.0).is_valid_frequency());
        assert!(SineOscillator::with_frequency(22100.0).is_valid_frequency());
        assert!(!SineOscillator::with_frequency(79.9).is_valid_frequency());
        assert!(!SineOscillator::with_frequency(22100.1).is_valid_frequency());
        assert!(!SineOscillator::with_frequency(f64::NAN).is_valid_frequency());
    }

    #[test]
    fn invalid_frequency_is_kept_and_still_drawable() {
        let osc = SineOscillator::with_frequency(20.0);
        assert_eq!(osc.frequency(), 20.0);
        let t = 0.01;
        assert!((osc.value(t) - (2.0 * PI * t * 20.0).sin()).abs() < 1e-12);
    }

    #[test]
    fn non_finite_frequency_draws_flat() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let osc = SineOscillator::with_frequency(f);
            assert!(!osc.is_valid_frequency());
            assert!(osc.frequency().is_nan() || osc.frequency().is_infinite(), "stored as given");
            assert_eq!(osc.value(0.0), 0.0);
            assert_eq!(osc.value(0.0042), 0.0);
        }
    }

    #[test]
    fn play_and_pause_hold_one_voice() {
        let mut sink = RecordingSink::default();
        let osc = SineOscillator::default();

        osc.play(&mut sink);
        osc.play(&mut sink);
        assert!(osc.is_playing());
        assert_eq!(sink.started.len(), 1, "second play should be a no-op");
        assert_eq!(sink.started[0].1, 440.0);

        osc.pause(&mut sink);
        osc.pause(&mut sink);
        assert!(!osc.is_playing());
        assert_eq!(sink.stopped, vec![sink.started[0].0]);
    }

    #[test]
    fn play_refused_for_invalid_frequency() {
        let mut sink = RecordingSink::default();
        let osc = SineOscillator::with_frequency(30000.0);
        osc.play(&mut sink);
        assert!(!osc.is_playing());
        assert!(sink.started.is_empty());
    }

    #[test]
    fn set_frequency_restarts_playing_tone() {
        let mut sink = RecordingSink::default();
        let mut osc = SineOscillator::default();
        osc.play(&mut sink);

        osc.set_frequency(880.0, &mut sink);
        assert!(osc.is_playing());
        assert_eq!(sink.stopped.len(), 1);
        assert_eq!(sink.started.len(), 2);
        assert_eq!(sink.started[1].1, 880.0);
        assert_eq!(sink.running(), 1);
    }

    #[test]
    fn set_frequency_on_silent_oscillator_stays_silent() {
        let mut sink = RecordingSink::default();
        let mut osc = SineOscillator::default();
        osc.set_frequency(660.0, &mut sink);
        assert!(!osc.is_playing());
        assert!(sink.started.is_empty());
    }

    #[test]
    fn set_invalid_frequency_while_playing_goes_silent() {
        let mut sink = RecordingSink::default();
        let mut osc = SineOscillator::default();
        osc.play(&mut sink);
        osc.set_frequency(10.0, &mut sink);
        assert!(!osc.is_playing());
        assert_eq!(sink.running(), 0);
    }
}
