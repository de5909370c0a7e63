//! Scope state — the control surface behind the oscilloscope page.
//!
//! Every user action produces a new `ScopeState` snapshot. Oscillators an
//! action does not touch are shared with the previous snapshot by `Rc`, so
//! their identity (and any voice they hold) carries over.

use std::rc::Rc;

use crate::config::{
    MAX_OSCILLATORS, ScopeConfig, TimeScaleRatio, Viewport, clamp_time_scale,
};
use crate::dsp::composite::CompositeOscillator;
use crate::dsp::oscillator::SineOscillator;
use crate::dsp::sink::ToneSink;
use crate::error::ScopeError;

use super::scene::{Scene, TraceClass};

#[derive(Debug, Clone)]
pub struct ScopeState {
    oscillators: Vec<Rc<SineOscillator>>,
    config: ScopeConfig,
}

impl Default for ScopeState {
    fn default() -> Self {
        ScopeState {
            oscillators: vec![Rc::new(SineOscillator::default())],
            config: ScopeConfig::default(),
        }
    }
}

impl ScopeState {
    /// A scope with the permanent first oscillator at its defaults.
    pub fn new(config: ScopeConfig) -> Result<Self, ScopeError> {
        Ok(ScopeState {
            config: config.validated()?,
            ..Self::default()
        })
    }

    pub fn oscillators(&self) -> &[Rc<SineOscillator>] {
        &self.oscillators
    }

    pub fn oscillator(&self, index: usize) -> Result<&Rc<SineOscillator>, ScopeError> {
        self.oscillators.get(index).ok_or(ScopeError::SlotOutOfRange {
            index,
            len: self.oscillators.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.oscillators.len()
    }

    /// Always false; slot 1 can't be removed.
    pub fn is_empty(&self) -> bool {
        self.oscillators.is_empty()
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// The visual sum, only when more than one oscillator is active.
    pub fn composite(&self) -> Option<CompositeOscillator> {
        (self.oscillators.len() > 1).then(|| CompositeOscillator::from_slice(&self.oscillators))
    }

    pub fn can_add(&self) -> bool {
        self.oscillators.len() < MAX_OSCILLATORS
    }

    pub fn can_remove(&self, index: usize) -> bool {
        index != 0 && index < self.oscillators.len()
    }

    /// Heading shown above an active slot's controls.
    pub fn slot_label(&self, index: usize) -> Result<String, ScopeError> {
        self.oscillator(index)?;
        Ok(format!("Oscillator {}", index + 1))
    }

    /// CSS class shared by an active slot's trace and its heading color.
    pub fn slot_class(&self, index: usize) -> Result<String, ScopeError> {
        self.oscillator(index)?;
        Ok(TraceClass::Slot(index + 1).css_class())
    }

    fn with_oscillators(&self, oscillators: Vec<Rc<SineOscillator>>) -> Self {
        ScopeState {
            oscillators,
            config: self.config.clone(),
        }
    }

    fn with_config_unchecked(&self, config: ScopeConfig) -> Self {
        ScopeState {
            oscillators: self.oscillators.clone(),
            config,
        }
    }

    // ── Oscillator actions ──────────────────────────────────

    /// Append a silent default oscillator. Ignored at the four-slot cap.
    pub fn with_added_oscillator(&self) -> Self {
        if !self.can_add() {
            log::debug!("add ignored: already {} oscillators", self.oscillators.len());
            return self.clone();
        }
        let mut oscillators = self.oscillators.clone();
        oscillators.push(Rc::new(SineOscillator::default()));
        log::debug!("added oscillator {}", oscillators.len());
        self.with_oscillators(oscillators)
    }

    /// Remove a slot, stopping its tone first. Slot 1 is never removed.
    pub fn with_removed_oscillator<S: ToneSink + ?Sized>(
        &self,
        index: usize,
        sink: &mut S,
    ) -> Result<Self, ScopeError> {
        let target = self.oscillator(index)?;
        if index == 0 {
            log::debug!("remove ignored for the primary oscillator");
            return Ok(self.clone());
        }
        target.pause(sink);

        let mut oscillators = self.oscillators.clone();
        oscillators.remove(index);
        log::debug!("removed oscillator {}", index + 1);
        Ok(self.with_oscillators(oscillators))
    }

    /// Replace a slot with a new oscillator at `frequency`. A playing slot
    /// keeps sounding at the new pitch (if it is playable).
    pub fn with_frequency<S: ToneSink + ?Sized>(
        &self,
        index: usize,
        frequency: f64,
        sink: &mut S,
    ) -> Result<Self, ScopeError> {
        let current = self.oscillator(index)?;
        let replacement = Rc::new(SineOscillator::new(frequency, current.amplitude()));
        if current.is_playing() {
            current.pause(sink);
            replacement.play(sink);
        }

        let mut oscillators = self.oscillators.clone();
        oscillators[index] = replacement;
        log::debug!("oscillator {} set to {frequency} Hz", index + 1);
        Ok(self.with_oscillators(oscillators))
    }

    /// Pause a playing slot or start a silent one.
    pub fn with_toggled_playback<S: ToneSink + ?Sized>(
        &self,
        index: usize,
        sink: &mut S,
    ) -> Result<Self, ScopeError> {
        let osc = self.oscillator(index)?;
        if osc.is_playing() {
            osc.pause(sink);
        } else {
            osc.play(sink);
        }
        Ok(self.clone())
    }

    /// Silence every slot.
    pub fn stop_all<S: ToneSink + ?Sized>(&self, sink: &mut S) {
        for osc in &self.oscillators {
            osc.pause(sink);
        }
    }

    // ── Display configuration ───────────────────────────────

    pub fn with_time_scale(&self, time_scale: f64) -> Self {
        let mut config = self.config.clone();
        config.time_scale = clamp_time_scale(time_scale);
        self.with_config_unchecked(config)
    }

    pub fn with_time_scale_ratio(&self, ratio: TimeScaleRatio) -> Self {
        let mut config = self.config.clone();
        config.time_scale_ratio = ratio;
        self.with_config_unchecked(config)
    }

    /// Fit the viewport to a window width.
    pub fn with_window_width(&self, window_width: u32) -> Self {
        let mut config = self.config.clone();
        config.viewport = Viewport::fit(window_width);
        self.with_config_unchecked(config)
    }

    pub fn with_config(&self, config: ScopeConfig) -> Result<Self, ScopeError> {
        Ok(self.with_config_unchecked(config.validated()?))
    }

    /// Render the current frame.
    pub fn scene(&self) -> Scene {
        Scene::render(&self.oscillators, &self.config)
    }
}
