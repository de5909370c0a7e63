pub mod config;
pub mod dsp;
pub mod error;
pub mod scope;

use crate::config::{ScopeConfig, TimeScaleRatio};
use crate::dsp::renderer::render_wav;
use crate::dsp::sink::{ToneBank, ToneCommand, ToneQueue};
use crate::error::ScopeError;
use crate::scope::ScopeState;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn to_js(e: ScopeError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: return the wavescope-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: install the panic hook and route `log` to the browser console.
#[wasm_bindgen]
pub fn scope_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

/// WASM-exposed, main thread: the oscilloscope page's state.
///
/// Each action swaps in the next `ScopeState` snapshot; JS re-renders from
/// `render_svg()` or `scene()` afterwards. Voice starts and stops are queued;
/// the page drains them with `take_tone_commands()` and posts them to the
/// AudioWorklet running a [`ToneEngine`].
#[wasm_bindgen]
pub struct WaveScope {
    state: ScopeState,
    queue: ToneQueue,
}

#[wasm_bindgen]
impl WaveScope {
    #[wasm_bindgen(constructor)]
    pub fn new(window_width: u32) -> WaveScope {
        WaveScope {
            state: ScopeState::default().with_window_width(window_width),
            queue: ToneQueue::new(),
        }
    }

    pub fn oscillator_count(&self) -> usize {
        self.state.len()
    }

    pub fn can_add(&self) -> bool {
        self.state.can_add()
    }

    pub fn can_remove(&self, index: usize) -> bool {
        self.state.can_remove(index)
    }

    pub fn frequency(&self, index: usize) -> Result<f64, JsValue> {
        Ok(self.state.oscillator(index).map_err(to_js)?.frequency())
    }

    pub fn is_playing(&self, index: usize) -> Result<bool, JsValue> {
        Ok(self.state.oscillator(index).map_err(to_js)?.is_playing())
    }

    pub fn is_valid_frequency(&self, index: usize) -> Result<bool, JsValue> {
        Ok(self.state.oscillator(index).map_err(to_js)?.is_valid_frequency())
    }

    pub fn slot_label(&self, index: usize) -> Result<String, JsValue> {
        self.state.slot_label(index).map_err(to_js)
    }

    pub fn slot_class(&self, index: usize) -> Result<String, JsValue> {
        self.state.slot_class(index).map_err(to_js)
    }

    pub fn add_oscillator(&mut self) {
        self.state = self.state.with_added_oscillator();
    }

    pub fn remove_oscillator(&mut self, index: usize) -> Result<(), JsValue> {
        self.state = self
            .state
            .with_removed_oscillator(index, &mut self.queue)
            .map_err(to_js)?;
        Ok(())
    }

    pub fn set_frequency(&mut self, index: usize, frequency: f64) -> Result<(), JsValue> {
        self.state = self
            .state
            .with_frequency(index, frequency, &mut self.queue)
            .map_err(to_js)?;
        Ok(())
    }

    pub fn toggle_playback(&mut self, index: usize) -> Result<(), JsValue> {
        self.state = self
            .state
            .with_toggled_playback(index, &mut self.queue)
            .map_err(to_js)?;
        Ok(())
    }

    pub fn stop_all(&mut self) {
        self.state.stop_all(&mut self.queue);
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.state = self.state.with_time_scale(time_scale);
    }

    /// `ratio` is the raw multiplier, 1 or 10.
    pub fn set_time_scale_ratio(&mut self, ratio: u32) -> Result<(), JsValue> {
        let ratio = TimeScaleRatio::try_from(ratio).map_err(to_js)?;
        self.state = self.state.with_time_scale_ratio(ratio);
        Ok(())
    }

    pub fn resize(&mut self, window_width: u32) {
        self.state = self.state.with_window_width(window_width);
    }

    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.state.config()).map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: ScopeConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| to_js(ScopeError::Config(e.to_string())))?;
        self.state = self.state.with_config(config).map_err(to_js)?;
        Ok(())
    }

    pub fn render_svg(&self) -> String {
        self.state.scene().to_svg()
    }

    pub fn scene(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.scene()).map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    /// Queued voice commands as an array of `{type, voice, frequency?}`
    /// objects, ready for `port.postMessage`.
    pub fn take_tone_commands(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.drain_tone_commands())
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }
}

impl WaveScope {
    pub fn state(&self) -> &ScopeState {
        &self.state
    }

    pub fn drain_tone_commands(&mut self) -> Vec<ToneCommand> {
        self.queue.drain()
    }
}

/// WASM-exposed, AudioWorklet side: applies the commands posted by the page
/// and renders the running voices.
#[wasm_bindgen]
pub struct ToneEngine {
    bank: ToneBank,
}

#[wasm_bindgen]
impl ToneEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f64) -> ToneEngine {
        ToneEngine {
            bank: ToneBank::new(sample_rate),
        }
    }

    /// Apply an array of commands taken from `WaveScope::take_tone_commands`.
    pub fn apply_commands(&mut self, commands: JsValue) -> Result<(), JsValue> {
        let commands: Vec<ToneCommand> = serde_wasm_bindgen::from_value(commands)
            .map_err(|e| to_js(ScopeError::Config(e.to_string())))?;
        self.apply_all(&commands);
        Ok(())
    }

    pub fn active_voices(&self) -> usize {
        self.bank.active_voices()
    }

    /// Next block of mono f32 samples, for `process()`.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        self.bank.render(frames)
    }

    /// `seconds` of the running voices as a WAV byte array.
    pub fn render_wav(&mut self, seconds: f64) -> Result<Vec<u8>, JsValue> {
        render_wav(&mut self.bank, seconds).map_err(to_js)
    }
}

impl ToneEngine {
    pub fn apply_all(&mut self, commands: &[ToneCommand]) {
        self.bank.apply_all(commands);
    }
}
