//! Scope configuration — time scale, value scale and drawing viewport.

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// Lowest audible frequency accepted for playback, in Hz.
pub const MIN_FREQUENCY: f64 = 80.0;
/// Highest audible frequency accepted for playback, in Hz.
pub const MAX_FREQUENCY: f64 = 22_100.0;

pub const MIN_TIME_SCALE: f64 = 1.0;
pub const MAX_TIME_SCALE: f64 = 100.0;

/// Slot 1 is permanent, slots 2–4 can be added and removed.
pub const MAX_OSCILLATORS: usize = 4;

pub const DEFAULT_FREQUENCY: f64 = 440.0;
pub const DEFAULT_AMPLITUDE: f64 = 1.0;

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: f64 = 500.0;
/// Height/width ratio used when the viewport shrinks to a narrow window.
const NARROW_ASPECT: f64 = 0.75;

// ── Time Scale Ratio ────────────────────────────────────────

/// Multiplier applied on top of the time scale slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeScaleRatio {
    #[default]
    #[serde(rename = "x1")]
    X1,
    #[serde(rename = "x10")]
    X10,
}

impl TimeScaleRatio {
    pub fn factor(self) -> f64 {
        match self {
            TimeScaleRatio::X1 => 1.0,
            TimeScaleRatio::X10 => 10.0,
        }
    }
}

impl TryFrom<u32> for TimeScaleRatio {
    type Error = ScopeError;

    fn try_from(ratio: u32) -> Result<Self, Self::Error> {
        match ratio {
            1 => Ok(TimeScaleRatio::X1),
            10 => Ok(TimeScaleRatio::X10),
            other => Err(ScopeError::InvalidTimeScaleRatio(other)),
        }
    }
}

// ── Viewport ────────────────────────────────────────────────

/// Fixed-size drawing region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    /// Fit the default 800×500 region into a window of the given width.
    /// Narrower windows get the full window width at a 4:3 aspect.
    pub fn fit(window_width: u32) -> Self {
        if window_width < DEFAULT_WIDTH {
            Viewport {
                width: window_width,
                height: window_width as f64 * NARROW_ASPECT,
            }
        } else {
            Viewport::default()
        }
    }

    /// Vertical position of the zero axis.
    pub fn mid_y(&self) -> f64 {
        self.height / 2.0
    }
}

// ── Scope Configuration ─────────────────────────────────────

/// Rendering configuration of the scope. Never affects audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Time span across the viewport in milliseconds, in [1, 100].
    pub time_scale: f64,
    pub time_scale_ratio: TimeScaleRatio,
    /// Amplitude units mapped onto half the viewport height.
    pub value_scale: f64,
    pub viewport: Viewport,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        ScopeConfig {
            time_scale: 5.0,
            time_scale_ratio: TimeScaleRatio::X1,
            value_scale: 4.0,
            viewport: Viewport::default(),
        }
    }
}

impl ScopeConfig {
    /// Effective time span per frame in milliseconds.
    pub fn effective_time_scale(&self) -> f64 {
        self.time_scale * self.time_scale_ratio.factor()
    }

    /// Clamp the time scale into its slider range and reject value scales
    /// that would divide the viewport by zero or a negative.
    pub fn validated(mut self) -> Result<Self, ScopeError> {
        if !(self.value_scale.is_finite() && self.value_scale > 0.0) {
            return Err(ScopeError::InvalidValueScale(self.value_scale));
        }
        self.time_scale = clamp_time_scale(self.time_scale);
        Ok(self)
    }

    /// Decode a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ScopeError> {
        let config: ScopeConfig = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn to_json(&self) -> Result<String, ScopeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Clamp a requested time scale into the slider range. NaN falls back to the minimum.
pub fn clamp_time_scale(time_scale: f64) -> f64 {
    if time_scale.is_nan() {
        MIN_TIME_SCALE
    } else {
        time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
    }
}
