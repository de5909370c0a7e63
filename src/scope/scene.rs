//! Scene — everything drawn in one scope frame.
//!
//! A scene is rebuilt from scratch on every state change. It can be written
//! out as SVG markup or handed to JS as a serialized value.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::ScopeConfig;
use crate::dsp::composite::CompositeOscillator;
use crate::dsp::oscillator::{Sampleable, SineOscillator};

use super::sampler::{Polyline, sample_waveform};

pub const AXIS_CLASS: &str = "axis-line";
pub const LABEL_CLASS: &str = "time-scale-text";

/// Visual class of a trace: one of the four slots or the composite sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceClass {
    /// 1-based slot number.
    Slot(usize),
    Composite,
}

impl TraceClass {
    pub fn css_class(self) -> String {
        match self {
            TraceClass::Slot(n) => format!("line{n}"),
            TraceClass::Composite => "composite-line".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub class: String,
    /// SVG path data of the polyline.
    pub path: String,
    #[serde(skip)]
    pub polyline: Polyline,
}

impl Trace {
    fn sample<S: Sampleable + ?Sized>(class: TraceClass, source: &S, config: &ScopeConfig) -> Self {
        let polyline = sample_waveform(
            source,
            config.viewport,
            config.effective_time_scale(),
            config.value_scale,
        );
        Trace {
            class: class.css_class(),
            path: polyline.to_path_data(),
            polyline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: u32,
    pub height: f64,
    pub axis: AxisLine,
    /// Slot traces in display order, then the composite if present.
    pub traces: Vec<Trace>,
    pub label: Label,
}

impl Scene {
    /// Build the frame for a set of oscillators. The composite trace is only
    /// drawn when more than one oscillator is active.
    pub fn render(oscillators: &[Rc<SineOscillator>], config: &ScopeConfig) -> Self {
        let viewport = config.viewport;
        let time_scale = config.effective_time_scale();

        let mut traces: Vec<Trace> = oscillators
            .iter()
            .enumerate()
            .map(|(i, osc)| Trace::sample(TraceClass::Slot(i + 1), osc, config))
            .collect();
        if oscillators.len() > 1 {
            let composite = CompositeOscillator::from_slice(oscillators);
            traces.push(Trace::sample(TraceClass::Composite, &composite, config));
        }

        let mid_y = viewport.mid_y();
        Scene {
            width: viewport.width,
            height: viewport.height,
            axis: AxisLine {
                x1: 0.0,
                y1: mid_y,
                x2: viewport.width as f64,
                y2: mid_y,
            },
            traces,
            label: Label {
                x: viewport.width as f64 - 5.0,
                y: mid_y + 15.0,
                text: format!("{:.1} [ms]", time_scale),
            },
        }
    }

    pub fn has_composite(&self) -> bool {
        let composite = TraceClass::Composite.css_class();
        self.traces.iter().any(|t| t.class == composite)
    }

    /// Standalone SVG document; the axis comes first so it lies beneath the traces.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> Result<String, crate::error::ScopeError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            self.width, self.height
        )?;
        let a = &self.axis;
        writeln!(
            f,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" class="{AXIS_CLASS}"/>"#,
            a.x1, a.y1, a.x2, a.y2
        )?;
        for t in &self.traces {
            writeln!(f, r#"  <path class="{}" d="{}"/>"#, t.class, t.path)?;
        }
        writeln!(
            f,
            r#"  <text x="{}" y="{}" text-anchor="end" class="{LABEL_CLASS}">{}</text>"#,
            self.label.x, self.label.y, self.label.text
        )?;
        write!(f, "</svg>")
    }
}
