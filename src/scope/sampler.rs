//! Waveform sampler — one screen-width of a signal as a polyline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Viewport;
use crate::dsp::oscillator::Sampleable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo,
    LineTo,
}

impl PathCommand {
    /// SVG path letter.
    pub fn letter(self) -> char {
        match self {
            PathCommand::MoveTo => 'M',
            PathCommand::LineTo => 'L',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub command: PathCommand,
    pub x: u32,
    pub y: f64,
}

/// A single connected path: one move followed by line segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<PathPoint>,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// SVG path data, e.g. `M 0, 250 L 1, 248.3`.
    pub fn to_path_data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{} {}, {}", p.command.letter(), p.x, p.y)?;
        }
        Ok(())
    }
}

/// Sample `source` across every pixel column of the viewport.
///
/// `time_scale_ms` is the time span of the whole width; `value_scale`
/// amplitude units fill half the height. Positive values draw upward.
pub fn sample_waveform<S: Sampleable + ?Sized>(
    source: &S,
    viewport: Viewport,
    time_scale_ms: f64,
    value_scale: f64,
) -> Polyline {
    let width = viewport.width;
    let mid_y = viewport.mid_y();
    let dt = (time_scale_ms / 1000.0) / width as f64;
    let dy = mid_y / value_scale;

    let points = (0..width)
        .map(|i| {
            let t = dt * i as f64;
            let value = source.value(t);
            PathPoint {
                command: if i == 0 {
                    PathCommand::MoveTo
                } else {
                    PathCommand::LineTo
                },
                x: i,
                y: mid_y - dy * value,
            }
        })
        .collect();

    Polyline { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::SineOscillator;
    use std::f64::consts::PI;

    struct Constant(f64);

    impl Sampleable for Constant {
        fn value(&self, _t: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn one_point_per_column_in_order() {
        let osc = SineOscillator::default();
        let line = sample_waveform(&osc, Viewport { width: 320, height: 200.0 }, 5.0, 4.0);

        assert_eq!(line.len(), 320);
        for (i, p) in line.points.iter().enumerate() {
            assert_eq!(p.x, i as u32);
            let expected = if i == 0 { PathCommand::MoveTo } else { PathCommand::LineTo };
            assert_eq!(p.command, expected, "point {i}");
        }
    }

    #[test]
    fn default_scope_scenario() {
        let osc = SineOscillator::new(440.0, 1.0);
        let viewport = Viewport { width: 800, height: 500.0 };
        let line = sample_waveform(&osc, viewport, 5.0, 4.0);

        let dt: f64 = 0.005 / 800.0;
        assert!((dt - 6.25e-6).abs() < 1e-18);

        assert_eq!(line.points[0].y, 250.0);

        let t = dt * 200.0;
        assert!((t - 1.25e-3).abs() < 1e-15);
        let value = osc.value(t);
        assert!((value - (-0.3090)).abs() < 1e-4, "value at i=200 should be ~-0.3090, got {value}");
        let dy = 250.0 / 4.0;
        assert!((line.points[200].y - (250.0 - dy * value)).abs() < 1e-9);
    }

    #[test]
    fn positive_values_draw_upward() {
        let viewport = Viewport { width: 4, height: 100.0 };
        let up = sample_waveform(&Constant(1.0), viewport, 5.0, 2.0);
        assert!(up.points.iter().all(|p| p.y == 25.0));
        let down = sample_waveform(&Constant(-2.0), viewport, 5.0, 2.0);
        assert!(down.points.iter().all(|p| p.y == 100.0));
    }

    #[test]
    fn time_scale_stretches_sampling() {
        let osc = SineOscillator::new(100.0, 1.0);
        let viewport = Viewport { width: 100, height: 200.0 };
        let line = sample_waveform(&osc, viewport, 50.0, 1.0);
        // 50 ms over 100 px: column 5 is t = 2.5 ms, a quarter period at 100 Hz.
        let expected = 100.0 - 100.0 * (2.0 * PI * 2.5e-3 * 100.0).sin();
        assert!((line.points[5].y - expected).abs() < 1e-9);
        assert!(line.points[5].y.abs() < 1e-9);
    }

    #[test]
    fn nan_frequency_trace_stays_finite() {
        let osc = SineOscillator::with_frequency(f64::NAN);
        let line = sample_waveform(&osc, Viewport { width: 8, height: 100.0 }, 5.0, 4.0);
        assert!(line.points.iter().all(|p| p.y == 50.0));
        assert!(!line.to_path_data().contains("NaN"));
    }

    #[test]
    fn zero_width_is_empty() {
        let line = sample_waveform(&Constant(1.0), Viewport { width: 0, height: 10.0 }, 5.0, 4.0);
        assert!(line.is_empty());
        assert_eq!(line.to_path_data(), "");
    }

    #[test]
    fn path_data_format() {
        let line = sample_waveform(&Constant(0.5), Viewport { width: 3, height: 8.0 }, 5.0, 1.0);
        assert_eq!(line.to_path_data(), "M 0, 2 L 1, 2 L 2, 2");
    }
}
