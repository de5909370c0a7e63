//! Scope — sampling oscillators into drawable frames and the control
//! surface that drives them.

pub mod sampler;
pub mod scene;
pub mod state;

pub use sampler::{PathCommand, PathPoint, Polyline, sample_waveform};
pub use scene::{Scene, Trace, TraceClass};
pub use state::ScopeState;
