//! DSP — oscillator model and tone synthesis.
//!
//! The oscillators here feed both the scope (via `Sampleable::value`) and the
//! audio output (via a `ToneSink`). The same code runs natively in tests and
//! in the browser through WASM.

pub mod composite;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
pub mod sink;
