use std::fmt;

#[derive(Debug)]
pub enum ScopeError {
    /// A slot index that does not address an active oscillator.
    SlotOutOfRange { index: usize, len: usize },
    /// A time-scale multiplier other than ×1 or ×10.
    InvalidTimeScaleRatio(u32),
    /// A value scale that is not a positive finite number.
    InvalidValueScale(f64),
    /// A configuration document that could not be decoded.
    Config(String),
    /// WAV encoding failed.
    Wav(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::SlotOutOfRange { index, len } => {
                write!(f, "Oscillator slot {index} out of range (have {len})")
            }
            ScopeError::InvalidTimeScaleRatio(ratio) => {
                write!(f, "Invalid time scale ratio x{ratio}, expected x1 or x10")
            }
            ScopeError::InvalidValueScale(scale) => {
                write!(f, "Invalid value scale {scale}, expected a positive number")
            }
            ScopeError::Config(msg) => write!(f, "Config error: {msg}"),
            ScopeError::Wav(msg) => write!(f, "WAV error: {msg}"),
        }
    }
}

impl std::error::Error for ScopeError {}

impl From<serde_json::Error> for ScopeError {
    fn from(e: serde_json::Error) -> Self {
        ScopeError::Config(e.to_string())
    }
}

impl From<hound::Error> for ScopeError {
    fn from(e: hound::Error) -> Self {
        ScopeError::Wav(e.to_string())
    }
}
