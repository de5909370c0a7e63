//! WAV renderer — offline export of what a tone bank is currently playing.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::ScopeError;

use super::sink::ToneBank;

/// Render `seconds` of the bank's running voices as 16-bit mono PCM WAV.
///
/// Advances the bank, so a following `render` continues where this one ends.
pub fn render_wav(bank: &mut ToneBank, seconds: f64) -> Result<Vec<u8>, ScopeError> {
    let frames = (bank.sample_rate() * seconds.max(0.0)).round() as usize;
    let spec = WavSpec {
        channels: 1,
        sample_rate: bank.sample_rate() as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for s in bank.render_f64(frames) {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f64) as i16)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::sink::ToneSink;
    use hound::WavReader;

    #[test]
    fn wav_header_valid() {
        let mut bank = ToneBank::new(22050.0);
        let wav = render_wav(&mut bank, 0.1).expect("render failed");

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let reader = WavReader::new(Cursor::new(wav)).expect("readable wav");
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
    }

    #[test]
    fn wav_length_matches_duration() {
        let mut bank = ToneBank::new(44100.0);
        let wav = render_wav(&mut bank, 0.5).unwrap();
        let reader = WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.len(), 22050);
    }

    #[test]
    fn playing_tone_is_not_silent() {
        let mut bank = ToneBank::new(22050.0);
        bank.start_tone(440.0);
        let wav = render_wav(&mut bank, 0.1).unwrap();

        let mut reader = WavReader::new(Cursor::new(wav)).unwrap();
        let has_nonzero = reader
            .samples::<i16>()
            .any(|s| s.map(|v| v != 0).unwrap_or(false));
        assert!(has_nonzero, "Rendered WAV should contain non-silent audio");
    }
}
