//! Microphone capture primitives used by the local speech recognizer

#[cfg(feature = "audio-io")]
pub mod input;
pub mod resampler;
pub mod vad;

#[cfg(feature = "audio-io")]
pub use input::MicrophoneInput;
pub use resampler::StreamResampler;
pub use vad::VoiceActivityDetector;

/// Sample rate Whisper and Silero VAD expect
pub const SPEECH_SAMPLE_RATE: u32 = 16_000;

/// Average interleaved frames down to mono
pub fn downmix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
