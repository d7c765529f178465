use crate::{HabuError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Frames fed to rubato per call
const CHUNK_FRAMES: usize = 1024;

/// Incremental mono resampler for live microphone audio.
///
/// Device callbacks deliver arbitrary block sizes while rubato wants fixed
/// chunks, so leftover input is carried over to the next `push`.
pub struct StreamResampler {
    resampler: Option<SincFixedIn<f32>>,
    pending: Vec<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl StreamResampler {
    /// Create a resampler from `input_rate` to `output_rate`.
    ///
    /// Equal rates produce a pass-through resampler.
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(HabuError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resampler = if input_rate == output_rate {
            None
        } else {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };

            let resampler = SincFixedIn::<f32>::new(
                output_rate as f64 / input_rate as f64,
                2.0,
                params,
                CHUNK_FRAMES,
                1,
            )
            .map_err(|e| {
                HabuError::AudioProcessingError(format!("Failed to create resampler: {}", e))
            })?;
            Some(resampler)
        };

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            pending: Vec::new(),
            input_rate,
            output_rate,
        })
    }

    /// Feed mono samples, returning whatever output is ready
    pub fn push(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(input.to_vec());
        };

        self.pending.extend_from_slice(input);
        let mut output = Vec::new();

        loop {
            let needed = resampler.input_frames_next();
            if self.pending.len() < needed {
                break;
            }

            let chunk: Vec<f32> = self.pending.drain(..needed).collect();
            let processed = resampler
                .process(&[chunk], None)
                .map_err(|e| HabuError::AudioProcessingError(format!("Resampling failed: {}", e)))?;
            output.extend_from_slice(&processed[0]);
        }

        Ok(output)
    }

    /// Flush carried-over input, zero padded to a full chunk
    pub fn finish(&mut self) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(Vec::new());
        };
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let real_frames = self.pending.len();
        let mut chunk = std::mem::take(&mut self.pending);
        chunk.resize(resampler.input_frames_next(), 0.0);

        let processed = resampler
            .process(&[chunk], None)
            .map_err(|e| HabuError::AudioProcessingError(format!("Resampling failed: {}", e)))?;

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let keep = ((real_frames as f64) * ratio).ceil() as usize;
        Ok(processed[0].iter().take(keep).copied().collect())
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }
}
