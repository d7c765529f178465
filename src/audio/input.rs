use crate::audio::downmix_to_mono;
use crate::{HabuError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Default system microphone delivering mono f32 blocks.
///
/// cpal streams are not `Send` on every backend, so a `MicrophoneInput` must
/// be created, started and dropped on the same thread.
pub struct MicrophoneInput {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
}

impl MicrophoneInput {
    /// Whether the host exposes a default input device at all
    pub fn is_present() -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    /// Open the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| HabuError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_input_config().map_err(|e| {
            HabuError::AudioDeviceError(format!("Failed to get input config: {}", e))
        })?;

        Ok(Self {
            device,
            sample_format: supported.sample_format(),
            config: supported.into(),
            stream: None,
        })
    }

    /// Get the sample rate of the input device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start streaming mono blocks into `audio_tx`.
    ///
    /// Errors raised by the running stream are forwarded to `error_tx`.
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>, error_tx: Sender<String>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(audio_tx, error_tx),
            SampleFormat::I16 => self.build_stream::<i16>(audio_tx, error_tx),
            SampleFormat::U16 => self.build_stream::<u16>(audio_tx, error_tx),
            other => Err(HabuError::AudioDeviceError(format!(
                "Unsupported sample format: {:?}",
                other
            ))),
        }?;

        stream.play().map_err(|e| {
            HabuError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        self.stream = Some(stream);
        info!("Started microphone stream");
        Ok(())
    }

    fn build_stream<T>(&self, audio_tx: Sender<Vec<f32>>, error_tx: Sender<String>) -> Result<Stream>
    where
        T: cpal::SizedSample,
        f32: cpal::FromSample<T>,
    {
        let channels = self.config.channels as usize;

        self.device
            .build_input_stream(
                &self.config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f32> = data
                        .iter()
                        .map(|&s| <f32 as cpal::FromSample<T>>::from_sample_(s))
                        .collect();

                    if let Err(e) = audio_tx.try_send(downmix_to_mono(&samples, channels)) {
                        debug!("Failed to send audio data: {}", e);
                    }
                },
                move |err| {
                    error!("Audio input stream error: {}", err);
                    let _ = error_tx.try_send(err.to_string());
                },
                None,
            )
            .map_err(|e| {
                HabuError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })
    }

    /// Stop the stream
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("Stopped microphone stream");
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for MicrophoneInput {
    fn drop(&mut self) {
        self.stop();
    }
}
