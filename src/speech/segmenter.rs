//! Single-utterance segmentation over VAD decisions

use crate::audio::SPEECH_SAMPLE_RATE;
use crate::speech::stt::WhisperConfig;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Chunks of audio kept from before speech onset
const PRE_ROLL_CHUNKS: usize = 3;

/// What the segmenter decided after a chunk
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentStep {
    /// Keep feeding audio
    Listening,
    /// An utterance is complete
    Complete(Vec<f32>),
    /// Nobody spoke before the no-speech timeout
    NoSpeech,
}

/// Collects one utterance from a 16 kHz mono stream
#[derive(Debug)]
pub struct UtteranceSegmenter {
    silence_timeout: Duration,
    no_speech_timeout: Duration,
    min_utterance: Duration,
    max_utterance: Duration,

    pre_roll: VecDeque<Vec<f32>>,
    buffer: Vec<f32>,
    speech_samples: usize,
    in_speech: bool,
    silence: Duration,
    waited: Duration,
}

impl UtteranceSegmenter {
    pub fn new(config: &WhisperConfig) -> Self {
        Self {
            silence_timeout: config.silence_timeout,
            no_speech_timeout: config.no_speech_timeout,
            min_utterance: config.min_utterance,
            max_utterance: config.max_utterance,
            pre_roll: VecDeque::with_capacity(PRE_ROLL_CHUNKS),
            buffer: Vec::new(),
            speech_samples: 0,
            in_speech: false,
            silence: Duration::ZERO,
            waited: Duration::ZERO,
        }
    }

    pub fn is_in_speech(&self) -> bool {
        self.in_speech
    }

    /// Feed one chunk together with the VAD verdict for it
    pub fn push(&mut self, chunk: &[f32], is_speech: bool) -> SegmentStep {
        let chunk_duration = samples_to_duration(chunk.len());

        if !self.in_speech {
            if !is_speech {
                self.waited += chunk_duration;
                if self.pre_roll.len() == PRE_ROLL_CHUNKS {
                    self.pre_roll.pop_front();
                }
                self.pre_roll.push_back(chunk.to_vec());

                if self.waited >= self.no_speech_timeout {
                    debug!("No speech within {:?}", self.no_speech_timeout);
                    return SegmentStep::NoSpeech;
                }
                return SegmentStep::Listening;
            }

            debug!("Speech started after {:?}", self.waited);
            self.in_speech = true;
            self.silence = Duration::ZERO;
            self.buffer = self.pre_roll.drain(..).flatten().collect();
        }

        self.buffer.extend_from_slice(chunk);

        if is_speech {
            self.speech_samples += chunk.len();
            self.silence = Duration::ZERO;
        } else {
            self.silence += chunk_duration;
        }

        if samples_to_duration(self.buffer.len()) >= self.max_utterance {
            debug!("Maximum utterance duration reached");
            return SegmentStep::Complete(self.take_buffer());
        }

        if self.silence >= self.silence_timeout {
            if samples_to_duration(self.speech_samples) >= self.min_utterance {
                debug!("Trailing silence reached, utterance complete");
                return SegmentStep::Complete(self.take_buffer());
            }

            debug!("Utterance too short, discarding");
            self.waited += samples_to_duration(self.buffer.len());
            self.take_buffer();
            if self.waited >= self.no_speech_timeout {
                return SegmentStep::NoSpeech;
            }
        }

        SegmentStep::Listening
    }

    /// The stream ended; hand back whatever speech was collected
    pub fn finish(&mut self) -> Option<Vec<f32>> {
        if self.in_speech && samples_to_duration(self.speech_samples) >= self.min_utterance {
            Some(self.take_buffer())
        } else {
            None
        }
    }

    fn take_buffer(&mut self) -> Vec<f32> {
        self.in_speech = false;
        self.speech_samples = 0;
        self.silence = Duration::ZERO;
        self.pre_roll.clear();
        std::mem::take(&mut self.buffer)
    }
}

fn samples_to_duration(samples: usize) -> Duration {
    Duration::from_secs_f64(samples as f64 / SPEECH_SAMPLE_RATE as f64)
}
