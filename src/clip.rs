use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClipError {
    #[error("clip has no samples")]
    Empty,
    #[error("sample rate must be positive")]
    ZeroSampleRate,
}

/// An immutable mono PCM clip: float samples in [-1, 1] plus a sample rate.
///
/// Construction validates the two preconditions the analyzer relies on
/// (non-empty samples, positive sample rate). Everything downstream reads
/// the clip without mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, ClipError> {
        if samples.is_empty() {
            return Err(ClipError::Empty);
        }
        if sample_rate == 0 {
            return Err(ClipError::ZeroSampleRate);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Clip length in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed clip.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
