//! Square current pulse descriptors and their expansion into dense
//! per-sample current traces.

use crate::error::StimulusError;


/// A square current injection described by amplitude, onset delay and duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquarePulse {
    /// Injected current amplitude (nA)
    pub amplitude: f64,
    /// Time before the pulse turns on (ms)
    pub delay: f64,
    /// Time the pulse stays on (ms)
    pub duration: f64,
}

impl SquarePulse {
    /// Creates a validated square pulse
    pub fn new(amplitude: f64, delay: f64, duration: f64) -> Result<Self, StimulusError> {
        if !amplitude.is_finite() {
            return Err(StimulusError::NonFiniteAmplitude);
        }
        if delay < 0. || duration < 0. || !delay.is_finite() || !duration.is_finite() {
            return Err(StimulusError::NegativePulseTiming);
        }

        Ok(SquarePulse { amplitude, delay, duration })
    }

    /// Total stimulated time spanned by the pulse (ms)
    pub fn total_time(&self) -> f64 {
        self.delay + self.duration
    }

    /// Expands the pulse into a dense trace with one sample per `dt`,
    /// zero before the onset, the amplitude for the duration samples
    /// and zero afterwards
    pub fn to_current_trace(&self, dt: f64) -> Result<Vec<f64>, StimulusError> {
        if dt <= 0. || !dt.is_finite() {
            return Err(StimulusError::NonPositiveTimestep);
        }

        let total_samples = (self.total_time() / dt).round() as usize;
        let onset = (self.delay / dt).round() as usize;
        let offset = onset + (self.duration / dt).round() as usize;

        let mut current = vec![0.; total_samples];
        for (i, value) in current.iter_mut().enumerate() {
            if i >= onset && i < offset {
                *value = self.amplitude;
            }
        }

        Ok(current)
    }
}
