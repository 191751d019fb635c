//! Spiking neuron backends behind a shared set of capability traits.
//!
//! Every backend answers a square current injection with a membrane
//! potential trace and a list of spike times. The capabilities are split
//! so a caller can depend on exactly the operations it needs: stimulation
//! ([`ReceivesSquareCurrent`]), voltage readout
//! ([`ProducesMembranePotential`]), spike readout ([`ProducesSpikes`]) and
//! parameter-space search ([`Optimizable`]). A [`NeuronModel`] composes a
//! backend with a name instead of inheriting from it, so the same fitting
//! machinery drives every model family.

/// Multi-timescale adaptive threshold neuron with exact linear propagation
pub mod mat;
/// Izhikevich neuron stepped with Euler integration
pub mod izhikevich;
/// Adaptive exponential integrate-and-fire neuron
pub mod adex;

use rayon::prelude::*;
use crate::error::AdaptiveThresholdError;
use crate::stimulus::SquarePulse;


/// Parameters used in generating noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParameters {
    /// Mean of distribution
    pub mean: f64,
    /// Standard deviation of distribution
    pub std: f64,
    /// Maximum cutoff value
    pub max: f64,
    /// Minimum cutoff value
    pub min: f64,
}

impl Default for GaussianParameters {
    fn default() -> Self {
        GaussianParameters {
            mean: 1.0, // center of norm distr
            std: 0.0, // std of norm distr
            max: 2.0, // maximum cutoff for norm distr
            min: 0.0, // minimum cutoff for norm distr
        }
    }
}

impl GaussianParameters {
    /// Generates a normally distributed random number clamped between
    /// a minimum and a maximum
    pub fn get_random_number(&self) -> f64 {
        crate::distribution::limited_distr(
            self.mean,
            self.std,
            self.min,
            self.max,
        )
    }
}

/// Response of one stimulation run in the common model interface
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeResponse {
    /// Membrane potential samples (mV), one per time step
    pub membrane_potential: Vec<f64>,
    /// Times (ms) at which the backend fired
    pub spike_times: Vec<f64>,
    /// Sampling period of the trace (ms)
    pub dt: f64,
}

impl SpikeResponse {
    /// Number of spikes fired during the run
    pub fn spike_count(&self) -> usize {
        self.spike_times.len()
    }
}

/// Capability to simulate a square current injection
pub trait ReceivesSquareCurrent {
    /// Expands the pulse at the given time step and simulates it from
    /// the backend's resting state, retaining the results for readout
    fn inject_square_current(
        &mut self,
        pulse: &SquarePulse,
        dt: f64,
    ) -> Result<(), AdaptiveThresholdError>;
}

/// Capability to read the membrane potential of the last run
pub trait ProducesMembranePotential {
    /// Membrane potential samples (mV) recorded by the last run
    fn get_membrane_potential(&self) -> &[f64];
    /// Sampling period (ms) of the recorded trace
    fn get_sampling_period(&self) -> f64;
}

/// Capability to read the spikes of the last run
pub trait ProducesSpikes {
    /// Spike times (ms) recorded by the last run
    fn get_spike_times(&self) -> &[f64];

    /// Number of spikes recorded by the last run
    fn get_spike_count(&self) -> usize {
        self.get_spike_times().len()
    }
}

/// Capability to expose a searchable parameter space to the fitting layer
pub trait Optimizable {
    /// Lower and upper bound per searched parameter, in the order
    /// [`Optimizable::apply_parameters`] consumes them
    fn parameter_bounds(&self) -> Vec<(f64, f64)>;

    /// Overwrites the searched parameters with a decoded value vector
    fn apply_parameters(&mut self, values: &[f64]) -> Result<(), AdaptiveThresholdError>;
}

fn take_response<B: ProducesMembranePotential + ProducesSpikes>(backend: &B) -> SpikeResponse {
    SpikeResponse {
        membrane_potential: backend.get_membrane_potential().to_vec(),
        spike_times: backend.get_spike_times().to_vec(),
        dt: backend.get_sampling_period(),
    }
}

/// A named model holding a backend by value, capabilities are reached
/// through the composition rather than through inheritance shims
#[derive(Debug, Clone)]
pub struct NeuronModel<B> {
    /// Display name of the model
    pub name: String,
    backend: B,
}

impl<B> NeuronModel<B> {
    /// Composes a model from a name and a backend
    pub fn new(name: &str, backend: B) -> Self {
        NeuronModel {
            name: String::from(name),
            backend,
        }
    }

    /// Borrows the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrows the underlying backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ReceivesSquareCurrent + ProducesMembranePotential + ProducesSpikes> NeuronModel<B> {
    /// Runs one square pulse through the backend and collects the
    /// response in the common interface
    pub fn run_square_pulse(
        &mut self,
        pulse: &SquarePulse,
        dt: f64,
    ) -> Result<SpikeResponse, AdaptiveThresholdError> {
        self.backend.inject_square_current(pulse, dt)?;

        Ok(take_response(&self.backend))
    }
}

/// Runs a set of independent backends against the same pulse in parallel,
/// each backend owns its own state so runs share nothing mutable
pub fn run_backends_in_parallel<B>(
    backends: &mut [B],
    pulse: &SquarePulse,
    dt: f64,
) -> Result<Vec<SpikeResponse>, AdaptiveThresholdError>
where
    B: ReceivesSquareCurrent + ProducesMembranePotential + ProducesSpikes + Send,
{
    backends.par_iter_mut()
        .map(|backend| {
            backend.inject_square_current(pulse, dt)?;

            Ok(take_response(backend))
        })
        .collect()
}
