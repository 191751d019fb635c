//! A multi-timescale adaptive threshold neuron integrated exactly between
//! current pulses.
//!
//! The subthreshold dynamics are linear, so one matrix, the exponential of
//! the continuous generator scaled by the time step, propagates the full
//! state over a sample exactly regardless of step size. Spiking is a
//! nonlinear detection and reset rule layered on top: the dynamic threshold
//! is the sum of two decaying adaptation channels, a voltage-coupled
//! threshold channel and a baseline offset, and a spike increments the
//! adaptation channels without resetting the voltage.

use ndarray::{Array1, Array2};
use super::{
    Optimizable, ProducesMembranePotential, ProducesSpikes, ReceivesSquareCurrent,
};
use crate::error::{AdaptiveThresholdError, GeneticAlgorithmError, ParameterError};
use crate::linalg::matrix_exponential;
use crate::stimulus::SquarePulse;


/// Number of state channels: `[V, phi, theta1, theta2, theta_v, dtheta_v]`
pub const STATE_DIMENSION: usize = 6;

/// Parameters of the multi-timescale adaptive threshold neuron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatParameters {
    /// Fast adaptation jump per spike (mV)
    pub a1: f64,
    /// Slow adaptation jump per spike (mV)
    pub a2: f64,
    /// Coupling of the voltage into the threshold channels
    pub b: f64,
    /// Baseline threshold offset (mV)
    pub w: f64,
    /// Membrane resistance scaling the current drive (MOhm)
    pub r: f64,
    /// Membrane time constant (ms)
    pub tm: f64,
    /// Fast adaptation time constant (ms)
    pub t1: f64,
    /// Slow adaptation time constant (ms)
    pub t2: f64,
    /// Voltage-coupled threshold time constant (ms)
    pub tv: f64,
    /// Refractory period (ms)
    pub tref: f64,
}

impl Default for MatParameters {
    fn default() -> Self {
        MatParameters {
            a1: 10., // fast adaptation jump (mV)
            a2: 2., // slow adaptation jump (mV)
            b: 0., // voltage coupling into threshold
            w: 5., // baseline threshold offset (mV)
            r: 10., // membrane resistance (MOhm)
            tm: 10., // membrane time constant (ms)
            t1: 10., // fast adaptation time constant (ms)
            t2: 200., // slow adaptation time constant (ms)
            tv: 5., // threshold time constant (ms)
            tref: 2., // refractory period (ms)
        }
    }
}

impl MatParameters {
    /// Checks that every field is finite, that every time constant is
    /// strictly positive and that the refractory period is nonnegative
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("a1", self.a1), ("a2", self.a2), ("b", self.b), ("w", self.w),
            ("r", self.r), ("tm", self.tm), ("t1", self.t1), ("t2", self.t2),
            ("tv", self.tv), ("tref", self.tref),
        ];

        for (name, value) in fields.iter() {
            if !value.is_finite() {
                return Err(ParameterError::NonFiniteParameter(String::from(*name)));
            }
        }

        let time_constants = [
            ("tm", self.tm), ("t1", self.t1), ("t2", self.t2), ("tv", self.tv),
        ];

        for (name, value) in time_constants.iter() {
            if *value <= 0. {
                return Err(ParameterError::NonPositiveTimeConstant(String::from(*name)));
            }
        }

        if self.tref < 0. {
            return Err(ParameterError::NegativeRefractoryPeriod);
        }

        Ok(())
    }

    /// Whether the membrane and threshold time constants coincide, which
    /// makes the closed form impulse matrix entries undefined
    pub fn is_degenerate(&self) -> bool {
        self.tm == self.tv
    }
}

fn validate_timestep(dt: f64) -> Result<(), ParameterError> {
    if !dt.is_finite() {
        return Err(ParameterError::NonFiniteParameter(String::from("dt")));
    }
    if dt <= 0. {
        return Err(ParameterError::NonPositiveTimeConstant(String::from("dt")));
    }

    Ok(())
}

/// Assembles the continuous-time generator of the linear subsystem,
/// the impulse matrix is the exponential of this matrix scaled by `dt`
pub fn generator_matrix(parameters: &MatParameters) -> Array2<f64> {
    let mut generator = Array2::<f64>::zeros((STATE_DIMENSION, STATE_DIMENSION));

    generator[[0, 0]] = -1. / parameters.tm;
    generator[[0, 1]] = 1.;
    generator[[2, 2]] = -1. / parameters.t1;
    generator[[3, 3]] = -1. / parameters.t2;
    generator[[4, 4]] = -1. / parameters.tv;
    generator[[4, 5]] = 1.;
    generator[[5, 0]] = -parameters.b / parameters.tm;
    generator[[5, 1]] = parameters.b;
    generator[[5, 5]] = -1. / parameters.tv;

    generator
}

/// Calculates the impulse matrix from the closed form entries, errors if
/// the membrane and threshold time constants coincide since the coupled
/// entries divide by their difference
pub fn impulse_matrix_direct(
    parameters: &MatParameters,
    dt: f64,
) -> Result<Array2<f64>, ParameterError> {
    parameters.validate()?;
    validate_timestep(dt)?;

    if parameters.is_degenerate() {
        return Err(ParameterError::DegenerateTimeConstants);
    }

    let (b, tm, tv) = (parameters.b, parameters.tm, parameters.tv);

    let membrane_decay = (-dt / tm).exp();
    let fast_decay = (-dt / parameters.t1).exp();
    let slow_decay = (-dt / parameters.t2).exp();
    let threshold_decay = (-dt / tv).exp();
    let separation = tm - tv;

    let mut matrix = Array2::<f64>::zeros((STATE_DIMENSION, STATE_DIMENSION));

    matrix[[0, 0]] = membrane_decay;
    matrix[[0, 1]] = tm - tm * membrane_decay;
    matrix[[1, 1]] = 1.;
    matrix[[2, 2]] = fast_decay;
    matrix[[3, 3]] = slow_decay;
    matrix[[4, 4]] = threshold_decay;
    matrix[[4, 5]] = dt * threshold_decay;
    matrix[[5, 5]] = threshold_decay;

    matrix[[4, 0]] = b * tv * (
        dt * separation * threshold_decay + tm * tv * (threshold_decay - membrane_decay)
    ) / (separation * separation);
    matrix[[4, 1]] = b * tm * tv * (
        tm * tv * (membrane_decay - threshold_decay) - dt * separation * threshold_decay
    ) / (separation * separation);
    matrix[[5, 0]] = b * tv * (threshold_decay - membrane_decay) / separation;
    matrix[[5, 1]] = -b * tm * tv * (threshold_decay - membrane_decay) / separation;

    Ok(matrix)
}

/// Calculates the impulse matrix by numerically exponentiating the
/// generator scaled by `dt`, valid for degenerate time constants as well
pub fn impulse_matrix_expm(
    parameters: &MatParameters,
    dt: f64,
) -> Result<Array2<f64>, ParameterError> {
    parameters.validate()?;
    validate_timestep(dt)?;

    let scaled_generator = generator_matrix(parameters).mapv(|value| value * dt);

    Ok(matrix_exponential(&scaled_generator))
}

/// Calculates the impulse matrix for the given parameters and time step,
/// using the closed form entries and falling back to the numerical
/// exponential when the membrane and threshold time constants coincide
pub fn impulse_matrix(
    parameters: &MatParameters,
    dt: f64,
) -> Result<Array2<f64>, ParameterError> {
    if parameters.is_degenerate() {
        impulse_matrix_expm(parameters, dt)
    } else {
        impulse_matrix_direct(parameters, dt)
    }
}

/// Integration state carried between chained runs
#[derive(Debug, Clone, PartialEq)]
pub struct MatRunState {
    /// State vector `[V, phi, theta1, theta2, theta_v, dtheta_v]`
    pub state: Array1<f64>,
    /// Current sample seen at the end of the previous run
    pub last_current: f64,
    /// Last sample index, relative to the next run, at which the spike
    /// check stays suppressed
    pub refractory_boundary: i64,
}

impl Default for MatRunState {
    fn default() -> Self {
        MatRunState {
            state: Array1::zeros(STATE_DIMENSION),
            last_current: 0.,
            refractory_boundary: 0,
        }
    }
}

/// Output of one integration run
#[derive(Debug, Clone, PartialEq)]
pub struct MatIntegration {
    /// Raw state trajectory, one row of [`STATE_DIMENSION`] channels per
    /// input sample
    pub trajectory: Array2<f64>,
    /// Times (ms) at which the threshold condition fired
    pub spike_times: Vec<f64>,
    /// Ending state, usable as the initial state of a continuation run
    pub end_state: MatRunState,
}

impl MatIntegration {
    /// Number of spikes fired during the run
    pub fn spike_count(&self) -> usize {
        self.spike_times.len()
    }

    /// Collapses each trajectory row into the per-sample sum of all state
    /// channels, the scalar membrane potential proxy downstream analyses
    /// consume
    pub fn membrane_potential_proxy(&self) -> Vec<f64> {
        self.trajectory.rows()
            .into_iter()
            .map(|row| row.sum())
            .collect()
    }
}

/// An explicit linear output transform, `(y - offset) / scale` applied
/// channel-wise, the raw trajectory stays the authoritative output and
/// this is never applied inside the integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRescale {
    /// Value subtracted from every channel
    pub offset: f64,
    /// Divisor applied after the offset
    pub scale: f64,
}

impl LinearRescale {
    /// Applies the rescale to a trajectory, returning a new array
    pub fn apply(&self, trajectory: &Array2<f64>) -> Array2<f64> {
        trajectory.mapv(|value| (value - self.offset) / self.scale)
    }
}

/// Integrates the model over a current trace using exact propagation of
/// the linear subsystem.
///
/// Every sample the previous state is advanced through `matrix`, the
/// current drive enters as a first difference on the coupling channel and
/// the threshold check fires on a strict voltage crossing outside the
/// refractory window. A spike increments the adaptation channels by `a1`
/// and `a2` and locks the detector for `floor(tref / dt)` samples; the
/// voltage itself is not reset. Pass `None` for `initial_state` to start
/// from rest, or the previous run's `end_state` to continue a trace
/// split across runs.
///
/// `matrix` must be the impulse matrix built from `parameters` and `dt`.
/// A zero-length trace yields an empty trajectory and no spikes. Non-finite
/// currents are not guarded against and propagate through the state.
pub fn integrate(
    matrix: &Array2<f64>,
    parameters: &MatParameters,
    current: &[f64],
    dt: f64,
    initial_state: Option<MatRunState>,
) -> MatIntegration {
    let samples = current.len();
    let initial = initial_state.unwrap_or_default();

    let mut state = initial.state;
    let mut last_current = initial.last_current;
    let mut refractory_boundary = initial.refractory_boundary;

    let refractory_samples = (parameters.tref / dt).floor() as i64;
    let forcing_gain = parameters.r / parameters.tm;

    let mut trajectory = Array2::<f64>::zeros((samples, STATE_DIMENSION));
    let mut spike_times: Vec<f64> = vec![];

    for (i, &current_sample) in current.iter().enumerate() {
        state = matrix.dot(&state);
        state[1] += forcing_gain * (current_sample - last_current);
        last_current = current_sample;

        let threshold = state[2] + state[3] + state[4] + parameters.w;
        if (i as i64) > refractory_boundary && state[0] > threshold {
            state[2] += parameters.a1;
            state[3] += parameters.a2;
            refractory_boundary = i as i64 + refractory_samples;
            spike_times.push(i as f64 * dt);
        }

        trajectory.row_mut(i).assign(&state);
    }

    MatIntegration {
        trajectory,
        spike_times,
        end_state: MatRunState {
            state,
            last_current,
            refractory_boundary: refractory_boundary - samples as i64,
        },
    }
}

/// Reconstructs the adaptation channels `(theta1, theta2)` from known spike
/// times alone using the exact diagonal decays, starting from zero
/// adaptation, returns one `(theta1, theta2)` row per sample
pub fn predict_adaptation(
    parameters: &MatParameters,
    spike_times: &[f64],
    dt: f64,
    samples: usize,
) -> Array2<f64> {
    let fast_decay = (-dt / parameters.t1).exp();
    let slow_decay = (-dt / parameters.t2).exp();

    let mut spike_indicator = vec![0.; samples];
    for &time in spike_times.iter() {
        let index = (time / dt) as usize;
        if index < samples {
            spike_indicator[index] = 1.;
        }
    }

    let mut adaptation = Array2::<f64>::zeros((samples, 2));
    let (mut theta1, mut theta2) = (0., 0.);

    for i in 0..samples {
        theta1 = fast_decay * theta1 + parameters.a1 * spike_indicator[i];
        theta2 = slow_decay * theta2 + parameters.a2 * spike_indicator[i];
        adaptation[[i, 0]] = theta1;
        adaptation[[i, 1]] = theta2;
    }

    adaptation
}

/// Evaluates the per-sample log intensity of spiking with an exponential
/// link function, the voltage minus every threshold contribution
pub fn log_intensity(trajectory: &Array2<f64>, parameters: &MatParameters) -> Array1<f64> {
    trajectory.rows()
        .into_iter()
        .map(|row| row[0] - row[2] - row[3] - row[4] - parameters.w)
        .collect()
}

#[derive(Debug, Clone)]
struct CachedMatrix {
    dt: f64,
    matrix: Array2<f64>,
}

/// Backend adapter exposing the exact integrator through the common
/// capability traits, the impulse matrix is cached per time step and the
/// run state is retained so traces can be continued across calls
#[derive(Debug, Clone)]
pub struct MatBackend {
    /// Model parameters
    parameters: MatParameters,
    cached_matrix: Option<CachedMatrix>,
    run_state: MatRunState,
    membrane_potential: Vec<f64>,
    spike_times: Vec<f64>,
    sampling_period: f64,
}

impl Default for MatBackend {
    fn default() -> Self {
        MatBackend {
            parameters: MatParameters::default(),
            cached_matrix: None,
            run_state: MatRunState::default(),
            membrane_potential: vec![],
            spike_times: vec![],
            sampling_period: 1., // default sampling period (ms)
        }
    }
}

impl MatBackend {
    /// Creates a backend from validated parameters
    pub fn new(parameters: MatParameters) -> Result<Self, ParameterError> {
        parameters.validate()?;

        Ok(MatBackend {
            parameters,
            ..MatBackend::default()
        })
    }

    /// Borrows the current parameters
    pub fn parameters(&self) -> &MatParameters {
        &self.parameters
    }

    /// Replaces the parameters after validating them, invalidating the
    /// cached impulse matrix
    pub fn set_parameters(&mut self, parameters: MatParameters) -> Result<(), ParameterError> {
        parameters.validate()?;

        self.parameters = parameters;
        self.cached_matrix = None;

        Ok(())
    }

    /// Returns the retained integration state
    pub fn run_state(&self) -> &MatRunState {
        &self.run_state
    }

    /// Resets the retained integration state to rest
    pub fn reset_state(&mut self) {
        self.run_state = MatRunState::default();
    }

    fn matrix_for(&mut self, dt: f64) -> Result<&Array2<f64>, ParameterError> {
        let stale = match &self.cached_matrix {
            Some(cached) => cached.dt != dt,
            None => true,
        };

        if stale {
            let matrix = impulse_matrix(&self.parameters, dt)?;
            self.cached_matrix = Some(CachedMatrix { dt, matrix });
        }

        Ok(&self.cached_matrix.as_ref().unwrap().matrix)
    }

    /// Integrates a raw current trace continuing from the retained state,
    /// the readout capabilities report this run afterwards
    pub fn predict(
        &mut self,
        current: &[f64],
        dt: f64,
    ) -> Result<MatIntegration, AdaptiveThresholdError> {
        self.matrix_for(dt)?;
        let matrix = &self.cached_matrix.as_ref().unwrap().matrix;

        let integration = integrate(
            matrix,
            &self.parameters,
            current,
            dt,
            Some(self.run_state.clone()),
        );

        self.run_state = integration.end_state.clone();
        self.membrane_potential = integration.membrane_potential_proxy();
        self.spike_times = integration.spike_times.clone();
        self.sampling_period = dt;

        Ok(integration)
    }
}

impl ReceivesSquareCurrent for MatBackend {
    fn inject_square_current(
        &mut self,
        pulse: &SquarePulse,
        dt: f64,
    ) -> Result<(), AdaptiveThresholdError> {
        let current = pulse.to_current_trace(dt)?;

        self.reset_state();
        self.predict(&current, dt)?;

        Ok(())
    }
}

impl ProducesMembranePotential for MatBackend {
    fn get_membrane_potential(&self) -> &[f64] {
        &self.membrane_potential
    }

    fn get_sampling_period(&self) -> f64 {
        self.sampling_period
    }
}

impl ProducesSpikes for MatBackend {
    fn get_spike_times(&self) -> &[f64] {
        &self.spike_times
    }
}

impl Optimizable for MatBackend {
    fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (0., 40.), // a1
            (0., 10.), // a2
            (0., 3.), // b
            (0., 20.), // w
            (1., 30.), // r
            (2., 50.), // tm
        ]
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<(), AdaptiveThresholdError> {
        if values.len() != self.parameter_bounds().len() {
            return Err(GeneticAlgorithmError::BoundsMismatch.into());
        }

        let parameters = MatParameters {
            a1: values[0],
            a2: values[1],
            b: values[2],
            w: values[3],
            r: values[4],
            tm: values[5],
            ..self.parameters
        };

        self.set_parameters(parameters)?;

        Ok(())
    }
}
