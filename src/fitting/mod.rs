//! A set of tools to fit a spiking backend to the response of a reference
//! model over a shared battery of square pulse stimuli.

use std::collections::HashMap;
use crate::error::GeneticAlgorithmError;
use crate::ga::{decode, genetic_algo, BitString, GeneticAlgorithmParameters};
use crate::neuron::{
    GaussianParameters, Optimizable, ProducesSpikes, ReceivesSquareCurrent,
};
use crate::stimulus::SquarePulse;


fn diff(x: &[f64]) -> Vec<f64> {
    (1..x.len()).map(|i| x[i] - x[i - 1])
        .collect()
}

/// Summarizes the spiking response of one stimulation run
#[derive(Debug, Clone)]
pub struct SpikeResponseSummary {
    /// Number of spikes throughout the run
    pub num_spikes: f64,
    /// Average time between consecutive spikes (ms)
    pub average_interspike_interval: f64,
    /// Time of the first spike (ms)
    pub first_spike_time: f64,
}

/// Generates a response summary from the spike times of one run
pub fn get_summary(spike_times: &[f64]) -> SpikeResponseSummary {
    let average_interspike_interval: f64 = if spike_times.len() > 1 {
        diff(spike_times).iter()
            .sum::<f64>() / (spike_times.len() - 1) as f64
    } else {
        0.
    };

    let first_spike_time = match spike_times.first() {
        Some(&time) => time,
        None => 0.,
    };

    SpikeResponseSummary {
        num_spikes: spike_times.len() as f64,
        average_interspike_interval,
        first_spike_time,
    }
}

/// A set of defaults to use for scaling if no spikes are
/// found within inputs for [`fit_backend_to_reference`]
pub struct SummaryScalingDefaults {
    /// Default scaling for times between spikes
    pub default_interval_scale: f64,
    /// Default scaling for number of spikes
    pub default_num_spikes_scale: f64,
    /// Default scaling for the first spike time
    pub default_first_spike_scale: f64,
}

impl Default for SummaryScalingDefaults {
    fn default() -> Self {
        SummaryScalingDefaults {
            default_interval_scale: 100.,
            default_num_spikes_scale: 10.,
            default_first_spike_scale: 100.,
        }
    }
}

/// Scaling factors for response summaries used in [`fit_backend_to_reference`]
#[derive(Clone, Copy)]
pub struct SummaryScalingFactors {
    /// Scaling for times between spikes
    pub interval_scale: f64,
    /// Scaling for number of spikes
    pub num_spikes_scale: f64,
    /// Scaling for the first spike time
    pub first_spike_scale: f64,
}

fn replace_with_default(value: f64, default: f64) -> f64 {
    if value == 0. {
        default
    } else {
        value
    }
}

/// Generates a scaled reference summary and the scaling factors to
/// normalize candidate summaries with, defaults stand in for any field the
/// reference response left at zero
pub fn get_reference_scale(
    reference_summary: &SpikeResponseSummary,
    scaling_defaults: &SummaryScalingDefaults,
) -> (SpikeResponseSummary, SummaryScalingFactors) {
    let scaling_factors = SummaryScalingFactors {
        interval_scale: replace_with_default(
            reference_summary.average_interspike_interval, scaling_defaults.default_interval_scale
        ),
        num_spikes_scale: replace_with_default(
            reference_summary.num_spikes, scaling_defaults.default_num_spikes_scale
        ),
        first_spike_scale: replace_with_default(
            reference_summary.first_spike_time, scaling_defaults.default_first_spike_scale
        ),
    };

    (scale_summary(reference_summary, &scaling_factors), scaling_factors)
}

/// Scales summary given scaling factors
pub fn scale_summary(
    summary: &SpikeResponseSummary,
    scaling_factors: &SummaryScalingFactors,
) -> SpikeResponseSummary {
    SpikeResponseSummary {
        num_spikes: summary.num_spikes / scaling_factors.num_spikes_scale,
        average_interspike_interval:
            summary.average_interspike_interval / scaling_factors.interval_scale,
        first_spike_time: summary.first_spike_time / scaling_factors.first_spike_scale,
    }
}

/// Compares spike counts, interspike intervals and first spike times between
/// summaries by summing the square of the difference between each field, if
/// any value is not a number `f64::INFINITY` is returned
pub fn compare_summary(
    summary1: &SpikeResponseSummary,
    summary2: &SpikeResponseSummary,
) -> f64 {
    let num_spikes = (summary1.num_spikes - summary2.num_spikes).powf(2.);
    let interval = (
        summary1.average_interspike_interval - summary2.average_interspike_interval
    ).powf(2.);
    let first_spike = (summary1.first_spike_time - summary2.first_spike_time).powf(2.);

    let score = num_spikes + interval + first_spike;

    if score.is_nan() {
        f64::INFINITY
    } else {
        score
    }
}

/// Settings used to run and score candidate backends during
/// [`fit_backend_to_reference`]
#[derive(Clone)]
pub struct FittingSettings<'a, B>
where
    B: ReceivesSquareCurrent + ProducesSpikes + Optimizable + Clone,
{
    /// Template backend the decoded parameters are applied to
    pub backend_to_fit: B,
    /// Battery of stimuli each candidate is observed over
    pub stimuli: Vec<SquarePulse>,
    /// Time step of every simulation (ms)
    pub dt: f64,
    /// Reference summaries to compare candidates against
    pub reference_summaries: &'a [SpikeResponseSummary],
    /// Scalars to use when comparing summaries
    pub scaling_factors: &'a [Option<SummaryScalingFactors>],
    /// Use `Some` to scale stimulus amplitudes with clamped Gaussian noise
    pub noise: Option<GaussianParameters>,
}

/// Runs one stimulus through a candidate backend and summarizes the
/// resulting spike train
fn get_summary_given_settings<B>(
    backend: &mut B,
    settings: &FittingSettings<B>,
    index: usize,
) -> Result<SpikeResponseSummary, GeneticAlgorithmError>
where
    B: ReceivesSquareCurrent + ProducesSpikes + Optimizable + Clone,
{
    let mut pulse = settings.stimuli[index];
    if let Some(noise) = settings.noise {
        pulse.amplitude *= noise.get_random_number();
    }

    backend.inject_square_current(&pulse, settings.dt)
        .map_err(|e| GeneticAlgorithmError::ObjectiveFunctionFailure(e.to_string()))?;

    let summary = get_summary(backend.get_spike_times());

    match settings.scaling_factors[index] {
        Some(factors) => Ok(scale_summary(&summary, &factors)),
        None => Ok(summary),
    }
}

fn fitting_objective<B>(
    bitstring: &BitString,
    bounds: &[(f64, f64)],
    n_bits: usize,
    settings: &HashMap<&str, FittingSettings<B>>,
) -> Result<f64, GeneticAlgorithmError>
where
    B: ReceivesSquareCurrent + ProducesSpikes + Optimizable + Clone,
{
    let settings = settings.get("settings").unwrap();

    let decoded = decode(bitstring, bounds, n_bits)?;

    let mut test_backend = settings.backend_to_fit.clone();
    test_backend.apply_parameters(&decoded)
        .map_err(|e| GeneticAlgorithmError::ObjectiveFunctionFailure(e.to_string()))?;

    let mut score = 0.;
    for i in 0..settings.stimuli.len() {
        let summary = get_summary_given_settings(&mut test_backend, settings, i)?;

        score += compare_summary(&settings.reference_summaries[i], &summary);
    }

    Ok(score)
}

/// Fits a backend to a reference model by searching the backend's own
/// parameter space with a genetic algorithm, returns the decoded best
/// parameters, the reference summaries, the summaries the fitted backend
/// produces and the scaling factors used during scoring
///
/// - `backend_to_fit` : template backend whose [`Optimizable`] parameter
///   space is searched
///
/// - `reference_backend` : model whose responses are the target to meet
///
/// - `scaling_defaults` : a set of default values to use when scaling
///   response summaries, use `None` to not scale summaries during fitting
///
/// - `stimuli` : a battery of square pulses each candidate is observed
///   over in order to ensure the models are fit across conditions
///
/// - `dt` : time step of every simulation (ms)
///
/// - `genetic_algo_params` : hyperparameters for the genetic algorithm,
///   its bounds are replaced by the backend's own parameter bounds
///
/// - `noise` : use `Some` to scale stimulus amplitudes with clamped
///   Gaussian noise on every run
///
/// - `verbose` : use `true` to print extra information
#[allow(clippy::too_many_arguments)]
pub fn fit_backend_to_reference<B, R>(
    backend_to_fit: &B,
    reference_backend: &R,
    scaling_defaults: Option<SummaryScalingDefaults>,
    stimuli: &[SquarePulse],
    dt: f64,
    genetic_algo_params: &GeneticAlgorithmParameters,
    noise: Option<GaussianParameters>,
    verbose: bool,
) -> Result<
    (
        Vec<f64>,
        Vec<SpikeResponseSummary>,
        Vec<SpikeResponseSummary>,
        Vec<Option<SummaryScalingFactors>>,
    ),
    GeneticAlgorithmError,
>
where
    B: ReceivesSquareCurrent + ProducesSpikes + Optimizable + Clone + Sync,
    R: ReceivesSquareCurrent + ProducesSpikes + Clone,
{
    let mut reference_summaries: Vec<SpikeResponseSummary> = vec![];
    let mut scaling_factors: Vec<Option<SummaryScalingFactors>> = vec![];

    for pulse in stimuli.iter() {
        let mut reference_run = reference_backend.clone();
        reference_run.inject_square_current(pulse, dt)
            .map_err(|e| GeneticAlgorithmError::ObjectiveFunctionFailure(e.to_string()))?;

        let reference_summary = get_summary(reference_run.get_spike_times());

        match scaling_defaults {
            Some(ref scaling_defaults_values) => {
                let (scaled_reference, factors) = get_reference_scale(
                    &reference_summary, scaling_defaults_values
                );

                reference_summaries.push(scaled_reference);
                scaling_factors.push(Some(factors));
            },
            None => {
                reference_summaries.push(reference_summary);
                scaling_factors.push(None);
            },
        }
    }

    let fitting_settings = FittingSettings {
        backend_to_fit: backend_to_fit.clone(),
        stimuli: stimuli.to_vec(),
        dt,
        reference_summaries: reference_summaries.as_slice(),
        scaling_factors: scaling_factors.as_slice(),
        noise,
    };

    let mut fitting_settings_map: HashMap<&str, FittingSettings<B>> = HashMap::new();
    fitting_settings_map.insert("settings", fitting_settings.clone());

    let mut search_params = genetic_algo_params.clone();
    search_params.bounds = backend_to_fit.parameter_bounds();

    if verbose {
        println!("Starting genetic algorithm...");
    }
    let (best_bitstring, _best_score, _scores) = genetic_algo(
        fitting_objective,
        &search_params,
        &fitting_settings_map,
        verbose,
    )?;
    if verbose {
        println!("Finished genetic algorithm...");
    }

    let decoded = decode(&best_bitstring, &search_params.bounds, search_params.n_bits)?;

    let mut fitted_backend = backend_to_fit.clone();
    fitted_backend.apply_parameters(&decoded)
        .map_err(|e| GeneticAlgorithmError::ObjectiveFunctionFailure(e.to_string()))?;

    let mut generated_summaries: Vec<SpikeResponseSummary> = vec![];
    for i in 0..stimuli.len() {
        generated_summaries.push(
            get_summary_given_settings(&mut fitted_backend, &fitting_settings, i)?
        );
    }

    Ok((decoded, reference_summaries, generated_summaries, scaling_factors))
}

/// Prints out the given response summaries rescaled back to their raw
/// units based on the given set of scaling factors, length of summaries
/// and the length of scaling factors must be the same
pub fn print_response_summaries(
    summaries: &[SpikeResponseSummary],
    scaling_factors: &[Option<SummaryScalingFactors>],
) -> Result<(), GeneticAlgorithmError> {
    if summaries.len() != scaling_factors.len() {
        return Err(GeneticAlgorithmError::ObjectiveFunctionFailure(
            String::from("summaries and scaling_factors length must be the same")
        ));
    }

    let mut interspike_intervals: Vec<f64> = Vec::new();
    let mut num_spikes: Vec<f64> = Vec::new();
    let mut first_spike_times: Vec<f64> = Vec::new();

    for (summary, scaling) in summaries.iter().zip(scaling_factors) {
        let (interval_scaling, spikes_scaling, first_spike_scaling) = match scaling {
            Some(value) => (value.interval_scale, value.num_spikes_scale, value.first_spike_scale),
            None => (1., 1., 1.),
        };

        interspike_intervals.push(summary.average_interspike_interval * interval_scaling);
        num_spikes.push(summary.num_spikes * spikes_scaling);
        first_spike_times.push(summary.first_spike_time * first_spike_scaling);
    }

    println!("Interspike intervals: {:?}", interspike_intervals);
    println!("# of spikes: {:?}", num_spikes);
    println!("First spike times: {:?}", first_spike_times);

    Ok(())
}
