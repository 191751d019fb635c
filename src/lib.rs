//! # Adaptive Threshold Neurons
//!
//! `adaptive_threshold_neurons` is a package for simulating spiking neuron
//! models and fitting them to reference responses. Its centerpiece is a
//! multi-timescale adaptive threshold neuron whose linear subthreshold
//! dynamics are propagated exactly between current pulses through a
//! precomputed impulse matrix, with spike detection, adaptation jumps and a
//! refractory lockout layered on top. Izhikevich and adaptive exponential
//! integrate-and-fire backends sit behind the same capability traits so the
//! genetic-algorithm fitting layer can drive any of the model families.
//!
//! ## Integrating a current pulse exactly
//!
//! ```rust
//! use adaptive_threshold_neurons::neuron::mat::{
//!     impulse_matrix, integrate, MatParameters,
//! };
//! use adaptive_threshold_neurons::stimulus::SquarePulse;
//!
//! let parameters = MatParameters::default();
//! let dt = 1.0;
//!
//! // one matrix propagates the full state over a sample, exactly
//! let matrix = impulse_matrix(&parameters, dt).unwrap();
//!
//! let pulse = SquarePulse::new(100.0, 10.0, 500.0).unwrap();
//! let current = pulse.to_current_trace(dt).unwrap();
//!
//! let integration = integrate(&matrix, &parameters, &current, dt, None);
//!
//! assert_eq!(integration.trajectory.nrows(), current.len());
//! assert!(integration.spike_count() > 0);
//!
//! // continue the same trace from the retained ending state
//! let continuation = integrate(
//!     &matrix, &parameters, &current, dt, Some(integration.end_state),
//! );
//! assert_eq!(continuation.trajectory.nrows(), current.len());
//! ```
//!
//! ## Driving a backend through the capability traits
//!
//! ```rust
//! use adaptive_threshold_neurons::neuron::NeuronModel;
//! use adaptive_threshold_neurons::neuron::mat::MatBackend;
//! use adaptive_threshold_neurons::stimulus::SquarePulse;
//!
//! let mut model = NeuronModel::new("mat", MatBackend::default());
//! let pulse = SquarePulse::new(100.0, 10.0, 500.0).unwrap();
//!
//! let response = model.run_square_pulse(&pulse, 1.0).unwrap();
//!
//! assert_eq!(response.spike_count(), response.spike_times.len());
//! assert_eq!(response.membrane_potential.len(), 510);
//! ```
//!
//! ## Fitting one model family to another
//!
//! [`fitting::fit_backend_to_reference`] runs a battery of square pulses
//! through a reference backend, summarizes each spike train, then searches
//! the candidate backend's [`neuron::Optimizable`] parameter space with the
//! genetic algorithm in [`ga`], scoring candidates against the reference
//! summaries in parallel.

pub mod distribution;
pub mod error;
pub mod fitting;
pub mod ga;
pub mod linalg;
pub mod neuron;
pub mod stimulus;
