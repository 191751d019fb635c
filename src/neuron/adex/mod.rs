//! An adaptive exponential integrate-and-fire neuron exposed through the
//! common capability traits.

use super::{
    Optimizable, ProducesMembranePotential, ProducesSpikes, ReceivesSquareCurrent,
};
use crate::error::{AdaptiveThresholdError, GeneticAlgorithmError};
use crate::stimulus::SquarePulse;


/// An adaptive exponential leaky integrate and fire neuron
#[derive(Debug, Clone)]
pub struct AdExNeuron {
    /// Membrane potential (mV)
    pub current_voltage: f64,
    /// Membrane capacitance (nF)
    pub c_m: f64,
    /// Membrane time constant (ms)
    pub tau_m: f64,
    /// Resting membrane potential (mV)
    pub v_rest: f64,
    /// Voltage reset value after a spike (mV)
    pub v_reset: f64,
    /// Exponential spike initiation threshold (mV)
    pub v_thresh: f64,
    /// Spike cutoff potential (mV)
    pub v_spike: f64,
    /// Height painted onto the trace at a spike sample (mV)
    pub spike_delta: f64,
    /// Steepness of the exponential spike initiation
    pub delta_t: f64,
    /// Subthreshold adaptation conductance
    pub a: f64,
    /// Adaptation increment per spike
    pub b: f64,
    /// Adaptation time constant (ms)
    pub tau_w: f64,
    /// Adaptation current
    pub w_value: f64,
    membrane_potential: Vec<f64>,
    spike_times: Vec<f64>,
    sampling_period: f64,
}

impl Default for AdExNeuron {
    fn default() -> Self {
        AdExNeuron {
            current_voltage: -70.6,
            c_m: 0.281, // membrane capacitance (nF)
            tau_m: 9.3667, // membrane time constant (ms)
            v_rest: -70.6, // resting potential (mV)
            v_reset: -70.6, // post spike reset potential (mV)
            v_thresh: -50.4, // spike initiation threshold (mV)
            v_spike: -40., // spike cutoff (mV)
            spike_delta: 30., // painted spike height (mV)
            delta_t: 2., // spike initiation steepness
            a: 4., // subthreshold adaptation (nS)
            b: 0.0805, // adaptation increment (nA)
            tau_w: 144., // adaptation time constant (ms)
            w_value: 0.,
            membrane_potential: vec![],
            spike_times: vec![],
            sampling_period: 1.,
        }
    }
}

impl AdExNeuron {
    /// Calculates the change in voltage given an input current, the leak
    /// conductance follows from the capacitance and membrane time constant
    pub fn adex_get_dv_change(&self, i: f64, dt: f64) -> f64 {
        let g_l = self.c_m / self.tau_m;
        let leak = -g_l * (self.current_voltage - self.v_rest);
        let spike_initiation = g_l * self.delta_t * (
            (self.current_voltage - self.v_thresh) / self.delta_t
        ).exp();

        (leak + spike_initiation - self.w_value + i) * (dt / self.c_m)
    }

    /// Calculates how the adaptation current changes, `a` couples in nS
    /// against millivolts while the adaptation current is in nA
    pub fn adex_get_dw_change(&self, dt: f64) -> f64 {
        (
            self.a * (self.current_voltage - self.v_rest) * 1e-3 - self.w_value
        ) * (dt / self.tau_w)
    }

    /// Determines whether the neuron is spiking, resets the voltage and
    /// increments the adaptation current if so
    pub fn adex_handle_spiking(&mut self) -> bool {
        let mut is_spiking = false;

        if self.current_voltage >= self.v_spike {
            is_spiking = !is_spiking;
            self.current_voltage = self.v_reset;
            self.w_value += self.b;
        }

        is_spiking
    }

    /// Resets the voltage and adaptation current to rest
    pub fn reset_state(&mut self) {
        self.current_voltage = self.v_rest;
        self.w_value = 0.;
    }
}

impl ReceivesSquareCurrent for AdExNeuron {
    fn inject_square_current(
        &mut self,
        pulse: &SquarePulse,
        dt: f64,
    ) -> Result<(), AdaptiveThresholdError> {
        let current = pulse.to_current_trace(dt)?;

        self.reset_state();
        self.membrane_potential = Vec::with_capacity(current.len());
        self.spike_times = vec![];
        self.sampling_period = dt;

        for (i, &current_sample) in current.iter().enumerate() {
            let dv = self.adex_get_dv_change(current_sample, dt);
            let dw = self.adex_get_dw_change(dt);

            self.current_voltage += dv;
            self.w_value += dw;

            if self.adex_handle_spiking() {
                self.spike_times.push(i as f64 * dt);
                self.membrane_potential.push(self.v_spike + self.spike_delta);
            } else {
                self.membrane_potential.push(self.current_voltage);
            }
        }

        Ok(())
    }
}

impl ProducesMembranePotential for AdExNeuron {
    fn get_membrane_potential(&self) -> &[f64] {
        &self.membrane_potential
    }

    fn get_sampling_period(&self) -> f64 {
        self.sampling_period
    }
}

impl ProducesSpikes for AdExNeuron {
    fn get_spike_times(&self) -> &[f64] {
        &self.spike_times
    }
}

impl Optimizable for AdExNeuron {
    fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (1., 50.), // tau_m
            (0., 20.), // a
            (0., 0.5), // b
            (0.5, 5.), // delta_t
            (30., 300.), // tau_w
        ]
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<(), AdaptiveThresholdError> {
        if values.len() != self.parameter_bounds().len() {
            return Err(GeneticAlgorithmError::BoundsMismatch.into());
        }

        self.tau_m = values[0];
        self.a = values[1];
        self.b = values[2];
        self.delta_t = values[3];
        self.tau_w = values[4];

        Ok(())
    }
}
