//! An Izhikevich neuron in its hybrid form, stepped with Euler
//! integration and exposed through the common capability traits.

use super::{
    Optimizable, ProducesMembranePotential, ProducesSpikes, ReceivesSquareCurrent,
};
use crate::error::{AdaptiveThresholdError, GeneticAlgorithmError};
use crate::stimulus::SquarePulse;


/// An Izhikevich neuron
#[derive(Debug, Clone)]
pub struct IzhikevichNeuron {
    /// Membrane potential (mV)
    pub current_voltage: f64,
    /// Controls speed of recovery
    pub a: f64,
    /// Controls sensitivity of the adaptive value to subthreshold voltage
    pub b: f64,
    /// After spike reset value for voltage (mV)
    pub c: f64,
    /// After spike reset value for adaptive value
    pub d: f64,
    /// Steepness of the quadratic membrane term
    pub k: f64,
    /// Membrane capacitance (pF)
    pub c_m: f64,
    /// Resting membrane potential (mV)
    pub v_rest: f64,
    /// Instantaneous threshold potential (mV)
    pub v_th: f64,
    /// Spike cutoff potential (mV)
    pub v_peak: f64,
    /// Adaptive value
    pub w_value: f64,
    membrane_potential: Vec<f64>,
    spike_times: Vec<f64>,
    sampling_period: f64,
}

impl Default for IzhikevichNeuron {
    fn default() -> Self {
        IzhikevichNeuron {
            current_voltage: -65.2261863636364,
            a: 0.01,
            b: 15.,
            c: -60., // post spike reset potential (mV)
            d: 10.,
            k: 1.6,
            c_m: 89.7960714285714, // membrane capacitance (pF)
            v_rest: -65.2261863636364, // resting potential (mV)
            v_th: -50., // instantaneous threshold (mV)
            v_peak: 21.1386636363636, // spike cutoff (mV)
            w_value: 0.,
            membrane_potential: vec![],
            spike_times: vec![],
            sampling_period: 1.,
        }
    }
}

impl IzhikevichNeuron {
    /// Calculates the change in voltage given an input current
    pub fn izhikevich_get_dv_change(&self, i: f64, dt: f64) -> f64 {
        (
            self.k * (self.current_voltage - self.v_rest) * (self.current_voltage - self.v_th)
            - self.w_value + i
        ) * (dt / self.c_m)
    }

    /// Calculates how the adaptive value changes
    pub fn izhikevich_get_dw_change(&self, dt: f64) -> f64 {
        self.a * (self.b * (self.current_voltage - self.v_rest) - self.w_value) * dt
    }

    /// Determines whether the neuron is spiking, resets the voltage and
    /// increments the adaptive value if so
    pub fn izhikevich_handle_spiking(&mut self) -> bool {
        let mut is_spiking = false;

        if self.current_voltage >= self.v_peak {
            is_spiking = !is_spiking;
            self.current_voltage = self.c;
            self.w_value += self.d;
        }

        is_spiking
    }

    /// Resets the voltage and adaptive value to rest
    pub fn reset_state(&mut self) {
        self.current_voltage = self.v_rest;
        self.w_value = 0.;
    }
}

impl ReceivesSquareCurrent for IzhikevichNeuron {
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
            let dv = self.izhikevich_get_dv_change(current_sample, dt);
            let dw = self.izhikevich_get_dw_change(dt);

            self.current_voltage += dv;
            self.w_value += dw;

            if self.izhikevich_handle_spiking() {
                self.spike_times.push(i as f64 * dt);
                self.membrane_potential.push(self.v_peak);
            } else {
                self.membrane_potential.push(self.current_voltage);
            }
        }

        Ok(())
    }
}

impl ProducesMembranePotential for IzhikevichNeuron {
    fn get_membrane_potential(&self) -> &[f64] {
        &self.membrane_potential
    }

    fn get_sampling_period(&self) -> f64 {
        self.sampling_period
    }
}

impl ProducesSpikes for IzhikevichNeuron {
    fn get_spike_times(&self) -> &[f64] {
        &self.spike_times
    }
}

impl Optimizable for IzhikevichNeuron {
    fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (0.001, 0.1), // a
            (1., 30.), // b
            (-70., -45.), // c
            (0.1, 20.), // d
            (0.5, 3.), // k
        ]
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<(), AdaptiveThresholdError> {
        if values.len() != self.parameter_bounds().len() {
            return Err(GeneticAlgorithmError::BoundsMismatch.into());
        }

        self.a = values[0];
        self.b = values[1];
        self.c = values[2];
        self.d = values[3];
        self.k = values[4];

        Ok(())
    }
}
