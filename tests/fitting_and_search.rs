#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use adaptive_threshold_neurons::error::GeneticAlgorithmError;
    use adaptive_threshold_neurons::fitting::{
        compare_summary, fit_backend_to_reference, get_reference_scale, get_summary,
        scale_summary, SummaryScalingDefaults,
    };
    use adaptive_threshold_neurons::ga::{
        decode, genetic_algo, BitString, GeneticAlgorithmParameters,
    };
    use adaptive_threshold_neurons::neuron::mat::{MatBackend, MatParameters};
    use adaptive_threshold_neurons::neuron::Optimizable;
    use adaptive_threshold_neurons::stimulus::SquarePulse;

    #[test]
    pub fn test_summary_of_a_spike_train() {
        let summary = get_summary(&[10., 20., 30., 45.]);

        assert_eq!(summary.num_spikes, 4.);
        assert!((summary.average_interspike_interval - 35. / 3.).abs() < 1e-12);
        assert_eq!(summary.first_spike_time, 10.);
    }

    #[test]
    pub fn test_summary_of_an_empty_spike_train() {
        let summary = get_summary(&[]);

        assert_eq!(summary.num_spikes, 0.);
        assert_eq!(summary.average_interspike_interval, 0.);
        assert_eq!(summary.first_spike_time, 0.);
    }

    #[test]
    pub fn test_identical_summaries_compare_to_zero() {
        let summary = get_summary(&[10., 20., 30.]);

        assert_eq!(compare_summary(&summary, &summary), 0.);
    }

    #[test]
    pub fn test_nan_summaries_compare_to_infinity() {
        let summary = get_summary(&[10., 20., 30.]);
        let mut corrupted = get_summary(&[10., 20., 30.]);
        corrupted.first_spike_time = f64::NAN;

        assert_eq!(compare_summary(&summary, &corrupted), f64::INFINITY);
    }

    #[test]
    pub fn test_reference_scaling_falls_back_to_defaults_without_spikes() {
        let silent = get_summary(&[]);
        let defaults = SummaryScalingDefaults::default();

        let (scaled, factors) = get_reference_scale(&silent, &defaults);

        assert_eq!(factors.interval_scale, defaults.default_interval_scale);
        assert_eq!(factors.num_spikes_scale, defaults.default_num_spikes_scale);
        assert_eq!(factors.first_spike_scale, defaults.default_first_spike_scale);
        assert_eq!(scaled.num_spikes, 0.);

        let firing = get_summary(&[50., 100.]);
        let (scaled_firing, firing_factors) = get_reference_scale(&firing, &defaults);

        assert_eq!(firing_factors.num_spikes_scale, 2.);
        assert_eq!(scaled_firing.num_spikes, 1.);

        let rescaled = scale_summary(&firing, &firing_factors);
        assert_eq!(rescaled.num_spikes, scaled_firing.num_spikes);
    }

    #[test]
    pub fn test_decode_maps_bitstrings_into_bounds() -> Result<(), GeneticAlgorithmError> {
        let bitstring = BitString { string: String::from("0000000011111111") };
        let bounds = [(0., 1.), (0., 1.)];

        let decoded = decode(&bitstring, &bounds, 8)?;

        assert_eq!(decoded, vec![0., 1.]);

        Ok(())
    }

    #[test]
    pub fn test_decode_rejects_mismatched_bounds() {
        let bitstring = BitString { string: String::from("0000000011111111") };

        assert!(matches!(
            decode(&bitstring, &[(0., 1.)], 8),
            Err(GeneticAlgorithmError::BoundsMismatch),
        ));
        assert!(matches!(
            decode(&bitstring, &[(0., 1.), (0., 1.), (0., 1.)], 5),
            Err(GeneticAlgorithmError::IndivisibleBitstring),
        ));
    }

    #[test]
    pub fn test_genetic_algo_rejects_tiny_populations() {
        let params = GeneticAlgorithmParameters {
            bounds: vec![(0., 1.)],
            n_pop: 1,
            ..GeneticAlgorithmParameters::default()
        };

        let settings: HashMap<&str, ()> = HashMap::new();
        let result = genetic_algo(|_, _, _, _| Ok(0.), &params, &settings, false);

        assert!(matches!(result, Err(GeneticAlgorithmError::PopulationTooSmall)));
    }

    #[test]
    pub fn test_genetic_algo_minimizes_a_simple_objective(
    ) -> Result<(), GeneticAlgorithmError> {
        fn objective(
            bitstring: &BitString,
            bounds: &[(f64, f64)],
            n_bits: usize,
            _settings: &HashMap<&str, ()>,
        ) -> Result<f64, GeneticAlgorithmError> {
            let decoded = decode(bitstring, bounds, n_bits)?;

            Ok(decoded.iter().map(|value| (value - 0.25).powf(2.)).sum())
        }

        let params = GeneticAlgorithmParameters {
            bounds: vec![(0., 1.), (0., 1.)],
            n_bits: 8,
            n_iter: 5,
            n_pop: 20,
            ..GeneticAlgorithmParameters::default()
        };

        let settings: HashMap<&str, ()> = HashMap::new();
        let (best, best_score, all_scores) = genetic_algo(objective, &params, &settings, false)?;

        assert_eq!(best.string.len(), 16);
        assert!(best_score.is_finite());
        assert_eq!(all_scores.len(), params.n_iter);

        Ok(())
    }

    #[test]
    pub fn test_fitting_returns_parameters_within_the_backend_bounds(
    ) -> Result<(), GeneticAlgorithmError> {
        let reference = MatBackend::new(MatParameters {
            a1: 15.,
            w: 8.,
            ..MatParameters::default()
        }).unwrap();
        let template = MatBackend::default();

        let stimuli = vec![
            SquarePulse::new(100., 10., 200.).unwrap(),
            SquarePulse::new(60., 10., 200.).unwrap(),
        ];

        let search_params = GeneticAlgorithmParameters {
            n_bits: 8,
            n_iter: 2,
            n_pop: 10,
            ..GeneticAlgorithmParameters::default()
        };

        let (decoded, reference_summaries, generated_summaries, scaling_factors) =
            fit_backend_to_reference(
                &template,
                &reference,
                Some(SummaryScalingDefaults::default()),
                &stimuli,
                1.0,
                &search_params,
                None,
                false,
            )?;

        let bounds = template.parameter_bounds();
        assert_eq!(decoded.len(), bounds.len());
        for (value, (lower, upper)) in decoded.iter().zip(bounds.iter()) {
            assert!(lower <= value && value <= upper);
        }

        assert_eq!(reference_summaries.len(), stimuli.len());
        assert_eq!(generated_summaries.len(), stimuli.len());
        assert!(scaling_factors.iter().all(|factors| factors.is_some()));

        Ok(())
    }
}
