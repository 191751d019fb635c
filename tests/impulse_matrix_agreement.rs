#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use adaptive_threshold_neurons::error::ParameterError;
    use adaptive_threshold_neurons::neuron::mat::{
        generator_matrix, impulse_matrix, impulse_matrix_direct, impulse_matrix_expm,
        MatParameters, STATE_DIMENSION,
    };

    fn random_parameters(rng: &mut StdRng) -> MatParameters {
        let mut parameters = MatParameters {
            a1: rng.gen_range(0.0..40.0),
            a2: rng.gen_range(0.0..10.0),
            b: rng.gen_range(0.0..3.0),
            w: rng.gen_range(0.0..20.0),
            r: rng.gen_range(1.0..30.0),
            tm: rng.gen_range(2.0..50.0),
            t1: rng.gen_range(2.0..50.0),
            t2: rng.gen_range(50.0..400.0),
            tv: rng.gen_range(2.0..50.0),
            tref: rng.gen_range(0.0..5.0),
        };

        // keep the closed form well conditioned
        if (parameters.tm - parameters.tv).abs() < 0.5 {
            parameters.tv += 1.;
        }

        parameters
    }

    #[test]
    pub fn test_impulse_matrix_is_deterministic() {
        let parameters = MatParameters::default();

        let first = impulse_matrix(&parameters, 1.0).unwrap();
        let second = impulse_matrix(&parameters, 1.0).unwrap();

        assert_eq!(first, second);

        let first_numerical = impulse_matrix_expm(&parameters, 1.0).unwrap();
        let second_numerical = impulse_matrix_expm(&parameters, 1.0).unwrap();

        assert_eq!(first_numerical, second_numerical);
    }

    #[test]
    pub fn test_closed_form_agrees_with_numerical_exponential() -> Result<(), ParameterError> {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let parameters = random_parameters(&mut rng);

            for dt in [0.1, 1.0, 2.5] {
                let direct = impulse_matrix_direct(&parameters, dt)?;
                let numerical = impulse_matrix_expm(&parameters, dt)?;

                for i in 0..STATE_DIMENSION {
                    for j in 0..STATE_DIMENSION {
                        let difference = (direct[[i, j]] - numerical[[i, j]]).abs();
                        let scale = direct[[i, j]].abs()
                            .max(numerical[[i, j]].abs())
                            .max(1.);

                        assert!(
                            difference <= 1e-6 * scale,
                            "entry ({}, {}) differs: {} vs {}",
                            i, j, direct[[i, j]], numerical[[i, j]],
                        );
                    }
                }
            }
        }

        Ok(())
    }

    #[test]
    pub fn test_degenerate_time_constants_error_in_closed_form() {
        let parameters = MatParameters {
            tv: 10.,
            tm: 10.,
            ..MatParameters::default()
        };

        assert_eq!(
            impulse_matrix_direct(&parameters, 1.0),
            Err(ParameterError::DegenerateTimeConstants),
        );
    }

    #[test]
    pub fn test_degenerate_time_constants_fall_back_to_numerical_path(
    ) -> Result<(), ParameterError> {
        let parameters = MatParameters {
            tv: 10.,
            tm: 10.,
            b: 1.5,
            ..MatParameters::default()
        };

        let fallback = impulse_matrix(&parameters, 1.0)?;
        let numerical = impulse_matrix_expm(&parameters, 1.0)?;

        assert_eq!(fallback, numerical);

        Ok(())
    }

    #[test]
    pub fn test_invalid_parameters_are_rejected() {
        let nonpositive = MatParameters {
            t1: 0.,
            ..MatParameters::default()
        };
        assert_eq!(
            impulse_matrix(&nonpositive, 1.0),
            Err(ParameterError::NonPositiveTimeConstant(String::from("t1"))),
        );

        let negative_refractory = MatParameters {
            tref: -1.,
            ..MatParameters::default()
        };
        assert_eq!(
            impulse_matrix(&negative_refractory, 1.0),
            Err(ParameterError::NegativeRefractoryPeriod),
        );

        let non_finite = MatParameters {
            w: f64::NAN,
            ..MatParameters::default()
        };
        assert_eq!(
            impulse_matrix(&non_finite, 1.0),
            Err(ParameterError::NonFiniteParameter(String::from("w"))),
        );

        assert_eq!(
            impulse_matrix(&MatParameters::default(), 0.),
            Err(ParameterError::NonPositiveTimeConstant(String::from("dt"))),
        );
    }

    #[test]
    pub fn test_zero_coupling_decouples_threshold_block() -> Result<(), ParameterError> {
        let parameters = MatParameters {
            b: 0.,
            ..MatParameters::default()
        };

        let direct = impulse_matrix_direct(&parameters, 1.0)?;
        let numerical = impulse_matrix_expm(&parameters, 1.0)?;

        for (i, j) in [(4, 0), (4, 1), (5, 0), (5, 1), (0, 4), (0, 5)] {
            assert_eq!(direct[[i, j]], 0.);
            assert!(numerical[[i, j]].abs() < 1e-12);
        }

        // the remaining block is plain exponential decay of the pair
        let threshold_decay = (-1.0 / parameters.tv).exp();
        assert!((direct[[4, 4]] - threshold_decay).abs() < 1e-12);
        assert!((direct[[5, 5]] - threshold_decay).abs() < 1e-12);
        assert!((direct[[4, 5]] - threshold_decay).abs() < 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_generator_row_structure() {
        let parameters = MatParameters::default();
        let generator = generator_matrix(&parameters);

        // the forcing accumulator has no dynamics of its own
        for j in 0..STATE_DIMENSION {
            assert_eq!(generator[[1, j]], 0.);
        }

        assert_eq!(generator[[0, 0]], -1. / parameters.tm);
        assert_eq!(generator[[0, 1]], 1.);
        assert_eq!(generator[[2, 2]], -1. / parameters.t1);
        assert_eq!(generator[[3, 3]], -1. / parameters.t2);
    }
}
