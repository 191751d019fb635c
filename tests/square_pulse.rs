#[cfg(test)]
mod tests {
    use adaptive_threshold_neurons::error::StimulusError;
    use adaptive_threshold_neurons::stimulus::SquarePulse;

    #[test]
    pub fn test_expansion_fills_three_intervals() -> Result<(), StimulusError> {
        let pulse = SquarePulse::new(100., 10., 500.)?;
        let current = pulse.to_current_trace(1.0)?;

        assert_eq!(current.len(), 510);

        for (i, &value) in current.iter().enumerate() {
            if i < 10 {
                assert_eq!(value, 0.);
            } else {
                assert_eq!(value, 100.);
            }
        }

        Ok(())
    }

    #[test]
    pub fn test_expansion_respects_timestep() -> Result<(), StimulusError> {
        let pulse = SquarePulse::new(50., 10., 500.)?;
        let current = pulse.to_current_trace(0.5)?;

        assert_eq!(current.len(), 1020);
        assert_eq!(current[19], 0.);
        assert_eq!(current[20], 50.);
        assert_eq!(current[1019], 50.);

        Ok(())
    }

    #[test]
    pub fn test_zero_duration_expands_to_silence() -> Result<(), StimulusError> {
        let pulse = SquarePulse::new(100., 25., 0.)?;
        let current = pulse.to_current_trace(1.0)?;

        assert_eq!(current.len(), 25);
        assert!(current.iter().all(|&value| value == 0.));

        Ok(())
    }

    #[test]
    pub fn test_zero_delay_starts_immediately() -> Result<(), StimulusError> {
        let pulse = SquarePulse::new(10., 0., 5.)?;
        let current = pulse.to_current_trace(1.0)?;

        assert_eq!(current, vec![10.; 5]);

        Ok(())
    }

    #[test]
    pub fn test_invalid_pulses_are_rejected() {
        assert_eq!(
            SquarePulse::new(f64::NAN, 10., 500.),
            Err(StimulusError::NonFiniteAmplitude),
        );
        assert_eq!(
            SquarePulse::new(100., -1., 500.),
            Err(StimulusError::NegativePulseTiming),
        );
        assert_eq!(
            SquarePulse::new(100., 10., -1.),
            Err(StimulusError::NegativePulseTiming),
        );

        let pulse = SquarePulse::new(100., 10., 500.).unwrap();
        assert_eq!(
            pulse.to_current_trace(0.),
            Err(StimulusError::NonPositiveTimestep),
        );
        assert_eq!(
            pulse.to_current_trace(-1.),
            Err(StimulusError::NonPositiveTimestep),
        );
    }

    #[test]
    pub fn test_total_time() {
        let pulse = SquarePulse::new(100., 10., 500.).unwrap();
        assert_eq!(pulse.total_time(), 510.);
    }
}
