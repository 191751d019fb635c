use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for model parameter validation
#[derive(Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// A time constant that must be strictly positive is zero or negative
    NonPositiveTimeConstant(String),
    /// Refractory period is negative
    NegativeRefractoryPeriod,
    /// A parameter is NaN or infinite
    NonFiniteParameter(String),
    /// Membrane and threshold time constants coincide, closed form entries
    /// divide by their difference
    DegenerateTimeConstants,
}

impl Display for ParameterError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ParameterError::NonPositiveTimeConstant(name) =>
                write!(f, "Time constant {} must be strictly positive", name),
            ParameterError::NegativeRefractoryPeriod =>
                write!(f, "Refractory period must be nonnegative"),
            ParameterError::NonFiniteParameter(name) =>
                write!(f, "Parameter {} must be finite", name),
            ParameterError::DegenerateTimeConstants =>
                write!(f, "Membrane and threshold time constants cannot be equal in the closed form"),
        }
    }
}

impl Debug for ParameterError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential stimulus construction errors
#[derive(Clone, PartialEq, Eq)]
pub enum StimulusError {
    /// Time step is zero or negative
    NonPositiveTimestep,
    /// Pulse delay or duration is negative
    NegativePulseTiming,
    /// Pulse amplitude is NaN or infinite
    NonFiniteAmplitude,
}

impl Display for StimulusError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            StimulusError::NonPositiveTimestep => "Time step must be strictly positive",
            StimulusError::NegativePulseTiming => "Pulse delay and duration must be nonnegative",
            StimulusError::NonFiniteAmplitude => "Pulse amplitude must be finite",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for StimulusError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential genetic algorithm errors
#[derive(Clone, PartialEq, Eq)]
pub enum GeneticAlgorithmError {
    /// Bitstring contains a character that is not `'0'` or `'1'`
    NonBinaryInBitstring(String),
    /// Number of bounds does not match the number of genes in the bitstring
    BoundsMismatch,
    /// Bitstring length is not divisible by the bits per gene
    IndivisibleBitstring,
    /// Population must contain at least two members to select and cross over
    PopulationTooSmall,
    /// Objective function could not be evaluated
    ObjectiveFunctionFailure(String),
}

impl Display for GeneticAlgorithmError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            GeneticAlgorithmError::NonBinaryInBitstring(string) =>
                write!(f, "Non binary found: {}", string),
            GeneticAlgorithmError::BoundsMismatch =>
                write!(f, "Bounds length does not match number of genes"),
            GeneticAlgorithmError::IndivisibleBitstring =>
                write!(f, "String length is indivisible by bits per gene"),
            GeneticAlgorithmError::PopulationTooSmall =>
                write!(f, "Population must contain at least two members"),
            GeneticAlgorithmError::ObjectiveFunctionFailure(msg) =>
                write!(f, "Objective function failure: {}", msg),
        }
    }
}

impl Debug for GeneticAlgorithmError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
#[derive(Clone, PartialEq, Eq)]
pub enum AdaptiveThresholdError {
    /// Errors related to model parameter validation
    ParameterRelatedError(ParameterError),
    /// Errors related to stimulus construction
    StimulusRelatedError(StimulusError),
    /// Errors related to genetic algorithm fitting
    GeneticAlgorithmRelatedError(GeneticAlgorithmError),
}

impl Display for AdaptiveThresholdError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            AdaptiveThresholdError::ParameterRelatedError(err) => write!(f, "{}", err),
            AdaptiveThresholdError::StimulusRelatedError(err) => write!(f, "{}", err),
            AdaptiveThresholdError::GeneticAlgorithmRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for AdaptiveThresholdError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<ParameterError> for AdaptiveThresholdError {
    fn from(err: ParameterError) -> AdaptiveThresholdError {
        AdaptiveThresholdError::ParameterRelatedError(err)
    }
}

impl From<StimulusError> for AdaptiveThresholdError {
    fn from(err: StimulusError) -> AdaptiveThresholdError {
        AdaptiveThresholdError::StimulusRelatedError(err)
    }
}

impl From<GeneticAlgorithmError> for AdaptiveThresholdError {
    fn from(err: GeneticAlgorithmError) -> AdaptiveThresholdError {
        AdaptiveThresholdError::GeneticAlgorithmRelatedError(err)
    }
}
