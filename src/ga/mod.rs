//! A bitstring genetic algorithm used to search backend parameter spaces.

use std::{
    collections::HashMap,
    marker::Sync,
};
use rand::Rng;
use rayon::prelude::*;
use crate::error::GeneticAlgorithmError;


/// A candidate solution encoded as a binary string
#[derive(Clone)]
pub struct BitString {
    pub string: String,
}

impl BitString {
    fn check(&self) -> Result<(), GeneticAlgorithmError> {
        for i in self.string.chars() {
            if i != '1' && i != '0' {
                return Err(GeneticAlgorithmError::NonBinaryInBitstring(self.string.clone()));
            }
        }

        Ok(())
    }

    fn set(&mut self, new_string: String) -> Result<(), GeneticAlgorithmError> {
        // check after initalization

        self.string = new_string;

        self.check()
    }

    fn length(&self) -> usize {
        self.string.len()
    }
}

/// Hyperparameters of the genetic algorithm
#[derive(Clone)]
pub struct GeneticAlgorithmParameters {
    /// Lower and upper bound per gene
    pub bounds: Vec<(f64, f64)>,
    /// Bits encoding each gene
    pub n_bits: usize,
    /// Number of generations
    pub n_iter: usize,
    /// Population size, rounded down to an even count when running
    pub n_pop: usize,
    /// Crossover rate
    pub r_cross: f64,
    /// Bit flip mutation rate
    pub r_mut: f64,
    /// Tournament size for selection
    pub k: usize,
}

impl Default for GeneticAlgorithmParameters {
    fn default() -> Self {
        GeneticAlgorithmParameters {
            bounds: vec![],
            n_bits: 16,
            n_iter: 15,
            n_pop: 100,
            r_cross: 0.9,
            r_mut: 0.02,
            k: 3,
        }
    }
}

fn crossover(parent1: &BitString, parent2: &BitString, r_cross: f64) -> (BitString, BitString) {
    let mut rng_thread = rand::thread_rng();
    let (mut clone1, mut clone2) = (parent1.clone(), parent2.clone());

    if parent1.length() > 1 && rng_thread.gen::<f64>() <= r_cross {
        let end_point = parent1.length();
        let crossover_point = rng_thread.gen_range(1..end_point);

        let string1 = format!(
            "{}{}", &parent1.string[0..crossover_point], &parent2.string[crossover_point..]
        );
        let string2 = format!(
            "{}{}", &parent2.string[0..crossover_point], &parent1.string[crossover_point..]
        );

        clone1.set(string1).expect("Error setting bitstring");
        clone2.set(string2).expect("Error setting bitstring");
    }

    (clone1, clone2)
}

fn mutate(bitstring: &mut BitString, r_mut: f64) {
    let mut rng_thread = rand::thread_rng();
    let mut mutated = String::with_capacity(bitstring.length());

    for bit in bitstring.string.chars() {
        if rng_thread.gen::<f64>() <= r_mut {
            // in place bit flip
            mutated.push(if bit == '1' { '0' } else { '1' });
        } else {
            mutated.push(bit);
        }
    }

    bitstring.set(mutated).expect("Error setting bitstring");
}

fn selection(pop: &[BitString], scores: &[f64], k: usize) -> BitString {
    let mut rng_thread = rand::thread_rng();
    let mut selection_index = rng_thread.gen_range(0..pop.len());

    let indices = (0..k.saturating_sub(1))
        .map(|_| rng_thread.gen_range(0..pop.len()));

    // performs tournament selection to select parents
    for i in indices {
        if scores[i] < scores[selection_index] {
            selection_index = i;
        }
    }

    pop[selection_index].clone()
}

/// Decodes a bitstring into one bounded value per gene
pub fn decode(
    bitstring: &BitString,
    bounds: &[(f64, f64)],
    n_bits: usize,
) -> Result<Vec<f64>, GeneticAlgorithmError> {
    if bounds.len() != bitstring.length() / n_bits {
        return Err(GeneticAlgorithmError::BoundsMismatch);
    }
    if bitstring.length() % n_bits != 0 {
        return Err(GeneticAlgorithmError::IndivisibleBitstring);
    }

    let maximum = i64::pow(2, n_bits as u32) as f64 - 1.;
    let mut decoded_vec = vec![0.; bounds.len()];

    for (i, (lower, upper)) in bounds.iter().enumerate() {
        let (start, end) = (i * n_bits, (i * n_bits) + n_bits);
        let substring = &bitstring.string[start..end];

        let value = match i64::from_str_radix(substring, 2) {
            Ok(value_result) => value_result as f64,
            Err(_e) => return Err(
                GeneticAlgorithmError::NonBinaryInBitstring(String::from(substring))
            ),
        };

        decoded_vec[i] = value * (upper - lower) / maximum + lower;
    }

    Ok(decoded_vec)
}

fn create_random_string(length: usize) -> BitString {
    let mut rng_thread = rand::thread_rng();
    let mut random_string = String::with_capacity(length);

    for _ in 0..length {
        if rng_thread.gen::<f64>() <= 0.5 {
            random_string.push('0');
        } else {
            random_string.push('1');
        }
    }

    BitString { string: random_string }
}

/// Minimizes the given objective over the bounded parameter space, the
/// settings map is passed through to every objective evaluation, returns
/// the best bitstring, its score and the scores of every generation
///
/// Objective scores are evaluated across the population in parallel
pub fn genetic_algo<T: Sync>(
    f: fn(&BitString, &[(f64, f64)], usize, &HashMap<&str, T>) -> Result<f64, GeneticAlgorithmError>,
    params: &GeneticAlgorithmParameters,
    settings: &HashMap<&str, T>,
    verbose: bool,
) -> Result<(BitString, f64, Vec<Vec<f64>>), GeneticAlgorithmError> {
    let n_pop = params.n_pop - params.n_pop % 2;
    if n_pop < 2 {
        return Err(GeneticAlgorithmError::PopulationTooSmall);
    }

    let mut pop: Vec<BitString> = (0..n_pop)
        .map(|_| create_random_string(params.n_bits * params.bounds.len()))
        .collect();

    let mut best = pop[0].clone();
    let mut best_eval = f(&pop[0], &params.bounds, params.n_bits, settings)?;

    let mut all_scores = vec![];

    for gen in 0..params.n_iter {
        if verbose {
            println!("gen: {}", gen + 1);
        }

        let scores_results: Result<Vec<f64>, GeneticAlgorithmError> = pop
            .par_iter()
            .map(|p| f(p, &params.bounds, params.n_bits, settings))
            .collect();

        // check if objective failed anywhere
        let scores = scores_results?;

        all_scores.push(scores.clone());

        for i in 0..n_pop {
            if scores[i] < best_eval {
                best = pop[i].clone();
                best_eval = scores[i];
                if verbose {
                    println!("new string: {}, score: {}", &pop[i].string, &scores[i]);
                }
            }
        }

        let selected: Vec<BitString> = (0..n_pop)
            .into_par_iter()
            .map(|_| selection(&pop, &scores, params.k))
            .collect();

        let children = (0..n_pop)
            .into_par_iter()
            .step_by(2)
            .flat_map(|i| {
                let new_children = crossover(&selected[i], &selected[i + 1], params.r_cross);
                vec![new_children.0, new_children.1]
            })
            .map(|mut child| {
                mutate(&mut child, params.r_mut);
                child
            })
            .collect();

        pop = children;
    }

    Ok((best, best_eval, all_scores))
}
