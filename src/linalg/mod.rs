//! Dense matrix routines backing the numerical path of the impulse matrix,
//! sized for the small fixed systems this crate integrates.

use ndarray::{Array2, Axis};


/// Calculates the infinity norm (maximum absolute row sum) of a square matrix
pub fn infinity_norm(matrix: &Array2<f64>) -> f64 {
    matrix.map_axis(Axis(1), |row| row.iter().map(|value| value.abs()).sum::<f64>())
        .iter()
        .fold(0., |acc: f64, &row_sum| acc.max(row_sum))
}

/// Solves `a * x = b` for a square `a` and matrix right hand side `b` using
/// Gaussian elimination with partial pivoting, `a` and `b` are consumed as
/// working storage, returns `None` if a pivot vanishes (singular system)
pub fn solve(mut a: Array2<f64>, mut b: Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();

    for column in 0..n {
        // pivot on the largest remaining entry in this column
        let mut pivot_row = column;
        for row in (column + 1)..n {
            if a[[row, column]].abs() > a[[pivot_row, column]].abs() {
                pivot_row = row;
            }
        }

        if a[[pivot_row, column]] == 0. {
            return None;
        }

        if pivot_row != column {
            for k in 0..n {
                let swapped = a[[column, k]];
                a[[column, k]] = a[[pivot_row, k]];
                a[[pivot_row, k]] = swapped;

                let swapped = b[[column, k]];
                b[[column, k]] = b[[pivot_row, k]];
                b[[pivot_row, k]] = swapped;
            }
        }

        for row in (column + 1)..n {
            let factor = a[[row, column]] / a[[column, column]];
            for k in column..n {
                a[[row, k]] -= factor * a[[column, k]];
            }
            for k in 0..n {
                b[[row, k]] -= factor * b[[column, k]];
            }
        }
    }

    let mut x = Array2::<f64>::zeros((n, n));
    for column in 0..n {
        for row in (0..n).rev() {
            let mut sum = b[[row, column]];
            for k in (row + 1)..n {
                sum -= a[[row, k]] * x[[k, column]];
            }
            x[[row, column]] = sum / a[[row, row]];
        }
    }

    Some(x)
}

/// Calculates the matrix exponential `e^a` of a square matrix using
/// scaling and squaring with a 6th order Padé approximant
pub fn matrix_exponential(a: &Array2<f64>) -> Array2<f64> {
    let n = a.nrows();
    let identity = Array2::<f64>::eye(n);

    let norm = infinity_norm(a);
    let scaling_power = if norm > 0.5 {
        (norm / 0.5).log2().ceil() as i32
    } else {
        0
    };

    let scaled = a.mapv(|value| value / f64::powi(2., scaling_power));

    // Padé numerator and denominator built from the coefficient recurrence
    const ORDER: usize = 6;
    let mut coefficient = 1.;
    let mut term = identity.clone();
    let mut numerator = identity.clone();
    let mut denominator = identity.clone();

    for k in 0..ORDER {
        coefficient *= (ORDER - k) as f64 / ((2 * ORDER - k) * (k + 1)) as f64;
        term = scaled.dot(&term);

        let weighted = term.mapv(|value| value * coefficient);
        numerator += &weighted;
        if (k + 1) % 2 == 0 {
            denominator += &weighted;
        } else {
            denominator -= &weighted;
        }
    }

    // the denominator is diagonally dominant after scaling, the pivot
    // cannot vanish
    let mut exponential = solve(denominator, numerator)
        .expect("Padé denominator must be invertible after scaling");

    for _ in 0..scaling_power {
        exponential = exponential.dot(&exponential);
    }

    exponential
}
