//! Sampling utilities shared by the algorithms

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{is_probability, Result, RlError};

/// Return one of the candidates holding the highest value.
///
/// Ties are broken uniformly at random among exactly the tied candidates;
/// values are compared with exact floating-point equality. The running
/// maximum starts at the first candidate's value, so tables made only of
/// negative values still select their true maximisers. NaN values are never
/// selected.
pub fn argmax<'a, T, I, R>(candidates: I, rng: &mut R) -> Result<&'a T>
where
    T: 'a,
    I: IntoIterator<Item = (&'a T, f64)>,
    R: Rng + ?Sized,
{
    let mut greedies: Vec<&'a T> = Vec::new();
    let mut highest = f64::NEG_INFINITY;

    for (candidate, value) in candidates {
        if value.is_nan() {
            continue;
        }
        if greedies.is_empty() || value > highest {
            highest = value;
            greedies.clear();
            greedies.push(candidate);
        } else if value == highest {
            greedies.push(candidate);
        }
    }

    greedies
        .choose(rng)
        .copied()
        .ok_or(RlError::EmptyActionSet)
}

/// Whether to take the chance of probability `epsilon`: a uniform draw in
/// [0, 1] equal to or below `epsilon` is a pick.
pub fn pick<R: Rng + ?Sized>(epsilon: f64, rng: &mut R) -> Result<bool> {
    if !is_probability(epsilon) {
        return Err(RlError::InvalidProbability(epsilon));
    }
    let draw: f64 = rng.gen_range(0.0..=1.0);
    Ok(draw <= epsilon)
}

/// Return a random item from the passed slice
pub fn random_from<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Result<&'a T> {
    items.choose(rng).ok_or(RlError::EmptyActionSet)
}
