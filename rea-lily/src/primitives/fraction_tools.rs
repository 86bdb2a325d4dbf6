//! Tools for optimizing fractions as musical lengths.

use std::collections::VecDeque;

use fraction::Fraction;

use crate::error::{ScoreError, ScoreResult};

/// Zero as Fraction, for comparisons with lengths and positions.
pub fn zero() -> Fraction {
    Fraction::new(0u64, 1u64)
}

/// Quantize Fraction to the provided denominator.
///
/// Fractions which denominator is already in limit are returned as-is.
/// Others are rounded to the nearest `k/limit`. This is the place, where
/// floating-point jitter of the host timeline is dropped, so the result
/// is an approximation by intent.
///
/// By default library uses 1/128.
///
/// # Example
///
/// ```
/// # use fraction::Fraction;
/// # use rea_lily::primitives::limit_denominator;
/// assert_eq!(
///     limit_denominator(Fraction::new(1u64, 129u64), 128).unwrap(),
///     Fraction::new(1u64, 128u64)
/// );
/// ```
pub fn limit_denominator(frac: Fraction, limit: u64) -> ScoreResult<Fraction> {
    if limit < 1 {
        return Err(ScoreError::InvariantViolation(format!(
            "denominator limit shouldn't be less than one. input: {}",
            limit
        )));
    }
    let (num, denom) = numer_denom(frac)?;
    if denom <= limit {
        return Ok(frac);
    }
    // round half up: (num * limit + denom / 2) / denom
    let rounded = (num as u128 * limit as u128 * 2 + denom as u128)
        / (denom as u128 * 2);
    let limited = Fraction::new(rounded as u64, limit);
    match frac.is_sign_negative() {
        true => Ok(-limited),
        false => Ok(limited),
    }
}

/// Numerator and denominator of a finite fraction.
pub fn numer_denom(frac: Fraction) -> ScoreResult<(u64, u64)> {
    match (frac.numer(), frac.denom()) {
        (Some(num), Some(denom)) => Ok((*num, *denom)),
        _ => Err(ScoreError::InvariantViolation(format!(
            "fraction is not a finite number: {}",
            frac
        ))),
    }
}

/// The largest power of two, that is not bigger than `num`.
fn power_of_two(num: u64) -> u64 {
    match num {
        0 => 0,
        x => 1u64 << (63 - x.leading_zeros()),
    }
}

/// Split complex fraction by simple fractions, that could be interpreted as
/// musical lengths.
///
/// # Returns
///
/// Vector of fractions, started with the smallest, up to the largest.
///
/// # Example
///
/// ```
/// # use fraction::Fraction;
/// # use std::collections::VecDeque;
/// # use rea_lily::primitives::normalize_fraction;
/// assert_eq!(
///     normalize_fraction(Fraction::new(13u64, 16u64), VecDeque::new()),
///         vec![
///             Fraction::new(1u64, 16u64),
///             Fraction::new(1u64, 4u64),
///             Fraction::new(1u64, 2u64)
///         ]
/// );
/// ```
pub fn normalize_fraction(
    frac: Fraction,
    mut head: VecDeque<Fraction>,
) -> VecDeque<Fraction> {
    let (num, den) = match (frac.numer(), frac.denom()) {
        (Some(num), Some(den)) => (*num, *den),
        _ => return head,
    };
    if num == 0 {
        return head;
    }

    if den == 1 || num < 5 || num == power_of_two(num) {
        head.push_back(frac);
        return head;
    }
    let num_nr = power_of_two(num);

    let whole = Fraction::new(num_nr, den);
    let remainder = Fraction::new(num - num_nr, den);
    if remainder.numer().map_or(false, |n| *n > 3) {
        head.push_back(whole);
        return normalize_fraction(remainder, head);
    }
    head.push_front(whole);
    head.push_front(remainder);
    head
}

/// Normalized fraction, where every part longer than a whole note is
/// spread over tied whole notes.
///
/// Breve and longa are not used, so every part is at most a dotted whole.
///
/// # Example
///
/// ```
/// # use fraction::Fraction;
/// # use rea_lily::primitives::normalized_parts;
/// assert_eq!(
///     normalized_parts(Fraction::new(5u64, 2u64)),
///     vec![
///         Fraction::new(1u64, 2u64),
///         Fraction::new(1u64, 1u64),
///         Fraction::new(1u64, 1u64),
///     ]
/// );
/// ```
pub fn normalized_parts(frac: Fraction) -> Vec<Fraction> {
    normalize_fraction(frac, VecDeque::new())
        .into_iter()
        .flat_map(|part| match (part.numer(), part.denom()) {
            (Some(num), Some(den)) if *den == 1 => {
                vec![Fraction::new(1u64, 1u64); *num as usize]
            }
            _ => vec![part],
        })
        .collect()
}
