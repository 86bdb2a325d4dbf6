use std::ops::{Add, Sub};

use fraction::Fraction;

use crate::{
    error::{ScoreError, ScoreResult},
    lilypond_render::RendersToLilypond,
};

use super::{
    fraction_tools::{numer_denom, zero},
    normalized_parts, TimeSignature,
};

/// Duration of event in whole notes.
///
/// `tie` marks the length, that continues into the next event.
/// It does not take part in comparisons.
#[derive(Debug, Clone)]
pub struct Length {
    fraction: Fraction,
    tie: bool,
}
impl Length {
    pub fn get(&self) -> Fraction {
        self.fraction
    }
    pub fn tie(&self) -> bool {
        self.tie
    }
    pub fn tied(mut self) -> Self {
        self.tie = true;
        self
    }

    /// Lilypond duration tokens of every tied part of the length.
    ///
    /// Tie is not rendered here.
    pub fn render_parts(&self) -> ScoreResult<Vec<String>> {
        normalized_parts(self.get())
            .into_iter()
            .map(render_part)
            .collect()
    }
}

/// Render single normalized fraction as lilypond duration.
fn render_part(part: Fraction) -> ScoreResult<String> {
    let (num, den) = numer_denom(part)?;
    match (num, den) {
        (num, 1) => Ok(format!("{}", num)),
        (1, den) => Ok(format!("{}", den)),
        (3, den) if den > 1 => Ok(format!("{}.", den / 2)),
        (2, den) | (4, den) => Ok(format!("{}/{}", num, den)),
        _ => Err(ScoreError::UnrepresentableDuration(part)),
    }
}

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}
impl PartialOrd for Length {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.get().partial_cmp(&other.get())
    }
}
impl From<Fraction> for Length {
    fn from(value: Fraction) -> Self {
        Self {
            fraction: value,
            tie: false,
        }
    }
}
impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::from(Fraction::from(value))
    }
}
impl From<&TimeSignature> for Length {
    fn from(ts: &TimeSignature) -> Self {
        Self::from(Fraction::new(ts.numerator, ts.denominator))
    }
}
impl Add for Length {
    fn add(self, rhs: Self) -> Self::Output {
        Self::from(self.get() + rhs.get())
    }
    type Output = Self;
}
/// Length can not be zero or negative, so the difference is checked.
impl Sub for Length {
    fn sub(self, rhs: Self) -> Self::Output {
        let frac = self.get() - rhs.get();
        if frac <= zero() {
            return Err(ScoreError::InvariantViolation(format!(
                "length must be positive. left: {}, right: {}, result: {}",
                self.get(),
                rhs.get(),
                frac
            )));
        }
        Ok(Self::from(frac))
    }
    type Output = ScoreResult<Self>;
}
impl RendersToLilypond for Length {
    fn render_lilypond(&self) -> ScoreResult<String> {
        let mut out = self.render_parts()?.join("~");
        if self.tie {
            out.push('~');
        }
        Ok(out)
    }
}
