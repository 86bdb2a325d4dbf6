//! Everything needed to manipulate positions of events.
//!
//! Position is absolute: distance from the origin of [MeasureMap] in whole
//! notes. On construction it is resolved against the map, so it also
//! carries relative view: measure index and distance from measure start.
//! The relative view is not a part of identity.
//!
//! # Examples
//!
//! ```
//! use fraction::Fraction;
//! use rea_lily::primitives::{Length, Position, TimeMap, TimeSignature};
//!
//! let time_map = TimeMap::from_time_signatures([
//!     TimeSignature::new(7, 8),
//!     TimeSignature::new(5, 8),
//! ])
//! .unwrap();
//! let a = Position::resolve(Fraction::from(0.0), &time_map).unwrap();
//! let b = Position::resolve(Fraction::new(10u64, 8u64), &time_map).unwrap();
//! assert_eq!(b.measure_index(), 1);
//! assert_eq!(b.measure_position(), Fraction::new(3u64, 8u64));
//! assert_eq!(a.distance_to(&b), Length::from(Fraction::new(10u64, 8u64)));
//! assert!(a < b);
//! ```

use std::{cmp::Ordering, fmt::Display};

use derivative::Derivative;
use fraction::Fraction;

use crate::error::ScoreResult;

use super::{limit_denominator, Length, MeasureMap, LIMIT_DENOMINATOR};

/// Absolute position in whole notes with its place in measure.
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq, Eq, Hash)]
pub struct Position {
    absolute: Fraction,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    measure_index: u32,
    /// distance from the start of the measure.
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    measure_position: Fraction,
}
impl Position {
    /// Quantize position up to 1/128 and find its measure.
    pub fn resolve(
        absolute: Fraction,
        measure_map: &dyn MeasureMap,
    ) -> ScoreResult<Self> {
        let absolute = limit_denominator(absolute, LIMIT_DENOMINATOR)?;
        let measure = measure_map.measure_at(absolute)?;
        Ok(Self {
            absolute,
            measure_index: measure.index,
            measure_position: limit_denominator(
                absolute - measure.start,
                LIMIT_DENOMINATOR,
            )?,
        })
    }
    /// Host positions are measured in quarter notes.
    pub fn from_quarters(
        quarters: f64,
        measure_map: &dyn MeasureMap,
    ) -> ScoreResult<Self> {
        Self::resolve(
            Fraction::from(quarters) / Fraction::new(4u64, 1u64),
            measure_map,
        )
    }
    pub fn get(&self) -> Fraction {
        self.absolute
    }
    /// measure (0-based)
    pub fn measure_index(&self) -> u32 {
        self.measure_index
    }
    /// position in measure.
    pub fn measure_position(&self) -> Fraction {
        self.measure_position
    }
    /// Absolute distance between positions, regardless of their order.
    pub fn distance_to(&self, other: &Self) -> Length {
        let (mut a, mut b) = (self.get(), other.get());
        if a < b {
            (a, b) = (b, a);
        }
        Length::from(a - b)
    }
    /// Absolute position, where event of given length ends.
    pub fn end_of(&self, length: &Length) -> Fraction {
        self.absolute + length.get()
    }
}
impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute
            .partial_cmp(&other.absolute)
            .unwrap_or(Ordering::Equal)
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Position bar:{}, beat:{}>",
            self.measure_index, self.measure_position
        )
    }
}
