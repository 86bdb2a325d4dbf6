//! Main "ruler" for making voices and moving through score.
//!
//! Host provides measures through [MeasureMap]. [TimeMap] is the crate
//! implementation of it, built from the list of time signatures.
use fraction::Fraction;
use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};

use super::{
    fraction_tools::{numer_denom, zero},
    Length,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}
impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}
impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// Boundaries of a single measure in whole notes from the map origin.
#[derive(Debug, PartialEq, Clone)]
pub struct MeasureBounds {
    /// 0-based
    pub index: u32,
    pub start: Fraction,
    /// start of the next measure
    pub end: Fraction,
}
impl MeasureBounds {
    pub fn length(&self) -> Length {
        Length::from(self.end - self.start)
    }
}

/// Source of truth about measure boundaries.
pub trait MeasureMap {
    /// Measure, that contains given absolute position.
    fn measure_at(&self, position: Fraction) -> ScoreResult<MeasureBounds>;
    /// Measure by its 0-based index.
    fn measure(&self, index: u32) -> ScoreResult<MeasureBounds>;
}

#[derive(Debug, PartialEq, Clone)]
pub struct MeasureInfo {
    pub time_signature: TimeSignature,
    pub length: Length,
}
impl MeasureInfo {
    pub fn new(time_signature: TimeSignature) -> Self {
        let length = Length::from(&time_signature);
        Self {
            time_signature,
            length,
        }
    }
}

pub type TimeMapMeasures = Vec<MeasureInfo>;

/// Represents area of timeline, that should be exported.
///
/// Measures after the last one are considered to repeat its time
/// signature, so every position after the origin is resolvable.
#[derive(Debug, Clone)]
pub struct TimeMap {
    measures: TimeMapMeasures,
}
impl TimeMap {
    pub fn new(measures: TimeMapMeasures) -> ScoreResult<Self> {
        if measures.is_empty() {
            return Err(ScoreError::EmptyTimeMap);
        }
        Ok(Self { measures })
    }
    /// Time map where every measure has the same time signature.
    pub fn uniform(time_signature: TimeSignature) -> Self {
        Self {
            measures: vec![MeasureInfo::new(time_signature)],
        }
    }
    pub fn from_time_signatures(
        signatures: impl IntoIterator<Item = TimeSignature>,
    ) -> ScoreResult<Self> {
        Self::new(signatures.into_iter().map(MeasureInfo::new).collect())
    }
    pub fn get(&self) -> &TimeMapMeasures {
        &self.measures
    }

    fn measure_info(&self, index: u32) -> &MeasureInfo {
        let last = self.measures.len() - 1;
        &self.measures[(index as usize).min(last)]
    }
}
impl MeasureMap for TimeMap {
    fn measure_at(&self, position: Fraction) -> ScoreResult<MeasureBounds> {
        if position < zero() {
            return Err(ScoreError::PositionOutOfTimeMap(position));
        }
        let mut start = zero();
        for (idx, measure) in self.measures.iter().enumerate() {
            let end = start + measure.length.get();
            if end > position {
                return Ok(MeasureBounds {
                    index: idx as u32,
                    start,
                    end,
                });
            }
            start = end;
        }
        // continue with the last time signature
        let length = self.measure_info(u32::MAX).length.get();
        let measures_after = ((position - start) / length).floor();
        let (passed, _) = numer_denom(measures_after)?;
        let start = start + length * Fraction::new(passed, 1u64);
        Ok(MeasureBounds {
            index: (self.measures.len() as u64 + passed) as u32,
            start,
            end: start + length,
        })
    }
    fn measure(&self, index: u32) -> ScoreResult<MeasureBounds> {
        let mut start = zero();
        for idx in 0..index {
            start += self.measure_info(idx).length.get();
        }
        Ok(MeasureBounds {
            index,
            start,
            end: start + self.measure_info(index).length.get(),
        })
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use crate::{
        error::ScoreError,
        primitives::{Length, MeasureMap},
    };

    use super::{MeasureInfo, TimeMap, TimeSignature};

    fn time_map_1() -> TimeMap {
        TimeMap::from_time_signatures([
            TimeSignature::new(4, 4),
            TimeSignature::new(4, 4),
            TimeSignature::new(4, 4),
            TimeSignature::new(7, 8),
            TimeSignature::new(9, 8),
            TimeSignature::new(4, 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_contents() {
        let time_map = time_map_1();
        assert_eq!(time_map.get().len(), 6);
        let time_signature = TimeSignature::new(7, 8);
        assert_eq!(
            time_map.get()[3],
            MeasureInfo {
                length: Length::from(&time_signature),
                time_signature
            }
        );
        assert!(matches!(
            TimeMap::new(Vec::new()),
            Err(ScoreError::EmptyTimeMap)
        ));
    }

    #[test]
    fn test_measure_position() {
        let time_map = time_map_1();
        assert_eq!(time_map.measure(0).unwrap().start, Fraction::from(0.0));
        assert_eq!(time_map.measure(1).unwrap().start, Fraction::from(1.0));
        assert_eq!(time_map.measure(3).unwrap().start, Fraction::from(3.0));
        let position_5 = Fraction::from(3.0) + Fraction::new(7u64, 8u64);
        assert_eq!(time_map.measure(4).unwrap().start, position_5);
        assert_eq!(
            time_map.measure(5).unwrap().start,
            position_5 + Fraction::new(9u64, 8u64)
        );
        assert_eq!(
            time_map.measure(4).unwrap().length(),
            Length::from(Fraction::new(9u64, 8u64))
        );
    }

    #[test]
    fn test_measure_at() {
        let time_map = time_map_1();
        let bounds = time_map
            .measure_at(Fraction::new(8 * 3 + 7 + 3_u64, 8_u64))
            .unwrap();
        assert_eq!(bounds.index, 4);
        assert_eq!(bounds.start, Fraction::new(8 * 3 + 7_u64, 8_u64));
        // exactly at barline
        let bounds = time_map.measure_at(Fraction::from(1.0)).unwrap();
        assert_eq!(bounds.index, 1);
        // extrapolated after the last measure (starts at 6)
        let bounds = time_map
            .measure_at(Fraction::new(15u64, 2u64))
            .unwrap();
        assert_eq!(bounds.index, 7);
        assert_eq!(bounds.start, Fraction::from(7.0));
        assert_eq!(bounds.end, Fraction::from(8.0));
        assert_eq!(time_map.measure(7).unwrap(), bounds);
    }

    #[test]
    fn test_uniform() {
        let time_map = TimeMap::uniform(TimeSignature::new(3, 4));
        let bounds = time_map.measure_at(Fraction::new(7u64, 4u64)).unwrap();
        assert_eq!(bounds.index, 2);
        assert_eq!(bounds.start, Fraction::new(3u64, 2u64));
        assert!(time_map.measure_at(-Fraction::new(1u64, 4u64)).is_err());
    }
}
