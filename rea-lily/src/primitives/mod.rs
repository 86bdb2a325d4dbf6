//! Elements, from which DOM constructed.
//!
//! At first, TimeMap is taken from the host timeline (or else).
//! Then events are resolved against it to Positions and Lengths.
//! Then notes are grouped, split by staves and built to voices.
//! Then rendered to lilypond source.

pub mod event;
pub mod fraction_tools;
pub mod length;
pub mod pitch;
pub mod position;
pub mod time_map;

pub use event::{Chord, Clef, Music, Note, Rest};
pub use fraction_tools::{
    limit_denominator, normalize_fraction, normalized_parts,
};
pub use length::Length;
pub use pitch::{Pitch, Spelling};
pub use position::Position;
pub use time_map::{
    MeasureBounds, MeasureInfo, MeasureMap, TimeMap, TimeMapMeasures,
    TimeSignature,
};

pub static LIMIT_DENOMINATOR: u64 = 128;
