//! Rendering of quantized note events to lilypond text.
//!
//! Host gives notes and text annotations with positions in quarter notes,
//! and the [MeasureMap] to resolve them. The result is a lilypond music
//! expression with one staff, or grand staff.
//!
//! ```
//! use rea_lily::{
//!     render_score, NoteEvent, RenderSettings, TimeMap, TimeSignature,
//! };
//!
//! let notes = [
//!     NoteEvent::new(60, 2.0, 3.0, 0),
//!     NoteEvent::new(64, 3.0, 4.0, 0),
//! ];
//! let time_map = TimeMap::uniform(TimeSignature::new(4, 4));
//! let score =
//!     render_score(&notes, &[], &time_map, &RenderSettings::default())
//!         .unwrap();
//! assert_eq!(score, "{\\new Staff {\\clef treble r2 c'4 e'4}}");
//! ```
pub mod dom;
pub mod error;
pub mod lilypond_render;
pub mod notation;
pub mod primitives;

pub use dom::{
    midi_parse::{AnnotationEvent, NoteEvent},
    score_from_events, Score, Staff, StaffGroup,
};
pub use error::{ScoreError, ScoreResult};
pub use lilypond_render::{lilypond_document, RenderSettings, RendersToLilypond};
pub use primitives::{MeasureBounds, MeasureMap, TimeMap, TimeSignature};

/// Build score from host events and render it to lilypond.
pub fn render_score(
    notes: &[NoteEvent],
    annotations: &[AnnotationEvent],
    measure_map: &dyn MeasureMap,
    settings: &RenderSettings,
) -> ScoreResult<String> {
    score_from_events(notes, annotations, measure_map, settings)?
        .render_lilypond()
}
