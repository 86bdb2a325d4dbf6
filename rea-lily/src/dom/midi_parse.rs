use std::collections::BTreeMap;

use log::debug;

use crate::{
    error::{ScoreError, ScoreResult},
    notation::Annotation,
    primitives::{Length, MeasureMap, Note, Pitch, Position},
};

/// Notes, grouped by their start, in ascending order.
pub type EventsMap = BTreeMap<Position, Vec<Note>>;

/// Note, as host sees it. Positions are in quarter notes.
#[derive(Debug, PartialEq, Clone)]
pub struct NoteEvent {
    pub pitch: u8,
    pub start: f64,
    pub end: f64,
    pub channel: u8,
}
impl NoteEvent {
    pub fn new(pitch: u8, start: f64, end: f64, channel: u8) -> Self {
        Self {
            pitch,
            start,
            end,
            channel,
        }
    }
}

/// Text event, as host sees it. Position is in quarter notes.
#[derive(Debug, PartialEq, Clone)]
pub struct AnnotationEvent {
    pub text: String,
    pub position: f64,
}
impl AnnotationEvent {
    pub fn new(text: impl Into<String>, position: f64) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// Resolve host note against measure map.
pub fn parse_note(
    event: &NoteEvent,
    measure_map: &dyn MeasureMap,
) -> ScoreResult<Note> {
    let position = Position::from_quarters(event.start, measure_map)?;
    let end = Position::from_quarters(event.end, measure_map)?;
    let length = (Length::from(end.get()) - Length::from(position.get()))
        .map_err(|_| {
            ScoreError::InvariantViolation(format!(
                "note {} at {} has no length: ends at {}",
                event.pitch, position, end
            ))
        })?;
    Ok(Note::new(Pitch::from_midi(event.pitch), position, length)
        .with_channel(event.channel))
}

/// Parse note annotations, skipping other text events.
pub fn parse_annotations(
    events: &[AnnotationEvent],
    measure_map: &dyn MeasureMap,
) -> ScoreResult<Vec<Annotation>> {
    let mut annotations = Vec::new();
    for event in events {
        let position = Position::from_quarters(event.position, measure_map)?;
        if let Some(annotation) = Annotation::parse(&event.text, position)? {
            annotations.push(annotation);
        }
    }
    Ok(annotations)
}

/// Group notes by position and apply annotations to them.
///
/// Only the first matching annotation is applied to a note.
/// Annotations without notes are dropped.
pub fn group_events(notes: Vec<Note>, annotations: &[Annotation]) -> EventsMap {
    let mut events = EventsMap::new();
    let mut used = vec![false; annotations.len()];
    for mut note in notes {
        if let Some(idx) = annotations.iter().position(|ann| ann.matches(&note))
        {
            annotations[idx].apply(&mut note);
            used[idx] = true;
        }
        events.entry(note.position.clone()).or_default().push(note);
    }
    for (annotation, _) in annotations
        .iter()
        .zip(used)
        .filter(|(_, used)| !used)
    {
        debug!(
            "annotation has no note: pitch {} at {}",
            annotation.pitch.midi(),
            annotation.position
        );
    }
    events
}

/// Whole ingest: notes, annotations and grouping.
pub fn parse_events(
    notes: &[NoteEvent],
    annotations: &[AnnotationEvent],
    measure_map: &dyn MeasureMap,
) -> ScoreResult<EventsMap> {
    let parsed_notes = notes
        .iter()
        .map(|event| parse_note(event, measure_map))
        .collect::<ScoreResult<Vec<_>>>()?;
    let annotations = parse_annotations(annotations, measure_map)?;
    let events = group_events(parsed_notes, &annotations);
    debug!(
        "grouped {} notes at {} positions",
        notes.len(),
        events.len()
    );
    Ok(events)
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use crate::{
        error::ScoreError,
        primitives::{Length, Pitch, TimeMap, TimeSignature},
    };

    use super::{parse_events, AnnotationEvent, NoteEvent};

    fn time_map() -> TimeMap {
        TimeMap::uniform(TimeSignature::new(4, 4))
    }

    #[test]
    fn test_grouping() {
        let notes = vec![
            NoteEvent::new(64, 1.0, 2.0, 0),
            NoteEvent::new(60, 0.0, 1.0, 0),
            NoteEvent::new(67, 1.0, 2.0, 0),
            NoteEvent::new(62, 1.0, 3.0, 0),
        ];
        let events = parse_events(&notes, &[], &time_map()).unwrap();
        assert_eq!(events.len(), 2);
        let (first, second) = {
            let mut it = events.values();
            (it.next().unwrap(), it.next().unwrap())
        };
        assert_eq!(first[0].pitch, Pitch::from_midi(60));
        assert_eq!(
            second.iter().map(|n| n.pitch.midi()).collect::<Vec<_>>(),
            vec![64, 67, 62]
        );
        assert_eq!(second[2].length, Length::from(Fraction::new(1u64, 2u64)));
    }

    #[test]
    fn test_annotations_applied() {
        let notes = vec![
            NoteEvent::new(60, 0.0, 1.0, 0),
            NoteEvent::new(60, 1.0, 2.0, 0),
        ];
        let annotations = vec![
            AnnotationEvent::new("NOTE 0 60 staff 2 text first", 1.0),
            AnnotationEvent::new("NOTE 0 60 staff 1 text second", 1.0),
            AnnotationEvent::new("NOTE 0 61 staff 1", 0.0),
            AnnotationEvent::new("TRAC something", 0.0),
        ];
        let events =
            parse_events(&notes, &annotations, &time_map()).unwrap();
        let notes = events.values().flatten().collect::<Vec<_>>();
        assert_eq!(notes[0].staff, None);
        assert_eq!(notes[1].staff, Some(2));
        assert_eq!(notes[1].notation, vec!["text first".to_string()]);
    }

    #[test]
    fn test_zero_length_note() {
        let notes = vec![NoteEvent::new(60, 1.0, 1.000001, 0)];
        assert!(matches!(
            parse_events(&notes, &[], &time_map()),
            Err(ScoreError::InvariantViolation(_))
        ));
    }
}
