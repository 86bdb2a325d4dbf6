//! Building a single linear voice from grouped events.
//!
//! Voice is temporally contiguous: gaps are filled by rests, and
//! overlapping events are split, tied and merged to chords.
use std::collections::BTreeSet;

use log::debug;

use crate::{
    error::{ScoreError, ScoreResult},
    primitives::{
        fraction_tools::zero, Chord, Length, MeasureMap, Music, Position,
        Rest,
    },
};

use super::midi_parse::EventsMap;

/// Build voice music from events of one staff.
///
/// Notes, that are annotated with different voices are rejected, as only
/// one voice per staff is supported.
pub fn build_voice(
    events: EventsMap,
    measure_map: &dyn MeasureMap,
) -> ScoreResult<Vec<Music>> {
    check_single_voice(&events)?;
    let mut music = Vec::new();
    let mut last: Option<(Position, Length)> = None;
    for (position, mut notes) in events {
        if notes.is_empty() {
            continue;
        }
        match &last {
            None => music.extend(leading_rests(&position, measure_map)?),
            Some((last_pos, last_len)) => {
                let last_end = Length::from(last_pos.end_of(last_len));
                if position.get() > last_end.get() {
                    debug!("filling gap before {position}");
                    let gap = (Length::from(position.get()) - last_end)?;
                    music.push(Music::Rest(Rest::new(gap)));
                }
            }
        }

        let length = notes[0].length.clone();
        let mut event = match notes.len() {
            1 => Music::Note(notes.remove(0)),
            _ => {
                let chord = notes
                    .into_iter()
                    .fold(Chord::new(length.clone()), Chord::push_note);
                debug!("made chord at {position}: {} notes", chord.len());
                Music::Chord(chord)
            }
        };

        if let Some((last_pos, last_len)) = &last {
            // keys are strictly ascending, so the difference is positive
            let since_last =
                (Length::from(position.get()) - Length::from(last_pos.get()))?;
            if since_last < *last_len {
                debug!("{position} overlaps previous event, tie it");
                event = tie_previous(&mut music, since_last, event, &length)?;
            }
        }
        music.push(event);
        last = Some((position, length));
    }
    Ok(music)
}

fn check_single_voice(events: &EventsMap) -> ScoreResult<()> {
    let voices = events
        .values()
        .flatten()
        .filter_map(|note| note.voice)
        .collect::<BTreeSet<_>>();
    match voices.len() > 1 {
        true => Err(ScoreError::MultipleVoices {
            voices: voices.into_iter().collect(),
        }),
        false => Ok(()),
    }
}

/// Whole-measure rests for every measure before position, and rest
/// from the measure start to position.
fn leading_rests(
    position: &Position,
    measure_map: &dyn MeasureMap,
) -> ScoreResult<Vec<Music>> {
    let mut rests = (0..position.measure_index())
        .map(|idx| {
            let measure = measure_map.measure(idx)?;
            Ok(Music::Rest(Rest::whole_measure(measure.length())))
        })
        .collect::<ScoreResult<Vec<_>>>()?;
    if position.measure_position() > zero() {
        rests.push(Music::Rest(Rest::new(Length::from(
            position.measure_position(),
        ))));
    }
    Ok(rests)
}

/// Cut the last event of music to positive `head_length` with tie, and
/// merge its notes to the current event.
///
/// # Returns
/// Current event, with notes of the previous one. Pitches, that are
/// already in the current event are not doubled.
fn tie_previous(
    music: &mut Vec<Music>,
    head_length: Length,
    event: Music,
    length: &Length,
) -> ScoreResult<Music> {
    let previous = music.last_mut().ok_or_else(|| {
        ScoreError::InvariantViolation(
            "no previous event to tie with".to_string(),
        )
    })?;
    let prev_length = previous.length_mut().ok_or_else(|| {
        ScoreError::InvariantViolation(
            "previous event has no length".to_string(),
        )
    })?;
    *prev_length = head_length.tied();

    let carried = previous.notes().into_iter().map(|mut note| {
        note.length = length.clone();
        note
    });
    match event {
        Music::Chord(mut chord) => {
            for note in carried {
                if !chord.contains(&note) {
                    chord = chord.push_note(note);
                }
            }
            Ok(Music::Chord(chord))
        }
        Music::Note(note) => {
            let chord = carried
                .filter(|carried| carried.pitch != note.pitch)
                .fold(Chord::new(length.clone()), Chord::push_note);
            match chord.is_empty() {
                true => Ok(Music::Note(note)),
                false => Ok(Music::Chord(chord.push_note(note))),
            }
        }
        x => Err(ScoreError::InvariantViolation(format!(
            "only notes and chords can be tied to: {:?}",
            x
        ))),
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use crate::{
        dom::midi_parse::{parse_events, AnnotationEvent, NoteEvent},
        error::ScoreError,
        lilypond_render::RendersToLilypond,
        primitives::{Length, Music, Rest, TimeMap, TimeSignature},
    };

    use super::build_voice;

    fn time_map() -> TimeMap {
        TimeMap::uniform(TimeSignature::new(4, 4))
    }

    fn build(
        notes: &[NoteEvent],
        annotations: &[AnnotationEvent],
    ) -> Result<Vec<Music>, ScoreError> {
        let time_map = time_map();
        build_voice(parse_events(notes, annotations, &time_map)?, &time_map)
    }

    fn render(music: &[Music]) -> String {
        music
            .iter()
            .map(|ev| ev.render_lilypond().unwrap())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn total_length(music: &[Music]) -> Fraction {
        music
            .iter()
            .filter_map(Music::length)
            .fold(Fraction::new(0u64, 1u64), |acc, len| acc + len.get())
    }

    #[test]
    fn test_empty() {
        assert_eq!(build(&[], &[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_contiguous_notes() {
        let music = build(
            &[
                NoteEvent::new(60, 0.0, 1.0, 0),
                NoteEvent::new(62, 1.0, 3.0, 0),
                NoteEvent::new(64, 3.0, 4.0, 0),
                NoteEvent::new(65, 4.0, 8.0, 0),
            ],
            &[],
        )
        .unwrap();
        assert!(!music.iter().any(|ev| matches!(ev, Music::Rest(_))));
        assert_eq!(total_length(&music), Fraction::from(2.0));
        assert_eq!(render(&music), "c'4 d'2 e'4 f'1");
    }

    #[test]
    fn test_overlap() {
        let music = build(
            &[
                NoteEvent::new(60, 0.0, 2.0, 0),
                NoteEvent::new(64, 1.0, 2.0, 0),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(music.len(), 2);
        let first = music[0].length().unwrap();
        assert!(first.tie());
        assert_eq!(first, &Length::from(Fraction::new(1u64, 4u64)));
        assert!(matches!(&music[1], Music::Chord(chord) if chord.len() == 2));
        assert_eq!(render(&music), "c'4~ <c' e'>4");
    }

    #[test]
    fn test_overlap_same_pitch() {
        let music = build(
            &[
                NoteEvent::new(60, 0.0, 2.0, 0),
                NoteEvent::new(60, 1.0, 2.0, 0),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(render(&music), "c'4~ c'4");
    }

    #[test]
    fn test_overlap_into_chord() {
        let music = build(
            &[
                NoteEvent::new(55, 0.0, 3.0, 0),
                NoteEvent::new(60, 2.0, 4.0, 0),
                NoteEvent::new(64, 2.0, 4.0, 0),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(render(&music), "g2~ <c' e' g>2");
        assert_eq!(total_length(&music), Fraction::from(1.0));
    }

    #[test]
    fn test_leading_partial_rest() {
        let music = build(&[NoteEvent::new(60, 2.0, 3.0, 0)], &[]).unwrap();
        assert_eq!(
            music[0],
            Music::Rest(Rest::new(Length::from(Fraction::new(1u64, 2u64))))
        );
        assert_eq!(render(&music), "r2 c'4");
    }

    #[test]
    fn test_leading_whole_measure_rests() {
        let music = build(&[NoteEvent::new(60, 9.0, 10.0, 0)], &[]).unwrap();
        assert_eq!(render(&music), "R1 R1 r4 c'4");
        let music = build(&[NoteEvent::new(60, 4.0, 5.0, 0)], &[]).unwrap();
        assert_eq!(render(&music), "R1 c'4");
    }

    #[test]
    fn test_gap() {
        let music = build(
            &[
                NoteEvent::new(60, 0.0, 1.0, 0),
                NoteEvent::new(62, 2.5, 3.0, 0),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(render(&music), "c'4 r4. d'8");
        assert_eq!(total_length(&music), Fraction::new(3u64, 4u64));
    }

    #[test]
    fn test_chord_takes_first_length() {
        let music = build(
            &[
                NoteEvent::new(67, 0.0, 1.0, 0),
                NoteEvent::new(60, 0.0, 2.0, 0),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(render(&music), "<g' c'>4");
    }

    #[test]
    fn test_multiple_voices_rejected() {
        let result = build(
            &[
                NoteEvent::new(60, 0.0, 1.0, 0),
                NoteEvent::new(64, 0.0, 1.0, 0),
            ],
            &[
                AnnotationEvent::new("NOTE 0 60 voice 1", 0.0),
                AnnotationEvent::new("NOTE 0 64 voice 2", 0.0),
            ],
        );
        assert!(matches!(
            result,
            Err(ScoreError::MultipleVoices { voices }) if voices == vec![1, 2]
        ));
    }
}
