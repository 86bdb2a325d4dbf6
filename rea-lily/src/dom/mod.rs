//! Score tree: staves with their voices, built from host events.
use log::debug;

use crate::{
    error::{ScoreError, ScoreResult},
    lilypond_render::{RenderSettings, RendersToLilypond},
    primitives::{Clef, MeasureMap, Music},
};

pub mod midi_parse;
pub mod staff_split;
pub mod voice;

use midi_parse::{parse_events, AnnotationEvent, EventsMap, NoteEvent};
use staff_split::{split_by_staff, StaffSplit};
use voice::build_voice;

/// Lilypond context of a single staff.
const STAFF_KIND: &str = "Staff";
/// Lilypond context of a staff group.
const STAFF_GROUP_KIND: &str = "PianoStaff";

/// Single staff with one voice.
#[derive(Debug, PartialEq, Clone)]
pub struct Staff {
    pub clef: Clef,
    pub voice: Vec<Music>,
}
impl Staff {
    pub fn new(voice: Vec<Music>, clef: Clef) -> Self {
        Self { clef, voice }
    }
}
impl RendersToLilypond for Staff {
    fn render_lilypond(&self) -> ScoreResult<String> {
        let mut contents = vec![self.clef.render_lilypond()?];
        for event in self.voice.iter() {
            contents.push(event.render_lilypond()?);
        }
        Ok(format!("\\new {STAFF_KIND} {{{}}}", contents.join(" ")))
    }
}

/// Grand staff. The lowest staff is always in the lower clef.
#[derive(Debug, PartialEq, Clone)]
pub struct StaffGroup {
    staves: Vec<Staff>,
}
impl StaffGroup {
    pub fn new(staves: Vec<Staff>) -> ScoreResult<Self> {
        Self::with_lower_clef(staves, Clef::Bass)
    }
    pub fn with_lower_clef(
        mut staves: Vec<Staff>,
        clef: Clef,
    ) -> ScoreResult<Self> {
        if staves.len() < 2 {
            return Err(ScoreError::InvariantViolation(format!(
                "staff group needs at least 2 staves, got {}",
                staves.len()
            )));
        }
        if let Some(lowest) = staves.last_mut() {
            lowest.clef = clef;
        }
        Ok(Self { staves })
    }
    pub fn staves(&self) -> &Vec<Staff> {
        &self.staves
    }
}
impl RendersToLilypond for StaffGroup {
    fn render_lilypond(&self) -> ScoreResult<String> {
        let staves = self
            .staves
            .iter()
            .map(|staff| staff.render_lilypond())
            .collect::<ScoreResult<Vec<_>>>()?;
        Ok(format!(
            "\\new {STAFF_GROUP_KIND} <<\n{}\n>>\n",
            staves.join("\n")
        ))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Score {
    Single(Staff),
    Group(StaffGroup),
}
impl RendersToLilypond for Score {
    fn render_lilypond(&self) -> ScoreResult<String> {
        let music = match self {
            Self::Single(staff) => staff.render_lilypond()?,
            Self::Group(group) => group.render_lilypond()?,
        };
        Ok(format!("{{{music}}}"))
    }
}

/// Build the whole score from host events.
pub fn score_from_events(
    notes: &[NoteEvent],
    annotations: &[AnnotationEvent],
    measure_map: &dyn MeasureMap,
    settings: &RenderSettings,
) -> ScoreResult<Score> {
    let mut events = parse_events(notes, annotations, measure_map)?;
    apply_spelling(&mut events, settings);
    match split_by_staff(events, settings.split_note, settings.divided)? {
        StaffSplit::Single(events) => {
            let voice = build_voice(events, measure_map)?;
            Ok(Score::Single(Staff::new(voice, settings.upper_clef)))
        }
        StaffSplit::Divided(upper, lower) => {
            debug!("building grand staff");
            let staves = vec![
                Staff::new(build_voice(upper, measure_map)?, settings.upper_clef),
                Staff::new(build_voice(lower, measure_map)?, settings.upper_clef),
            ];
            Ok(Score::Group(StaffGroup::with_lower_clef(
                staves,
                settings.lower_clef,
            )?))
        }
    }
}

fn apply_spelling(events: &mut EventsMap, settings: &RenderSettings) {
    for note in events.values_mut().flatten() {
        note.pitch = note.pitch.with_spelling(settings.spelling);
    }
}
