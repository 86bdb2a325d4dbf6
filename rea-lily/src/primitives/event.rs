//! A smallest pieces of music, that voice consists of.
use serde::{Deserialize, Serialize};

use crate::{error::ScoreResult, lilypond_render::RendersToLilypond};

use super::{Length, Pitch, Position, Spelling};

/// Single sounding pitch with all information, gathered from the host
/// and annotations.
#[derive(Debug, PartialEq, Clone)]
pub struct Note {
    pub pitch: Pitch,
    pub position: Position,
    pub length: Length,
    pub channel: u8,
    /// 1-based, if explicitly assigned.
    pub staff: Option<u32>,
    /// 1-based, if explicitly assigned.
    pub voice: Option<u32>,
    pub accidental: Option<String>,
    /// Annotation tokens, unknown to the engine.
    pub notation: Vec<String>,
}
impl Note {
    pub fn new(pitch: Pitch, position: Position, length: Length) -> Self {
        Self {
            pitch,
            position,
            length,
            channel: 0,
            staff: None,
            voice: None,
            accidental: None,
            notation: Vec::new(),
        }
    }
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Pitch, spelled by the accidental annotation, if it is known.
    pub fn spelled_pitch(&self) -> Pitch {
        match self
            .accidental
            .as_deref()
            .and_then(Spelling::from_accidental)
        {
            Some(spelling) => self.pitch.with_spelling(spelling),
            None => self.pitch,
        }
    }
}
impl RendersToLilypond for Note {
    fn render_lilypond(&self) -> ScoreResult<String> {
        Ok(format!(
            "{}{}",
            self.spelled_pitch().render_lilypond()?,
            self.length.render_lilypond()?
        ))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Rest {
    pub length: Length,
    /// Rendered as `R`: rest, that fills the whole measure.
    pub whole_measure: bool,
}
impl Rest {
    pub fn new(length: Length) -> Self {
        Self {
            length,
            whole_measure: false,
        }
    }
    pub fn whole_measure(length: Length) -> Self {
        Self {
            length,
            whole_measure: true,
        }
    }
    fn marker(&self) -> &'static str {
        match self.whole_measure {
            true => "R",
            false => "r",
        }
    }
}
impl RendersToLilypond for Rest {
    /// Rests are not sustained, so tied parts are separate rests.
    fn render_lilypond(&self) -> ScoreResult<String> {
        Ok(self
            .length
            .render_parts()?
            .iter()
            .map(|part| format!("{}{}", self.marker(), part))
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Notes, sounding together for the same length.
///
/// Notes are kept in order of insertion.
#[derive(Debug, PartialEq, Clone)]
pub struct Chord {
    pub length: Length,
    notes: Vec<Note>,
}
impl Chord {
    pub fn new(length: Length) -> Self {
        Self {
            length,
            notes: Vec::new(),
        }
    }
    pub fn notes(&self) -> &Vec<Note> {
        &self.notes
    }
    pub fn len(&self) -> usize {
        self.notes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
    pub fn contains(&self, note: &Note) -> bool {
        self.notes.iter().any(|nt| nt.pitch == note.pitch)
    }
    pub fn push_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }
}
impl RendersToLilypond for Chord {
    fn render_lilypond(&self) -> ScoreResult<String> {
        let pitches = self
            .notes
            .iter()
            .map(|note| note.spelled_pitch().render_lilypond())
            .collect::<ScoreResult<Vec<_>>>()?;
        Ok(format!(
            "<{}>{}",
            pitches.join(" "),
            self.length.render_lilypond()?
        ))
    }
}

#[derive(
    Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    #[default]
    Treble,
    Bass,
    Alto,
    Tenor,
}
impl RendersToLilypond for Clef {
    fn render_lilypond(&self) -> ScoreResult<String> {
        let name = match self {
            Self::Treble => "treble",
            Self::Bass => "bass",
            Self::Alto => "alto",
            Self::Tenor => "tenor",
        };
        Ok(format!("\\clef {name}"))
    }
}

/// Everything, that voice can hold.
#[derive(Debug, PartialEq, Clone)]
pub enum Music {
    Note(Note),
    Rest(Rest),
    Chord(Chord),
    Clef(Clef),
}
impl Music {
    /// Length in time. Clef takes no time.
    pub fn length(&self) -> Option<&Length> {
        match self {
            Self::Note(note) => Some(&note.length),
            Self::Rest(rest) => Some(&rest.length),
            Self::Chord(chord) => Some(&chord.length),
            Self::Clef(_) => None,
        }
    }
    pub fn length_mut(&mut self) -> Option<&mut Length> {
        match self {
            Self::Note(note) => Some(&mut note.length),
            Self::Rest(rest) => Some(&mut rest.length),
            Self::Chord(chord) => Some(&mut chord.length),
            Self::Clef(_) => None,
        }
    }
    /// Sounding notes of event.
    pub fn notes(&self) -> Vec<Note> {
        match self {
            Self::Note(note) => vec![note.clone()],
            Self::Chord(chord) => chord.notes.clone(),
            Self::Rest(_) | Self::Clef(_) => Vec::new(),
        }
    }
}
impl RendersToLilypond for Music {
    fn render_lilypond(&self) -> ScoreResult<String> {
        match self {
            Self::Note(note) => note.render_lilypond(),
            Self::Rest(rest) => rest.render_lilypond(),
            Self::Chord(chord) => chord.render_lilypond(),
            Self::Clef(clef) => clef.render_lilypond(),
        }
    }
}
