use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::{error::ScoreResult, lilypond_render::RendersToLilypond};

const SHARPS: [&str; 12] = [
    "c", "cis", "d", "dis", "e", "f", "fis", "g", "gis", "a", "ais", "b",
];
// "es" and "as", not "ees" and "aes"
const FLATS: [&str; 12] = [
    "c", "des", "d", "es", "e", "f", "ges", "g", "as", "a", "bes", "b",
];
/// MIDI octave of the lilypond octave without marks (c = 48).
const REFERENCE_OCTAVE: i32 = 4;

/// Which accidental black keys are spelled with.
#[derive(
    Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharps,
    Flats,
}
impl Spelling {
    /// Parse accidental, given by user in annotation.
    pub fn from_accidental(accidental: &str) -> Option<Self> {
        match accidental.to_lowercase().as_str() {
            "sharp" | "sharps" | "#" | "is" => Some(Self::Sharps),
            "flat" | "flats" | "b" | "es" => Some(Self::Flats),
            _ => None,
        }
    }
}

/// Chromatic pitch. Spelling doesn't matter for equality.
#[derive(Debug, Clone, Copy, Derivative)]
#[derivative(PartialEq, Eq, Hash)]
pub struct Pitch {
    midi: u8,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    spelling: Spelling,
}
impl Pitch {
    pub fn from_midi(midi: u8) -> Self {
        Self {
            midi,
            spelling: Spelling::default(),
        }
    }
    pub fn with_spelling(mut self, spelling: Spelling) -> Self {
        self.spelling = spelling;
        self
    }
    pub fn midi(&self) -> u8 {
        self.midi
    }
    pub fn spelling(&self) -> Spelling {
        self.spelling
    }
    /// Note name with accidental, e.g. "cis" or "bes".
    pub fn name(&self) -> &'static str {
        let degree = (self.midi % 12) as usize;
        match self.spelling {
            Spelling::Sharps => SHARPS[degree],
            Spelling::Flats => FLATS[degree],
        }
    }
    /// Octave marks, relative to the small octave.
    pub fn octave_marks(&self) -> String {
        let octave = self.midi as i32 / 12 - REFERENCE_OCTAVE;
        match octave {
            0 => String::new(),
            x if x > 0 => "'".repeat(x as usize),
            x => ",".repeat(-x as usize),
        }
    }
}
impl RendersToLilypond for Pitch {
    fn render_lilypond(&self) -> ScoreResult<String> {
        Ok(format!("{}{}", self.name(), self.octave_marks()))
    }
}
