use serde::{Deserialize, Serialize};

use crate::{
    error::ScoreResult,
    primitives::{Clef, Spelling},
};

/// Version, written to the header of the whole lilypond document.
pub const LILYPOND_VERSION: &str = "2.24";

/// How events are distributed by staves and spelled.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Notes without explicit staff, that are lower go to the lower staff.
    pub split_note: u8,
    /// Make grand staff even if no note asked for it explicitly.
    pub divided: bool,
    /// Spelling of notes without `accidental` annotation.
    pub spelling: Spelling,
    pub upper_clef: Clef,
    pub lower_clef: Clef,
}
impl RenderSettings {
    pub fn new(split_note: u8, divided: bool, spelling: Spelling) -> Self {
        Self {
            split_note,
            divided,
            spelling,
            ..Default::default()
        }
    }
    /// Parse settings from toml string. Missing keys are defaulted.
    pub fn from_toml(string: &str) -> ScoreResult<Self> {
        Ok(toml::from_str(string)?)
    }
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            split_note: 60,
            divided: false,
            spelling: Spelling::Sharps,
            upper_clef: Clef::Treble,
            lower_clef: Clef::Bass,
        }
    }
}

pub trait RendersToLilypond {
    fn render_lilypond(&self) -> ScoreResult<String>;
}

/// Wrap rendered score to the file, that can be fed to lilypond.
pub fn lilypond_document(score: impl Into<String>) -> String {
    let score = score.into();
    format!("\\version \"{LILYPOND_VERSION}\"\n{score}\n")
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ScoreError,
        primitives::{Clef, Spelling},
    };

    use super::{lilypond_document, RenderSettings};

    #[test]
    fn settings_from_toml() {
        let settings = RenderSettings::from_toml(
            r#"
            split_note = 55
            spelling = "flats"
            lower_clef = "tenor"
            "#,
        )
        .unwrap();
        assert_eq!(settings.split_note, 55);
        assert_eq!(settings.spelling, Spelling::Flats);
        assert_eq!(settings.lower_clef, Clef::Tenor);
        assert_eq!(settings.upper_clef, Clef::Treble);
        assert!(!settings.divided);
    }

    #[test]
    fn settings_defaults_round_trip() {
        let defaults = RenderSettings::default();
        assert_eq!(RenderSettings::from_toml("").unwrap(), defaults);
        let string = toml::to_string(&defaults).unwrap();
        assert_eq!(RenderSettings::from_toml(&string).unwrap(), defaults);
        assert_eq!(
            RenderSettings::new(48, true, Spelling::Flats),
            RenderSettings {
                split_note: 48,
                divided: true,
                spelling: Spelling::Flats,
                ..Default::default()
            }
        );
    }

    #[test]
    fn settings_broken() {
        assert!(matches!(
            RenderSettings::from_toml("split_note = \"c\""),
            Err(ScoreError::Settings(_))
        ));
    }

    #[test]
    fn document() {
        assert_eq!(
            lilypond_document("{\\new Staff {\\clef treble c'1}}"),
            "\\version \"2.24\"\n{\\new Staff {\\clef treble c'1}}\n"
        );
    }
}
