use log::{debug, warn};

use crate::primitives::{Note, Pitch, Position};

use super::{
    get_token, notation_tokens, NotationError, NotationResult, ACCIDENTAL,
    NOTE_SECTION, STAFF, VOICE,
};

/// Fields of annotation, the engine knows about.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct AnnotationFields {
    pub voice: Option<u32>,
    pub staff: Option<u32>,
    pub accidental: Option<String>,
}

/// Parsed note notation message.
#[derive(Debug, PartialEq, Clone)]
pub struct Annotation {
    pub channel: u8,
    pub pitch: Pitch,
    pub position: Position,
    pub fields: AnnotationFields,
    /// `key value` pairs, unknown to the engine, in original order.
    pub residual: Vec<String>,
}
impl Annotation {
    /// Parse notation message.
    ///
    /// # Returns
    /// - None, if message is not a note notation (e.g. track notation).
    /// - Err, if note header is broken.
    pub fn parse(
        message: &str,
        position: Position,
    ) -> NotationResult<Option<Self>> {
        let tokens = notation_tokens(message)?;
        if tokens[0] != NOTE_SECTION {
            debug!("skipping not a note notation: {message}");
            return Ok(None);
        }
        let channel = parse_header_value(&tokens, 1)?;
        let pitch = parse_header_value(&tokens, 2)?;
        let (fields, residual) = parse_pairs(&tokens[3..]);
        Ok(Some(Self {
            channel,
            pitch: Pitch::from_midi(pitch),
            position,
            fields,
            residual,
        }))
    }

    /// True if annotation is attached to the note.
    pub fn matches(&self, note: &Note) -> bool {
        self.position == note.position && self.pitch == note.pitch
    }

    /// Overwrite known fields of note and store residual tokens.
    pub fn apply(&self, note: &mut Note) {
        note.notation = self.residual.clone();
        if let Some(voice) = self.fields.voice {
            note.voice = Some(voice);
        }
        if let Some(staff) = self.fields.staff {
            note.staff = Some(staff);
        }
        if let Some(accidental) = &self.fields.accidental {
            note.accidental = Some(accidental.clone());
        }
    }
}

fn parse_header_value(tokens: &Vec<&str>, idx: usize) -> NotationResult<u8> {
    let token = get_token(tokens, idx)?;
    token
        .parse()
        .map_err(|_| NotationError::UnexpectedToken(token.to_string()))
}

/// Split `key value` pairs to known fields and residual tokens.
///
/// Known key with broken value is kept as residual.
fn parse_pairs(tokens: &[&str]) -> (AnnotationFields, Vec<String>) {
    let mut fields = AnnotationFields::default();
    let mut residual = Vec::new();
    for pair in tokens.chunks(2) {
        let (key, value) = match pair {
            [key, value] => (*key, *value),
            _ => {
                residual.push(pair.join(" "));
                continue;
            }
        };
        let known = match key {
            VOICE => value.parse().map(|v| fields.voice = Some(v)).is_ok(),
            STAFF => value.parse().map(|v| fields.staff = Some(v)).is_ok(),
            ACCIDENTAL => {
                fields.accidental = Some(value.to_string());
                true
            }
            _ => false,
        };
        if !known {
            if [VOICE, STAFF].contains(&key) {
                warn!("can not parse value of `{key}`: `{value}`");
            }
            residual.push(format!("{key} {value}"));
        }
    }
    (fields, residual)
}
