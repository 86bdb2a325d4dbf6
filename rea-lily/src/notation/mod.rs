//! Free-text notations, attached to notes by the host.
//!
//! Base notation strings should look like:
//! `"NOTE 0 60 voice 1 staff 2 articulation staccato"`
//! which is parsed as note annotation on channel 0, pitch 60, with
//! `voice` and `staff` known fields and one residual token
//! `"articulation staccato"`.
use thiserror;

pub mod message;

pub use message::{Annotation, AnnotationFields};

#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("No tokens found! Original string: `{0}`")]
    NoTokens(String),
    #[error("Not enough tokens found! Expected: {0}, found: {1}")]
    NotEnoughTokens(u16, u16),
    #[error("Unexpected Token: {0}")]
    UnexpectedToken(String),
}
pub type NotationResult<T> = Result<T, NotationError>;

/// Header of note notation message.
const NOTE_SECTION: &'static str = "NOTE";

/// Known keys of `key value` pairs.
const VOICE: &'static str = "voice";
const STAFF: &'static str = "staff";
const ACCIDENTAL: &'static str = "accidental";

/// Try to get token from vec, and return [NotationError] at fail.
fn get_token<'a>(
    v: &'a Vec<&str>,
    idx: usize,
) -> Result<&'a str, NotationError> {
    let s = v
        .get(idx)
        .ok_or(NotationError::NotEnoughTokens(idx as u16 + 1, v.len() as u16))?;
    Ok(*s)
}

/// Split notation string by whitespaces.
pub fn notation_tokens(notation_string: &str) -> NotationResult<Vec<&str>> {
    let tokens = notation_string.split_whitespace().collect::<Vec<_>>();
    match tokens.is_empty() {
        true => Err(NotationError::NoTokens(notation_string.to_string())),
        false => Ok(tokens),
    }
}
