use log::debug;

use crate::error::{ScoreError, ScoreResult};

use super::midi_parse::EventsMap;

/// Result of splitting events by staves.
#[derive(Debug, PartialEq)]
pub enum StaffSplit {
    /// Nothing asked for division: events are untouched.
    Single(EventsMap),
    /// upper and lower staves.
    Divided(EventsMap, EventsMap),
}

/// Split events to two staves.
///
/// Note with explicit staff goes to it. Others go to the upper staff if
/// their pitch is not lower than `split_note`, or to the lower one.
///
/// If `divided` is false and no note has explicit staff, events are
/// returned back as a single staff.
pub fn split_by_staff(
    events: EventsMap,
    split_note: u8,
    divided: bool,
) -> ScoreResult<StaffSplit> {
    let mut divided = divided;
    let mut staves = (EventsMap::new(), EventsMap::new());
    for (position, notes) in events.iter() {
        for note in notes {
            let idx = match note.staff {
                Some(staff @ 1..=2) => {
                    divided = true;
                    staff - 1
                }
                Some(0) | None => match note.pitch.midi() >= split_note {
                    true => 0,
                    false => 1,
                },
                Some(staff) => return Err(ScoreError::StaffOutOfRange(staff)),
            };
            let staff = match idx {
                0 => &mut staves.0,
                _ => &mut staves.1,
            };
            staff
                .entry(position.clone())
                .or_default()
                .push(note.clone());
        }
    }
    if !divided {
        return Ok(StaffSplit::Single(events));
    }
    debug!(
        "split by staves: {} and {} positions",
        staves.0.len(),
        staves.1.len()
    );
    Ok(StaffSplit::Divided(staves.0, staves.1))
}
