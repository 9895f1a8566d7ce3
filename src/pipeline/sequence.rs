use serde::{Deserialize, Serialize};

// Instrument slot value for "keep the current instrument".
pub const NO_INSTRUMENT: u8 = 0x80;
// Command slot value for "no command on this row".
pub const NO_COMMAND: u8 = 0x80;
pub const MAX_SEQUENCE_LENGTH: usize = 0x80;

// A single row of a sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub instrument: u8,
    pub command: u8,
    pub note: u8,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            instrument: NO_INSTRUMENT,
            command: NO_COMMAND,
            note: 0,
        }
    }
}

// A sequence is what an order list entry points at; its length is the number
// of rows it occupies on the timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub events: Vec<Event>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // Grows with empty rows or truncates. Returns whether the length changed.
    pub fn set_len(&mut self, length: usize) -> bool {
        let length = length.min(MAX_SEQUENCE_LENGTH);
        if length == self.events.len() {
            return false;
        }
        self.events.resize(length, Event::default());
        true
    }
}
