// the song document: one order list per channel plus the sequences they reference
use serde::{Deserialize, Serialize};

use crate::overview::SequenceLengths;
use super::orderlist::{OrderList, OrderListEntry};
use super::sequence::Sequence;

pub const DEFAULT_CHANNEL_COUNT: usize = 3;
pub const MAX_SEQUENCES: usize = 0x80;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub order_lists: Vec<OrderList>, // one per channel, fixed for the document
    pub sequences: Vec<Sequence>,
}

impl Default for Song {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_COUNT)
    }
}

impl Song {
    pub fn new(channel_count: usize) -> Self {
        Self {
            order_lists: (0..channel_count).map(|_| OrderList::terminated()).collect(),
            sequences: Vec::new(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.order_lists.len()
    }

    // -- edits; each returns whether the structure the overview depends on changed --

    pub fn set_order_entry(&mut self, channel: usize, index: usize, entry: OrderListEntry) -> bool {
        match self.order_lists.get_mut(channel) {
            Some(list) => list.set(index, entry),
            None => false,
        }
    }

    pub fn set_loop_index(&mut self, channel: usize, loop_index: usize) -> bool {
        match self.order_lists.get_mut(channel) {
            Some(list) => list.set_loop_index(loop_index),
            None => false,
        }
    }

    pub fn set_sequence_length(&mut self, index: u8, length: usize) -> bool {
        let index = index as usize;
        if index >= MAX_SEQUENCES {
            return false;
        }
        if index >= self.sequences.len() {
            self.sequences.resize_with(index + 1, Sequence::default);
        }
        self.sequences[index].set_len(length)
    }
}

impl SequenceLengths for Song {
    fn sequence_length(&self, index: u8) -> usize {
        self.sequences.get(index as usize).map(Sequence::len).unwrap_or(0)
    }
}
