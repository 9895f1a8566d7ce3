// Purely for testing: small songs that exercise looping, stopping and empty channels.

use super::orderlist::{OrderList, OrderListEntry, TRANSPOSITION_LOOP, TRANSPOSITION_NEUTRAL};
use super::song::Song;

pub fn entry(sequence_index: u8) -> OrderListEntry {
    OrderListEntry::new(TRANSPOSITION_NEUTRAL, sequence_index)
}

pub fn end() -> OrderListEntry {
    OrderListEntry::end(TRANSPOSITION_LOOP)
}

// Channel 0 plays sequences 0 and 1 (4 rows each) and loops on entry 1 without
// ever ending, channel 1 plays sequence 2 (8 rows) then ends, channel 2 is empty.
pub fn three_channel_song() -> Song {
    let mut song = Song::new(3);
    song.order_lists = vec![
        OrderList::new(vec![entry(0), entry(1)], 1),
        OrderList::new(vec![entry(2), end()], 0),
        OrderList::terminated(),
    ];
    song.set_sequence_length(0, 4);
    song.set_sequence_length(1, 4);
    song.set_sequence_length(2, 8);
    song
}

// Every channel ends; lengths are chosen so the channels never line up after row 0.
pub fn finite_song() -> Song {
    let mut song = Song::new(2);
    song.order_lists = vec![
        OrderList::new(vec![entry(0), entry(0), entry(0), end()], 0),
        OrderList::new(vec![entry(1), entry(1), end()], 0),
    ];
    song.set_sequence_length(0, 3);
    song.set_sequence_length(1, 5);
    song
}

// A single channel whose list is long enough to produce `rows` rows of `length` each.
pub fn long_song(rows: usize, length: usize) -> Song {
    let mut song = Song::new(1);
    let mut entries = vec![entry(0); rows];
    entries.push(end());
    song.order_lists = vec![OrderList::new(entries, 0)];
    song.set_sequence_length(0, length);
    song
}
