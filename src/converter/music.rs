//! Packs an imported song into the driver's music data area.
//!
//! Order lists: `$80 | transposition` whenever the transposition changes (and
//! always on the loop entry), then the sequence index. The end marker is
//! followed by the byte offset of the loop entry within the packed list.
//!
//! Sequences: per row an optional command (`$c0`-`$ff`), an optional
//! instrument (`$a0`-`$bf`) and the note. `$7f` ends the sequence.

use crate::memory::MemoryGuard;
use crate::pipeline::orderlist::{OrderList, TRANSPOSITION_LOOP};
use crate::pipeline::sequence::{Sequence, NO_COMMAND, NO_INSTRUMENT};
use crate::pipeline::song::{Song, MAX_SEQUENCES};

use super::driver::MusicDataLayout;
use super::{check_range, ConvertError};

pub const PACKED_TRANSPOSITION: u8 = 0x80;
pub const PACKED_INSTRUMENT: u8 = 0xa0;
pub const PACKED_COMMAND: u8 = 0xc0;
pub const PACKED_SEQUENCE_END: u8 = 0x7f;

// the loop offset is a single byte
const MAX_PACKED_ORDER_LIST: usize = 0x100;

pub fn pack_order_list(list: &OrderList) -> Result<Vec<u8>, ConvertError> {
    let mut packed = Vec::new();
    let mut transposition = None;
    let mut loop_offset = 0;
    let mut end = TRANSPOSITION_LOOP;

    for (index, entry) in list.entries().iter().enumerate() {
        if entry.is_end() {
            end = entry.transposition;
            break;
        }
        if index == list.loop_index() {
            loop_offset = packed.len();
            transposition = None;
        }
        if transposition != Some(entry.transposition) {
            packed.push(PACKED_TRANSPOSITION | (entry.transposition & 0x3f));
            transposition = Some(entry.transposition);
        }
        packed.push(entry.sequence_index & 0x7f);
    }
    packed.push(end);
    packed.push(loop_offset as u8);

    if packed.len() > MAX_PACKED_ORDER_LIST {
        return Err(ConvertError::MusicDataTooLarge {
            what: "order list".to_string(),
            size: packed.len(),
            capacity: MAX_PACKED_ORDER_LIST,
        });
    }
    Ok(packed)
}

pub fn pack_sequence(sequence: &Sequence) -> Vec<u8> {
    let mut packed = Vec::with_capacity(sequence.len() * 2 + 1);
    for event in &sequence.events {
        if event.command != NO_COMMAND {
            packed.push(PACKED_COMMAND | (event.command & 0x3f));
        }
        if event.instrument != NO_INSTRUMENT {
            packed.push(PACKED_INSTRUMENT | (event.instrument & 0x1f));
        }
        // $7f would end the sequence early
        packed.push((event.note & 0x7f).min(PACKED_SEQUENCE_END - 1));
    }
    packed.push(PACKED_SEQUENCE_END);
    packed
}

fn write_pointer(memory: &mut [u8], vector: usize, stride: usize, index: usize, address: usize) {
    memory[vector + index] = address as u8;
    memory[vector + stride + index] = (address >> 8) as u8;
}

/// Writes every order list and sequence of `song` into `memory`, with their
/// pointer vectors. All ranges are checked before the first write. Returns the
/// address just past the last byte of music data.
pub fn write_music_data(
    song: &Song,
    layout: &MusicDataLayout,
    memory: &mut MemoryGuard<'_>,
) -> Result<usize, ConvertError> {
    let channels = song.channel_count();
    let order_lists = song
        .order_lists
        .iter()
        .map(pack_order_list)
        .collect::<Result<Vec<_>, ConvertError>>()?;
    if song.sequences.len() > MAX_SEQUENCES {
        return Err(ConvertError::MusicDataTooLarge {
            what: "sequence count".to_string(),
            size: song.sequences.len(),
            capacity: MAX_SEQUENCES,
        });
    }
    let sequences: Vec<Vec<u8>> = song.sequences.iter().map(pack_sequence).collect();

    let data_size = order_lists.iter().chain(&sequences).map(Vec::len).sum();
    check_range("order list pointers", layout.order_list_pointers as usize, channels * 2)?;
    check_range("sequence pointers", layout.sequence_pointers as usize, MAX_SEQUENCES * 2)?;
    check_range("music data", layout.data_address as usize, data_size)?;

    let mut address = layout.data_address as usize;
    for (channel, packed) in order_lists.iter().enumerate() {
        write_pointer(&mut memory[..], layout.order_list_pointers as usize, channels, channel, address);
        memory[address..address + packed.len()].copy_from_slice(packed);
        address += packed.len();
    }
    for (index, packed) in sequences.iter().enumerate() {
        write_pointer(&mut memory[..], layout.sequence_pointers as usize, MAX_SEQUENCES, index, address);
        memory[address..address + packed.len()].copy_from_slice(packed);
        address += packed.len();
    }
    tracing::debug!(order_lists = channels, sequences = sequences.len(), end = address, "music data written");
    Ok(address)
}
