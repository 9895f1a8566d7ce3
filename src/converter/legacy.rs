//! Reader for the legacy 20.G4 player format: a fixed image loaded at $0f00
//! with a block of pointers to its tables, three order lists and a split
//! low/high vector of sequence addresses.

use crate::pipeline::orderlist::{OrderList, OrderListEntry, TRANSPOSITION_LOOP, TRANSPOSITION_NEUTRAL};
use crate::pipeline::sequence::{Event, Sequence, MAX_SEQUENCE_LENGTH, NO_COMMAND, NO_INSTRUMENT};

use super::driver::{DriverLayout, TableLayout};
use super::image::{read_load_address, ProgramImage};
use super::tables::{copy_split_table, copy_table, copy_table_transposed};
use super::{check_range, ConvertError};
use crate::memory::{MemoryGuard, MEMORY_SIZE};

pub const LOAD_ADDRESS: u16 = 0x0f00;
pub const VERSION_ADDRESS: u16 = 0x0fee;
pub const SIGNATURE: &[u8; 5] = b"20.G4";
pub const CHANNEL_COUNT: usize = 3;

const LEGACY_END: u8 = 0xff;
const SEQUENCE_END: u8 = 0x7f;
const FIRST_DRIVER_COMMAND: u8 = 0xc0;
const SEQUENCE_HEADER_SIZE: u16 = 2;

// pointer block
const POINTER_WAVE_TABLE: u16 = 0x0fbc;
const POINTER_FILTER_TABLE: u16 = 0x0fc0;
const POINTER_PULSE_TABLE: u16 = 0x0fc2;
const POINTER_INSTRUMENT_TABLE: u16 = 0x0fc4;
const POINTER_ORDER_LISTS: [u16; CHANNEL_COUNT] = [0x0fc6, 0x0fc8, 0x0fca];
const POINTER_SEQUENCE_VECTOR_LOW: u16 = 0x0fcc;
const POINTER_SEQUENCE_VECTOR_HIGH: u16 = 0x0fce;
const POINTER_COMMAND_TABLE: u16 = 0x0fd0;

/// Whether `prg` looks like something this reader understands. Anything else
/// is simply not ours to convert.
pub fn is_file_valid(prg: &[u8]) -> bool {
    if prg.len() >= MEMORY_SIZE || read_load_address(prg) != Some(LOAD_ADDRESS) {
        return false;
    }
    let start = 2 + (VERSION_ADDRESS - LOAD_ADDRESS) as usize;
    prg.get(start..start + SIGNATURE.len()) == Some(&SIGNATURE[..])
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegacyPointers {
    pub wave_table: u16,
    pub filter_table: u16,
    pub pulse_table: u16,
    pub instrument_table: u16,
    pub command_table: u16,
    pub order_lists: [u16; CHANNEL_COUNT],
    pub sequence_vector_low: u16,
    pub sequence_vector_high: u16,
}

impl LegacyPointers {
    pub fn read(image: &ProgramImage) -> Self {
        Self {
            wave_table: image.get_word(POINTER_WAVE_TABLE),
            filter_table: image.get_word(POINTER_FILTER_TABLE),
            pulse_table: image.get_word(POINTER_PULSE_TABLE),
            instrument_table: image.get_word(POINTER_INSTRUMENT_TABLE),
            command_table: image.get_word(POINTER_COMMAND_TABLE),
            order_lists: POINTER_ORDER_LISTS.map(|pointer| image.get_word(pointer)),
            sequence_vector_low: image.get_word(POINTER_SEQUENCE_VECTOR_LOW),
            sequence_vector_high: image.get_word(POINTER_SEQUENCE_VECTOR_HIGH),
        }
    }

    /// Order lists are stored back to back, so the gap between the first two
    /// bounds how many records any of them may hold.
    pub fn order_list_max_records(&self) -> usize {
        let max_bytes = self.order_lists[1].wrapping_sub(self.order_lists[0]) as usize;
        max_bytes.div_ceil(2)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedOrderList {
    pub order_list: OrderList,
    pub max_sequence_index: u8,
}

/// Reads `(transpose, sequence)` pairs from `address` until the $ff end record.
/// Fails if `max_records` pass without one.
pub fn import_order_list(
    image: &ProgramImage,
    address: u16,
    max_records: usize,
) -> Result<ImportedOrderList, ConvertError> {
    let mut entries = Vec::new();
    let mut max_sequence_index = 0u8;

    for record in 0..max_records {
        let read_address = address.wrapping_add((record * 2) as u16);
        let transpose = image.get_byte(read_address);
        let sequence_index = image.get_byte(read_address.wrapping_add(1));

        if transpose == LEGACY_END {
            entries.push(OrderListEntry::end(TRANSPOSITION_LOOP));
            return Ok(ImportedOrderList {
                order_list: OrderList::new(entries, 0),
                max_sequence_index,
            });
        }

        entries.push(OrderListEntry::new(
            TRANSPOSITION_NEUTRAL.wrapping_add(transpose),
            sequence_index,
        ));
        max_sequence_index = max_sequence_index.max(sequence_index);
    }

    Err(ConvertError::UnterminatedOrderList { address, max_records })
}

/// Reads `(command, note)` pairs until the $7f end byte or 128 rows.
pub fn import_sequence(image: &ProgramImage, address: u16) -> Sequence {
    let mut events = Vec::new();

    for row in 0..MAX_SEQUENCE_LENGTH {
        let read_address = address.wrapping_add((row * 2) as u16);
        let command = image.get_byte(read_address);
        if command == SEQUENCE_END {
            break;
        }
        let note = image.get_byte(read_address.wrapping_add(1));

        let event = if command >= FIRST_DRIVER_COMMAND {
            Event { instrument: NO_INSTRUMENT, command, note }
        } else {
            Event { instrument: command, command: NO_COMMAND, note }
        };
        events.push(event);
    }

    Sequence { events }
}

/// Imports sequences `0..=max_sequence_index` through the sequence vector.
pub fn import_sequences(image: &ProgramImage, pointers: &LegacyPointers, max_sequence_index: u8) -> Vec<Sequence> {
    (0..=max_sequence_index as u16)
        .map(|i| {
            let low = image.get_byte(pointers.sequence_vector_low.wrapping_add(i));
            let high = image.get_byte(pointers.sequence_vector_high.wrapping_add(i));
            let address = u16::from_le_bytes([low, high]);
            import_sequence(image, address.wrapping_add(SEQUENCE_HEADER_SIZE))
        })
        .collect()
}

/// Copies every table the target driver needs from `image` into `memory`.
pub fn import_tables(
    image: &ProgramImage,
    pointers: &LegacyPointers,
    layout: &DriverLayout,
    memory: &mut MemoryGuard<'_>,
) -> Result<(), ConvertError> {
    let plan = [
        ("Instruments", pointers.instrument_table, TableLayout::Transposed),
        ("Commands", pointers.command_table, TableLayout::Transposed),
        ("Wave", pointers.wave_table, TableLayout::Linear),
        ("Pulse", pointers.pulse_table, TableLayout::Linear),
        ("Filter", pointers.filter_table, TableLayout::Linear),
    ];

    // look everything up first so a missing table leaves memory untouched
    let tables = plan
        .iter()
        .map(|(name, source, default_layout)| {
            let table = layout.find_table(name)?;
            let table_layout = table.layout.unwrap_or(*default_layout);
            // a split table is two planes of row_count bytes, whatever the column count says
            let span = match table_layout {
                TableLayout::Split => table.row_count as usize * 2,
                _ => table.size(),
            };
            check_range(name, *source as usize, span)?;
            check_range(name, table.address as usize, span)?;
            Ok((table, *source as usize, table_layout))
        })
        .collect::<Result<Vec<_>, ConvertError>>()?;

    let source = image.memory();
    for (table, source_address, table_layout) in tables {
        let dest_address = table.address as usize;
        match table_layout {
            TableLayout::Linear => copy_table(source, source_address, &mut memory[..], dest_address, table.size()),
            TableLayout::Transposed => copy_table_transposed(
                source,
                source_address,
                &mut memory[..],
                dest_address,
                table.row_count as usize,
                table.column_count as usize,
            ),
            TableLayout::Split => copy_split_table(
                source,
                source_address,
                &mut memory[..],
                dest_address,
                table.row_count as usize,
            ),
        }
        tracing::debug!(table = %table.name, ?table_layout, "copied table");
    }
    Ok(())
}
