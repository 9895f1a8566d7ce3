//! Converts legacy 20.G4 songs into the target driver's memory layout and
//! into a `Song` the editor can work on.

mod driver;
mod image;
pub mod legacy;
pub mod music;
pub mod tables;

pub use driver::{DriverLayout, MusicDataLayout, TableDefinition, TableLayout};
pub use image::{read_load_address, ProgramImage};

use thiserror::Error;

use crate::memory::{EmulatedMemory, MEMORY_SIZE};
use crate::pipeline::Song;
use legacy::LegacyPointers;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("driver has no '{0}' table")]
    MissingTable(String),
    #[error("order list at ${address:04x} has no end marker within {max_records} records")]
    UnterminatedOrderList { address: u16, max_records: usize },
    #[error("{what} at ${address:04x} ({size} bytes) runs past the end of memory")]
    AddressOutOfRange { what: String, address: usize, size: usize },
    #[error("{what} is too large: {size} where the driver allows {capacity}")]
    MusicDataTooLarge { what: String, size: usize, capacity: usize },
}

pub(crate) fn check_range(what: &str, address: usize, size: usize) -> Result<(), ConvertError> {
    if address + size > MEMORY_SIZE {
        return Err(ConvertError::AddressOutOfRange { what: what.to_string(), address, size });
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct ConvertedSong {
    pub song: Song,
    /// The driver's memory from its top address to the end of the music data.
    pub image: ProgramImage,
}

/// Converts a legacy song. Returns `Ok(None)` when `prg` isn't a legacy song
/// at all; errors mean it is one but can't be converted. Nothing outside the
/// returned value is touched either way.
///
/// When `driver_image` is given it is loaded first and the tables and music
/// data are written over it, so the output is a complete driver with music.
pub fn convert(
    prg: &[u8],
    layout: &DriverLayout,
    driver_image: Option<&ProgramImage>,
) -> Result<Option<ConvertedSong>, ConvertError> {
    if !legacy::is_file_valid(prg) {
        return Ok(None);
    }
    let Some(input) = ProgramImage::from_prg(prg) else {
        return Ok(None);
    };
    tracing::info!("converting legacy song (${:04x}-${:04x})", input.top_address(), input.end_address());

    let top_address = layout.top_address as usize;
    let driver_end = layout.end_address as usize;
    if driver_end > MEMORY_SIZE || driver_end < top_address {
        return Err(ConvertError::AddressOutOfRange {
            what: "driver image".to_string(),
            address: top_address,
            size: driver_end.saturating_sub(top_address),
        });
    }

    let pointers = LegacyPointers::read(&input);
    let max_records = pointers.order_list_max_records();
    let mut song = Song::new(legacy::CHANNEL_COUNT);
    let mut max_sequence_index = 0u8;
    for (channel, address) in pointers.order_lists.iter().enumerate() {
        let imported = legacy::import_order_list(&input, *address, max_records)?;
        max_sequence_index = max_sequence_index.max(imported.max_sequence_index);
        song.order_lists[channel] = imported.order_list;
    }
    tracing::info!(channels = legacy::CHANNEL_COUNT, max_sequence_index, "order lists imported");

    song.sequences = legacy::import_sequences(&input, &pointers, max_sequence_index);
    tracing::info!(sequences = song.sequences.len(), "sequences imported");

    let memory = EmulatedMemory::new();
    let image = {
        let mut guard = memory.lock();
        guard.clear();
        if let Some(driver) = driver_image {
            guard.set_data(driver.top_address(), driver.data());
        }
        legacy::import_tables(&input, &pointers, layout, &mut guard)?;
        tracing::info!("tables copied");
        let music_end = music::write_music_data(&song, &layout.music_data, &mut guard)?;
        tracing::info!("music data ends at ${:04x}", music_end);

        let end = driver_end.max(music_end);
        ProgramImage::from_data(layout.top_address, &guard.get_data(layout.top_address, end - top_address))
    };

    Ok(Some(ConvertedSong { song, image }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_input_is_not_an_error() {
        let layout = DriverLayout::default();
        assert!(convert(&[], &layout, None).unwrap().is_none());
        assert!(convert(&[0x01, 0x08, 0x00], &layout, None).unwrap().is_none());
    }

    #[test]
    fn errors_name_what_went_wrong() {
        assert_eq!(
            ConvertError::UnterminatedOrderList { address: 0x1234, max_records: 64 }.to_string(),
            "order list at $1234 has no end marker within 64 records"
        );
        assert_eq!(ConvertError::MissingTable("Pulse".into()).to_string(), "driver has no 'Pulse' table");
    }
}
