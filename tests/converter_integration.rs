use chipseq::converter::{convert, ConvertError, DriverLayout, ProgramImage, TableDefinition, TableLayout};
use chipseq::middle::Middle;
use chipseq::overview::ChannelSlot;
use chipseq::pipeline::{persistence, Event, OrderListEntry, ProjectState, Settings};

const LOAD_ADDRESS: usize = 0x0f00;

const WAVE: usize = 0x2000;
const FILTER: usize = 0x2400;
const PULSE: usize = 0x2800;
const INSTRUMENTS: usize = 0x3000;
const COMMANDS: usize = 0x3100;
const ORDER_LISTS: [usize; 3] = [0x3200, 0x3210, 0x3220];
const VECTOR_LOW: usize = 0x3300;
const VECTOR_HIGH: usize = 0x3380;
const SEQUENCES: [usize; 2] = [0x3400, 0x3500];
const END: usize = 0x3600;

/// A small but complete legacy song, laid out in a 64K address space.
struct LegacySong {
    memory: Vec<u8>,
}

impl LegacySong {
    fn new() -> Self {
        let mut memory = vec![0u8; 0x10000];
        let mut poke_word = |address: usize, value: usize| {
            memory[address] = value as u8;
            memory[address + 1] = (value >> 8) as u8;
        };
        poke_word(0x0fbc, WAVE);
        poke_word(0x0fc0, FILTER);
        poke_word(0x0fc2, PULSE);
        poke_word(0x0fc4, INSTRUMENTS);
        poke_word(0x0fc6, ORDER_LISTS[0]);
        poke_word(0x0fc8, ORDER_LISTS[1]);
        poke_word(0x0fca, ORDER_LISTS[2]);
        poke_word(0x0fcc, VECTOR_LOW);
        poke_word(0x0fce, VECTOR_HIGH);
        poke_word(0x0fd0, COMMANDS);
        memory[0x0fee..0x0ff3].copy_from_slice(b"20.G4");

        // instruments: 32 rows of 6 bytes, numbered in reading order
        for i in 0..0x20 * 6 {
            memory[INSTRUMENTS + i] = i as u8;
        }
        for i in 0..0x40 * 3 {
            memory[COMMANDS + i] = 0x80 | (i as u8 & 0x3f);
        }
        for i in 0..0x200 {
            memory[WAVE + i] = i as u8;
        }
        for i in 0..0x300 {
            memory[PULSE + i] = (i as u8).wrapping_mul(3);
            memory[FILTER + i] = (i as u8).wrapping_mul(5);
        }

        // channel 0 plays 0 then 1 (transposed up 2), channel 1 plays 1, channel 2 nothing
        memory[ORDER_LISTS[0]..ORDER_LISTS[0] + 6].copy_from_slice(&[0x00, 0x00, 0x02, 0x01, 0xff, 0x00]);
        memory[ORDER_LISTS[1]..ORDER_LISTS[1] + 4].copy_from_slice(&[0x03, 0x01, 0xff, 0x00]);
        memory[ORDER_LISTS[2]..ORDER_LISTS[2] + 2].copy_from_slice(&[0xff, 0x00]);

        for (i, address) in SEQUENCES.iter().enumerate() {
            memory[VECTOR_LOW + i] = *address as u8;
            memory[VECTOR_HIGH + i] = (*address >> 8) as u8;
        }
        // two header bytes, then (instrument or command, note) pairs up to $7f
        memory[SEQUENCES[0] + 2..SEQUENCES[0] + 7].copy_from_slice(&[0x01, 0x30, 0xc1, 0x32, 0x7f]);
        memory[SEQUENCES[1] + 2..SEQUENCES[1] + 5].copy_from_slice(&[0x02, 0x40, 0x7f]);

        Self { memory }
    }

    fn to_prg(&self) -> Vec<u8> {
        let mut prg = (LOAD_ADDRESS as u16).to_le_bytes().to_vec();
        prg.extend_from_slice(&self.memory[LOAD_ADDRESS..END]);
        prg
    }
}

#[test]
fn converts_a_complete_song() {
    let prg = LegacySong::new().to_prg();
    let layout = DriverLayout::default();
    let converted = convert(&prg, &layout, None).unwrap().expect("recognised as a legacy song");
    let song = &converted.song;

    assert_eq!(song.channel_count(), 3);
    assert_eq!(
        song.order_lists[0].entries(),
        &[
            OrderListEntry::new(0x20, 0),
            OrderListEntry::new(0x22, 1),
            OrderListEntry::end(0xff),
        ]
    );
    assert_eq!(song.order_lists[0].loop_index(), 0);
    assert_eq!(song.order_lists[1].entries()[0], OrderListEntry::new(0x23, 1));
    assert!(song.order_lists[2].entries()[0].is_end());

    assert_eq!(song.sequences.len(), 2);
    assert_eq!(
        song.sequences[0].events,
        vec![
            Event { instrument: 0x01, command: 0x80, note: 0x30 },
            Event { instrument: 0x80, command: 0xc1, note: 0x32 },
        ]
    );
    assert_eq!(song.sequences[1].len(), 1);
}

#[test]
fn tables_land_in_the_driver_layout() {
    let prg = LegacySong::new().to_prg();
    let layout = DriverLayout::default();
    let image = convert(&prg, &layout, None).unwrap().unwrap().image;

    assert_eq!(image.top_address(), layout.top_address);
    // the image runs on past the driver's own end to cover the music data
    assert!(image.end_address() > layout.end_address as usize);

    // instruments are stored column by column in the driver
    let instruments = layout.find_table("Instruments").unwrap().address;
    for row in 0..0x20u16 {
        for column in 0..6u16 {
            assert_eq!(image.get_byte(instruments + column * 0x20 + row), (row * 6 + column) as u8);
        }
    }

    let wave = layout.find_table("Wave").unwrap().address;
    for i in 0..0x200u16 {
        assert_eq!(image.get_byte(wave + i), i as u8);
    }
    let pulse = layout.find_table("Pulse").unwrap().address;
    assert_eq!(image.get_byte(pulse + 7), 21);
}

#[test]
fn music_data_is_packed_into_the_image() {
    let prg = LegacySong::new().to_prg();
    let layout = DriverLayout::default();
    let image = convert(&prg, &layout, None).unwrap().unwrap().image;
    let music = layout.music_data;

    let pointer = |vector: u16, stride: u16, index: u16| {
        u16::from_le_bytes([image.get_byte(vector + index), image.get_byte(vector + stride + index)])
    };
    let bytes = |address: u16, len: usize| image.memory()[address as usize..address as usize + len].to_vec();

    // order lists back to back from the start of the music data
    let channel0 = pointer(music.order_list_pointers, 3, 0);
    assert_eq!(channel0, music.data_address);
    assert_eq!(bytes(channel0, 6), vec![0xa0, 0x00, 0xa2, 0x01, 0xff, 0x00]);
    let channel1 = pointer(music.order_list_pointers, 3, 1);
    assert_eq!(bytes(channel1, 4), vec![0xa3, 0x01, 0xff, 0x00]);
    let channel2 = pointer(music.order_list_pointers, 3, 2);
    assert_eq!(bytes(channel2, 2), vec![0xff, 0x00]);

    // then the sequences
    let sequence0 = pointer(music.sequence_pointers, 0x80, 0);
    assert_eq!(sequence0, channel2 + 2);
    assert_eq!(bytes(sequence0, 5), vec![0xa1, 0x30, 0xc1, 0x32, 0x7f]);
    let sequence1 = pointer(music.sequence_pointers, 0x80, 1);
    assert_eq!(bytes(sequence1, 3), vec![0xa2, 0x40, 0x7f]);

    // and the image ends right after the last one
    assert_eq!(image.end_address(), sequence1 as usize + 3);
    assert_eq!(image.to_prg().len(), 2 + image.end_address() - layout.top_address as usize);
}

#[test]
fn split_wave_table_from_a_layout_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut json = serde_json::to_value(DriverLayout::default()).unwrap();
    json["tables"][2]["layout"] = "split".into();
    let path = dir.path().join("driver.json");
    std::fs::write(&path, json.to_string()).unwrap();
    let layout = persistence::load_driver_layout(&path).unwrap();
    assert_eq!(layout.find_table("Wave").unwrap().layout, Some(TableLayout::Split));

    let mut legacy = LegacySong::new();
    legacy.memory[WAVE + 0x100..WAVE + 0x200].fill(0xf0);
    let image = convert(&legacy.to_prg(), &layout, None).unwrap().unwrap().image;

    let wave = layout.find_table("Wave").unwrap().address;
    // marker rows stay where they are
    assert_eq!(image.get_byte(wave + 0x7e), 0x7e);
    assert_eq!(image.get_byte(wave + 0x100 + 0x7e), 0xf0);
    assert_eq!(image.get_byte(wave + 0x7f), 0x7f);
    // every other row swaps planes
    assert_eq!(image.get_byte(wave + 0x10), 0xf0);
    assert_eq!(image.get_byte(wave + 0x100 + 0x10), 0x10);
    assert_eq!(image.get_byte(wave + 0x80), 0xf0);
    assert_eq!(image.get_byte(wave + 0x100 + 0x80), 0x80);
}

#[test]
fn split_table_range_covers_both_planes() {
    let prg = LegacySong::new().to_prg();
    let mut layout = DriverLayout::default();
    for table in layout.tables.iter_mut().filter(|t| t.name == "Wave") {
        // one column fits below $ffff, two planes of 256 rows do not
        *table = TableDefinition::new("Wave", 0xfe80, 0x100, 1);
        table.layout = Some(TableLayout::Split);
    }

    assert!(matches!(
        convert(&prg, &layout, None),
        Err(ConvertError::AddressOutOfRange { ref what, size: 0x200, .. }) if what == "Wave"
    ));
}

#[test]
fn driver_image_is_kept_under_the_tables() {
    let prg = LegacySong::new().to_prg();
    let layout = DriverLayout::default();
    let mut driver_prg = layout.top_address.to_le_bytes().to_vec();
    driver_prg.extend_from_slice(&[0xea; 0x20]);
    let driver = ProgramImage::from_prg(&driver_prg).unwrap();

    let image = convert(&prg, &layout, Some(&driver)).unwrap().unwrap().image;
    assert_eq!(image.get_byte(layout.top_address), 0xea);
    assert_eq!(image.get_byte(layout.top_address + 0x1f), 0xea);
    assert_eq!(image.get_byte(layout.top_address + 0x20), 0x00);
}

#[test]
fn other_files_are_not_converted() {
    let mut legacy = LegacySong::new();
    legacy.memory[0x0fee..0x0ff3].copy_from_slice(b"20.g4");
    assert!(convert(&legacy.to_prg(), &DriverLayout::default(), None).unwrap().is_none());

    let mut relocated = LegacySong::new().to_prg();
    relocated[1] = 0x10;
    assert!(convert(&relocated, &DriverLayout::default(), None).unwrap().is_none());
}

#[test]
fn missing_driver_table_is_reported() {
    let prg = LegacySong::new().to_prg();
    let mut layout = DriverLayout::default();
    layout.tables.retain(|table| table.name != "Pulse");

    assert_eq!(convert(&prg, &layout, None).unwrap_err(), ConvertError::MissingTable("Pulse".into()));
}

#[test]
fn order_list_without_end_marker_is_reported() {
    let mut legacy = LegacySong::new();
    // channel 1's list runs into channel 2's space without an end record
    legacy.memory[ORDER_LISTS[1]..ORDER_LISTS[1] + 0x10].fill(0x00);
    let err = convert(&legacy.to_prg(), &DriverLayout::default(), None).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedOrderList { address: ORDER_LISTS[1] as u16, max_records: 8 });
}

#[test]
fn table_past_the_end_of_memory_is_reported() {
    let prg = LegacySong::new().to_prg();
    let mut layout = DriverLayout::default();
    layout.tables.retain(|table| table.name != "Filter");
    layout.tables.push(TableDefinition::new("Filter", 0xff80, 0x100, 3));

    assert!(matches!(
        convert(&prg, &layout, None),
        Err(ConvertError::AddressOutOfRange { .. })
    ));
}

#[test]
fn imported_song_feeds_the_overview_and_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let converted = convert(&LegacySong::new().to_prg(), &DriverLayout::default(), None)
        .unwrap()
        .unwrap();

    let mut middle = Middle::with_state(ProjectState::default(), Settings::default());
    let written = middle.import_converted(dir.path(), converted.clone()).unwrap();
    let positions: Vec<u32> = middle.overview().rows().iter().map(|r| r.event_pos).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
    assert_eq!(
        middle.overview().rows()[0].slots,
        vec![
            ChannelSlot::Active { sequence_index: 0, is_loop: true },
            ChannelSlot::Active { sequence_index: 1, is_loop: true },
            ChannelSlot::Terminated,
        ]
    );

    let bytes = std::fs::read(written).unwrap();
    assert_eq!(bytes, converted.image.to_prg());

    persistence::save_project(dir.path(), middle.sync_state()).unwrap();
    let reloaded = persistence::load_project(dir.path()).unwrap();
    assert_eq!(reloaded.song, converted.song);
}
