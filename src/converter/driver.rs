// Where the target driver keeps its tables. Normally read from a json file next
// to the driver binary; the default describes the stock driver image.

use serde::{Deserialize, Serialize};

use super::ConvertError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    Linear,
    Transposed,
    Split,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub address: u16,
    pub row_count: u16,
    pub column_count: u16,
    // overrides how the converter lays the table out
    #[serde(default)]
    pub layout: Option<TableLayout>,
}

impl TableDefinition {
    pub fn new(name: &str, address: u16, row_count: u16, column_count: u16) -> Self {
        Self {
            name: name.to_string(),
            address,
            row_count,
            column_count,
            layout: None,
        }
    }

    pub fn size(&self) -> usize {
        self.row_count as usize * self.column_count as usize
    }
}

// Where packed order lists and sequences go. Each pointer vector is a run of
// low bytes followed by a run of high bytes; the data itself is packed back to
// back from data_address, order lists first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicDataLayout {
    pub order_list_pointers: u16,
    pub sequence_pointers: u16,
    pub data_address: u16,
}

impl Default for MusicDataLayout {
    fn default() -> Self {
        Self {
            order_list_pointers: 0x2180,
            sequence_pointers: 0x2190,
            data_address: 0x2290,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverLayout {
    pub top_address: u16,
    pub end_address: u32, // exclusive; end of driver code and tables, music data may run past it
    pub tables: Vec<TableDefinition>,
    #[serde(default)]
    pub music_data: MusicDataLayout,
}

impl Default for DriverLayout {
    fn default() -> Self {
        Self {
            top_address: 0x1000,
            end_address: 0x2180,
            tables: vec![
                TableDefinition::new("Instruments", 0x1800, 0x20, 6),
                TableDefinition::new("Commands", 0x18c0, 0x40, 3),
                TableDefinition::new("Wave", 0x1980, 0x100, 2),
                TableDefinition::new("Pulse", 0x1b80, 0x100, 3),
                TableDefinition::new("Filter", 0x1e80, 0x100, 3),
            ],
            music_data: MusicDataLayout::default(),
        }
    }
}

impl DriverLayout {
    pub fn find_table(&self, name: &str) -> Result<&TableDefinition, ConvertError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ConvertError::MissingTable(name.to_string()))
    }
}
