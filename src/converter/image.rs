// A C64 program image: a 16-bit load address followed by the bytes that land there.
// Kept as a full 64K address space so reads through stray pointers stay in bounds.

use crate::memory::MEMORY_SIZE;

#[derive(Clone, PartialEq, Eq)]
pub struct ProgramImage {
    memory: Box<[u8]>,
    top_address: u16,
    end_address: usize, // exclusive, may be 0x10000
}

impl std::fmt::Debug for ProgramImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgramImage(${:04x}-${:04x})", self.top_address, self.end_address)
    }
}

/// Reads the load address from the first two bytes of a .prg file.
pub fn read_load_address(prg: &[u8]) -> Option<u16> {
    match prg {
        [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
        _ => None,
    }
}

impl ProgramImage {
    pub fn from_data(top_address: u16, data: &[u8]) -> Self {
        let mut memory = vec![0u8; MEMORY_SIZE].into_boxed_slice();
        let start = top_address as usize;
        let end = (start + data.len()).min(MEMORY_SIZE);
        memory[start..end].copy_from_slice(&data[..end - start]);
        Self { memory, top_address, end_address: end }
    }

    /// Anything that would load past $ffff is cut off.
    pub fn from_prg(prg: &[u8]) -> Option<Self> {
        let top_address = read_load_address(prg)?;
        Some(Self::from_data(top_address, &prg[2..]))
    }

    pub fn to_prg(&self) -> Vec<u8> {
        let mut prg = Vec::with_capacity(2 + self.data().len());
        prg.extend_from_slice(&self.top_address.to_le_bytes());
        prg.extend_from_slice(self.data());
        prg
    }

    pub fn top_address(&self) -> u16 {
        self.top_address
    }

    pub fn end_address(&self) -> usize {
        self.end_address
    }

    /// The loaded bytes only.
    pub fn data(&self) -> &[u8] {
        &self.memory[self.top_address as usize..self.end_address]
    }

    /// The whole address space, for address-based copies.
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn get_byte(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    pub fn get_word(&self, address: u16) -> u16 {
        u16::from_le_bytes([self.get_byte(address), self.get_byte(address.wrapping_add(1))])
    }
}
