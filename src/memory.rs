// Emulated 64K memory shared between the converter and whoever else wants to
// poke at driver data. All access goes through `lock()`; the guard unlocks on drop,
// including when a copy bails out halfway with an error.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const MEMORY_SIZE: usize = 0x10000;

#[derive(Clone)]
pub struct EmulatedMemory {
    bytes: Arc<Mutex<Box<[u8]>>>,
}

impl Default for EmulatedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatedMemory {
    pub fn new() -> Self {
        Self {
            bytes: Arc::new(Mutex::new(vec![0u8; MEMORY_SIZE].into_boxed_slice())),
        }
    }

    pub fn lock(&self) -> MemoryGuard<'_> {
        // a panic mid-copy leaves plain bytes behind, nothing to repair
        MemoryGuard {
            bytes: self.bytes.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

pub struct MemoryGuard<'a> {
    bytes: MutexGuard<'a, Box<[u8]>>,
}

impl MemoryGuard<'_> {
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn get_byte(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    pub fn get_word(&self, address: u16) -> u16 {
        u16::from_le_bytes([self.get_byte(address), self.get_byte(address.wrapping_add(1))])
    }

    // Writes `data` at `address`, dropping whatever would run past the top of memory.
    pub fn set_data(&mut self, address: u16, data: &[u8]) {
        let start = address as usize;
        let end = (start + data.len()).min(MEMORY_SIZE);
        self.bytes[start..end].copy_from_slice(&data[..end - start]);
    }

    pub fn get_data(&self, address: u16, size: usize) -> Vec<u8> {
        let start = address as usize;
        let end = (start + size).min(MEMORY_SIZE);
        self.bytes[start..end].to_vec()
    }
}

impl Deref for MemoryGuard<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for MemoryGuard<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
