//! Byte-exact table relocation between two memory layouts.
//!
//! Addresses index straight into the given slices; callers check that
//! every range fits before copying.

/// Wave table bytes that mark the end of a segment or a loop; never swapped.
pub const WAVE_MARKERS: [u8; 2] = [0x7e, 0x7f];

pub fn copy_table(source: &[u8], source_address: usize, dest: &mut [u8], dest_address: usize, size: usize) {
    dest[dest_address..dest_address + size]
        .copy_from_slice(&source[source_address..source_address + size]);
}

/// Row-major source to column-major destination.
pub fn copy_table_transposed(
    source: &[u8],
    source_address: usize,
    dest: &mut [u8],
    dest_address: usize,
    row_count: usize,
    column_count: usize,
) {
    for r in 0..row_count {
        for c in 0..column_count {
            dest[dest_address + c * row_count + r] = source[source_address + r * column_count + c];
        }
    }
}

/// Two planes of `size` bytes each. Rows whose first-plane byte is a marker are
/// copied as they are; every other row has its two bytes swapped between planes.
pub fn copy_split_table(source: &[u8], source_address: usize, dest: &mut [u8], dest_address: usize, size: usize) {
    for i in 0..size {
        let value = source[source_address + i];
        let other = source[source_address + size + i];
        let (first, second) = if WAVE_MARKERS.contains(&value) {
            (value, other)
        } else {
            (other, value)
        };
        dest[dest_address + i] = first;
        dest[dest_address + size + i] = second;
    }
}
