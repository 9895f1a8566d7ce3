// Timeline merge: folds every channel's order list into one list of rows,
// one row per event position at which at least one channel starts an entry.

use thiserror::Error;

use crate::pipeline::OrderList;

/// Length lookup for the sequences order list entries point at.
pub trait SequenceLengths {
    fn sequence_length(&self, index: u8) -> usize;
}

impl<F: Fn(u8) -> usize> SequenceLengths for F {
    fn sequence_length(&self, index: u8) -> usize {
        self(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("order lists never settle: gave up after {rows} rows at event position {position:#x}")]
    Unbounded { rows: usize, position: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSlot {
    Inactive,
    Active { sequence_index: u8, is_loop: bool },
    Terminated,
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverviewEntry {
    pub event_pos: u32,
    pub slots: Vec<ChannelSlot>,
}

#[derive(Clone, Copy, Debug)]
struct ChannelCursor {
    index: usize,
    due: Option<u32>, // None once the channel has hit its end marker
    wrapped: bool,    // ran off the end of its entries and went back to the loop index
    periodic: bool,   // fired again after wrapping; everything from here repeats
}

impl ChannelCursor {
    fn settled(&self) -> bool {
        self.due.is_none() || self.periodic
    }
}

/// Merges `order_lists` into rows. Stops once every channel has either reached
/// an end marker or wrapped back around to its loop index and played it again.
/// Fails rather than produce more than `max_rows` rows.
pub fn rebuild(
    order_lists: &[OrderList],
    lengths: &impl SequenceLengths,
    max_rows: usize,
) -> Result<Vec<OverviewEntry>, MergeError> {
    let mut cursors = vec![
        ChannelCursor { index: 0, due: Some(0), wrapped: false, periodic: false };
        order_lists.len()
    ];
    let mut rows = Vec::new();
    let mut event_pos = 0u32;

    loop {
        if rows.len() >= max_rows {
            return Err(MergeError::Unbounded { rows: rows.len(), position: event_pos });
        }

        let mut slots = Vec::with_capacity(order_lists.len());
        for (list, cursor) in order_lists.iter().zip(cursors.iter_mut()) {
            if cursor.due != Some(event_pos) {
                slots.push(ChannelSlot::Inactive);
                continue;
            }
            slots.push(advance(list, cursor, lengths, rows.len())?);
        }
        rows.push(OverviewEntry { event_pos, slots });

        if cursors.iter().all(ChannelCursor::settled) {
            break;
        }
        // an unsettled channel always has a due position, so this is never None
        match cursors.iter().filter_map(|c| c.due).min() {
            Some(next) => event_pos = next,
            None => break,
        }
    }

    tracing::debug!(rows = rows.len(), channels = order_lists.len(), "rebuilt order list overview");
    Ok(rows)
}

fn advance(
    list: &OrderList,
    cursor: &mut ChannelCursor,
    lengths: &impl SequenceLengths,
    row: usize,
) -> Result<ChannelSlot, MergeError> {
    let position = cursor.due.unwrap_or_default();
    let entry = match list.get(cursor.index) {
        Some(entry) if !entry.is_end() => *entry,
        // an empty list reads as a lone end marker
        _ => {
            cursor.due = None;
            return Ok(ChannelSlot::Terminated);
        }
    };

    let is_loop = cursor.index == list.loop_index();
    if cursor.wrapped {
        cursor.periodic = true;
    }

    // zero length (or a dangling index) still takes a row so positions keep increasing
    let length = lengths.sequence_length(entry.sequence_index).max(1);
    let next = u32::try_from(length)
        .ok()
        .and_then(|length| position.checked_add(length))
        .ok_or(MergeError::Unbounded { rows: row, position })?;
    cursor.due = Some(next);

    cursor.index += 1;
    if cursor.index >= list.len() {
        cursor.index = list.loop_index();
        cursor.wrapped = true;
    }

    Ok(ChannelSlot::Active { sequence_index: entry.sequence_index, is_loop })
}
