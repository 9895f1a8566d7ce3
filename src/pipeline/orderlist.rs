// One order list per channel: which sequence plays next, transposed by how much,
// and where playback jumps back to once the list runs out.

use std::ops::Index;

use serde::{Deserialize, Serialize};

// Transposition that leaves a sequence at its written pitch.
pub const TRANSPOSITION_NEUTRAL: u8 = 0x20;
// End marker: the channel stops.
pub const TRANSPOSITION_STOP: u8 = 0xfe;
// End marker: the driver restarts the channel at its loop index.
pub const TRANSPOSITION_LOOP: u8 = 0xff;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderListEntry {
    pub transposition: u8,
    pub sequence_index: u8,
}

impl OrderListEntry {
    pub fn new(transposition: u8, sequence_index: u8) -> Self {
        Self { transposition, sequence_index }
    }

    pub fn end(transposition: u8) -> Self {
        Self { transposition, sequence_index: 0 }
    }

    // 0xfe and 0xff both end the list; which one applies is the driver's business
    pub fn is_end(&self) -> bool {
        self.transposition >= TRANSPOSITION_STOP
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOrderList")]
pub struct OrderList {
    entries: Vec<OrderListEntry>,
    loop_index: usize,
}

// what project.json holds; goes through OrderList::new so a stale loop index gets clamped
#[derive(Deserialize)]
struct RawOrderList {
    entries: Vec<OrderListEntry>,
    #[serde(default)]
    loop_index: usize,
}

impl From<RawOrderList> for OrderList {
    fn from(raw: RawOrderList) -> Self {
        OrderList::new(raw.entries, raw.loop_index)
    }
}

impl OrderList {
    pub fn new(entries: Vec<OrderListEntry>, loop_index: usize) -> Self {
        let mut list = Self { entries, loop_index: 0 };
        list.set_loop_index(loop_index);
        list
    }

    pub fn terminated() -> Self {
        Self::new(vec![OrderListEntry::end(TRANSPOSITION_LOOP)], 0)
    }

    // Number of live entries: everything up to and including the first end
    // marker, or every entry when the list has none.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .position(OrderListEntry::is_end)
            .map(|i| i + 1)
            .unwrap_or(self.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loop_index(&self) -> usize {
        self.loop_index
    }

    // keeps 0 <= loop_index < len whenever there is anything to loop over
    pub fn set_loop_index(&mut self, loop_index: usize) -> bool {
        let clamped = loop_index.min(self.len().saturating_sub(1));
        let changed = clamped != self.loop_index;
        self.loop_index = clamped;
        changed
    }

    pub fn get(&self, index: usize) -> Option<&OrderListEntry> {
        self.entries.get(index)
    }

    // Overwrites an entry, growing the list when writing one past its end.
    // Returns whether anything changed.
    pub fn set(&mut self, index: usize, entry: OrderListEntry) -> bool {
        if index == self.entries.len() {
            self.entries.push(entry);
        } else if let Some(slot) = self.entries.get_mut(index) {
            if *slot == entry {
                return false;
            }
            *slot = entry;
        } else {
            return false;
        }
        let loop_index = self.loop_index;
        self.set_loop_index(loop_index);
        true
    }

    pub fn entries(&self) -> &[OrderListEntry] {
        &self.entries[..self.len()]
    }

    pub fn max_sequence_index(&self) -> Option<u8> {
        self.entries()
            .iter()
            .filter(|e| !e.is_end())
            .map(|e| e.sequence_index)
            .max()
    }
}

impl Index<usize> for OrderList {
    type Output = OrderListEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_stops_at_first_end_marker() {
        let list = OrderList::new(
            vec![
                OrderListEntry::new(0x20, 1),
                OrderListEntry::end(TRANSPOSITION_STOP),
                OrderListEntry::new(0x20, 7),
            ],
            0,
        );
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries().len(), 2);
        assert_eq!(list.max_sequence_index(), Some(1));
    }

    #[test]
    fn loop_index_is_clamped_into_the_list() {
        let mut list = OrderList::new(vec![OrderListEntry::new(0x20, 0); 3], 9);
        assert_eq!(list.loop_index(), 2);
        assert!(list.set_loop_index(1));
        assert!(!list.set_loop_index(1));
    }

    #[test]
    fn set_reports_changes_and_grows_by_one() {
        let mut list = OrderList::terminated();
        assert!(!list.set(0, OrderListEntry::end(TRANSPOSITION_LOOP)));
        assert!(list.set(0, OrderListEntry::new(0x22, 3)));
        assert!(list.set(1, OrderListEntry::end(TRANSPOSITION_STOP)));
        assert!(!list.set(5, OrderListEntry::new(0x20, 0)));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].sequence_index, 3);
    }

    #[test]
    fn loaded_loop_index_is_clamped() {
        let list: OrderList = serde_json::from_str(
            r#"{
                "entries": [
                    { "transposition": 32, "sequence_index": 0 },
                    { "transposition": 32, "sequence_index": 0 }
                ],
                "loop_index": 5
            }"#,
        )
        .unwrap();
        assert_eq!(list.loop_index(), 1);

        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(serde_json::from_str::<OrderList>(&json).unwrap(), list);
    }
}
