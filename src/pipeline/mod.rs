pub mod orderlist;
pub mod persistence;
pub mod project;
pub mod sequence;
pub mod song;

#[cfg(test)]
pub(crate) mod test_fixture;

pub use orderlist::{OrderList, OrderListEntry};
pub use project::{ProjectState, Settings};
pub use sequence::{Event, Sequence};
pub use song::Song;
