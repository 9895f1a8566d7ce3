pub mod converter;
pub mod core;
pub mod memory;
pub mod middle;
pub mod overview;
pub mod pipeline;
pub mod shared;
pub mod tui;
