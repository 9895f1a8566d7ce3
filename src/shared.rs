// The input plan:
//
//   Up / Down           //  CursorUp / CursorDown
//   PageUp / PageDown   //  PageUp / PageDown (page_steps rows, 20 unless configured)
//   Home / End          //  Home / End (viewport edge first, list edge second)
//   Enter               //  Confirm { aux: false }, with ctrl: Confirm { aux: true }
//   Mouse wheel         //  Wheel(+1 up / -1 down)
//   Left click          //  ClickRow, a second click on the same row soon after is aux
//   Esc / q             //  Quit
//
// The TUI only turns key and mouse events into these; the middle layer owns the
// song, the overview and the cursor, and hands back a DisplayState to draw.

// ye olde types
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    Home,
    End,
    Wheel(i32), // positive scrolls the content down
    Confirm { aux: bool },
    ClickRow { local_y: u16, aux: bool },
    Resize { viewport_height: u16 },
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,      // channel inactive or ended on this row
    Value(u8),  // sequence index
    Loop(u8),   // sequence index, played from the loop point
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRow {
    pub event_pos: u32,
    pub cells: Vec<CellState>,
    pub is_cursor: bool,
    pub is_playback: bool, // playback position falls inside this row's span
}

#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    pub rows: Vec<DisplayRow>, // only what fits in the viewport
    pub channel_count: usize,
    pub hex_uppercase: bool,
    pub row_count: usize,
    pub cursor_position: usize,
    pub status_text: String,
}
