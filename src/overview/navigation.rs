// Cursor and scroll state for a list of `max_cursor_position + 1` rows shown
// through a viewport `viewport_height` rows tall.
//
// After every request the cursor sits inside the viewport and the viewport
// never scrolls past the last row. Every request returns whether anything
// observable changed, which is what callers use to decide on a redraw.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavRequest {
    CursorUp(usize),
    CursorDown(usize),
    Home,
    End,
    // Positive deltas scroll the content down (the viewport moves up).
    WheelScroll(i32),
}

// Home and End go to the viewport edge first and to the list edge on the second press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeJump {
    None,
    ViewportEdge,
    ListEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
    cursor_position: usize,
    top_position: usize,
    max_cursor_position: usize,
    viewport_height: usize,
}

impl Navigation {
    pub fn new(viewport_height: usize) -> Self {
        Self {
            cursor_position: 0,
            top_position: 0,
            max_cursor_position: 0,
            viewport_height: viewport_height.max(1),
        }
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn top_position(&self) -> usize {
        self.top_position
    }

    pub fn max_cursor_position(&self) -> usize {
        self.max_cursor_position
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    fn max_top_position(&self) -> usize {
        self.max_cursor_position.saturating_sub(self.viewport_height - 1)
    }

    fn last_visible(&self) -> usize {
        self.top_position + self.viewport_height - 1
    }

    pub fn apply(&mut self, request: NavRequest) -> bool {
        match request {
            NavRequest::CursorUp(steps) => self.cursor_up(steps),
            NavRequest::CursorDown(steps) => self.cursor_down(steps),
            NavRequest::Home => self.home(),
            NavRequest::End => self.end(),
            NavRequest::WheelScroll(delta) => self.wheel_scroll(delta),
        }
    }

    pub fn cursor_up(&mut self, steps: usize) -> bool {
        if self.cursor_position == 0 {
            return false;
        }
        self.cursor_position = self.cursor_position.saturating_sub(steps);
        if self.cursor_position < self.top_position {
            self.top_position = self.cursor_position;
        }
        true
    }

    pub fn cursor_down(&mut self, steps: usize) -> bool {
        if self.cursor_position >= self.max_cursor_position {
            return false;
        }
        self.cursor_position = self
            .cursor_position
            .saturating_add(steps)
            .min(self.max_cursor_position);
        self.scroll_cursor_into_view();
        true
    }

    fn home_jump(&self) -> EdgeJump {
        match (self.cursor_position == 0, self.cursor_position == self.top_position) {
            (true, _) => EdgeJump::None,
            (false, true) => EdgeJump::ListEdge,
            (false, false) => EdgeJump::ViewportEdge,
        }
    }

    pub fn home(&mut self) -> bool {
        match self.home_jump() {
            EdgeJump::None => false,
            EdgeJump::ViewportEdge => {
                self.cursor_position = self.top_position;
                true
            }
            EdgeJump::ListEdge => {
                self.cursor_position = 0;
                self.top_position = 0;
                true
            }
        }
    }

    fn end_jump(&self) -> EdgeJump {
        let last_visible = self.last_visible();
        match (
            self.cursor_position >= self.max_cursor_position,
            last_visible <= self.max_cursor_position && self.cursor_position < last_visible,
        ) {
            (true, _) => EdgeJump::None,
            (false, true) => EdgeJump::ViewportEdge,
            (false, false) => EdgeJump::ListEdge,
        }
    }

    pub fn end(&mut self) -> bool {
        match self.end_jump() {
            EdgeJump::None => false,
            EdgeJump::ViewportEdge => {
                self.cursor_position = self.last_visible();
                true
            }
            EdgeJump::ListEdge => {
                self.cursor_position = self.max_cursor_position;
                self.scroll_cursor_into_view();
                true
            }
        }
    }

    pub fn wheel_scroll(&mut self, delta: i32) -> bool {
        if delta == 0 {
            return false;
        }
        let top = if delta > 0 {
            self.top_position.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.top_position.saturating_add(delta.unsigned_abs() as usize)
        }
        .min(self.max_top_position());

        if top == self.top_position {
            return false;
        }
        self.top_position = top;
        self.cursor_position = self.cursor_position.clamp(top, self.last_visible());
        true
    }

    // Called after every rebuild. The cursor is only ever pulled down to fit.
    pub fn resize(&mut self, max_cursor_position: usize) -> bool {
        let before = *self;
        self.max_cursor_position = max_cursor_position;
        self.cursor_position = self.cursor_position.min(max_cursor_position);
        self.top_position = self.top_position.min(self.max_top_position());
        self.scroll_cursor_into_view();
        *self != before
    }

    pub fn set_viewport_height(&mut self, viewport_height: usize) -> bool {
        let before = *self;
        self.viewport_height = viewport_height.max(1);
        self.top_position = self.top_position.min(self.max_top_position());
        self.scroll_cursor_into_view();
        *self != before
    }

    // Puts the cursor on `position` if it exists, scrolling it into view.
    pub fn set_cursor_position(&mut self, position: usize) -> bool {
        if position > self.max_cursor_position || position == self.cursor_position {
            return false;
        }
        self.cursor_position = position;
        self.scroll_cursor_into_view();
        true
    }

    fn scroll_cursor_into_view(&mut self) {
        if self.cursor_position < self.top_position {
            self.top_position = self.cursor_position;
        }
        if self.cursor_position >= self.top_position + self.viewport_height {
            self.top_position = self.cursor_position - (self.viewport_height - 1);
        }
    }
}
