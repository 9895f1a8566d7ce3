use crate::overview::NavRequest;
use crate::shared::InputEvent;

// maps the navigation subset of input events onto overview requests
pub fn event_to_request(event: &InputEvent, page_steps: usize) -> Option<NavRequest> {
    match event {
        InputEvent::CursorUp => Some(NavRequest::CursorUp(1)),
        InputEvent::CursorDown => Some(NavRequest::CursorDown(1)),
        InputEvent::PageUp => Some(NavRequest::CursorUp(page_steps)),
        InputEvent::PageDown => Some(NavRequest::CursorDown(page_steps)),
        InputEvent::Home => Some(NavRequest::Home),
        InputEvent::End => Some(NavRequest::End),
        InputEvent::Wheel(delta) => Some(NavRequest::WheelScroll(*delta)),
        _ => None,
    }
}
