/// DOM `keyCode` values the engine and games commonly react to.
pub mod keys {
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const D: u32 = 68;
    pub const R: u32 = 82;
}

/// Pointer button index as reported by the DOM (`MouseEvent.button`).
pub const BUTTON_LEFT: u32 = 0;

/// Input event types the engine understands.
/// Pointer coordinates are canvas pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A mouse button was pressed at (x, y).
    PointerDown { x: f32, y: f32, button: u32 },
    /// A mouse button was released at (x, y).
    PointerUp { x: f32, y: f32, button: u32 },
    /// The cursor moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// The canvas was resized.
    Resize { width: f32, height: f32 },
    /// A custom event from the UI layer (buttons outside the canvas).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 640.0, y: 360.0, button: BUTTON_LEFT });
        q.push(InputEvent::KeyDown { key_code: keys::D });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
        assert!(q.drain().is_empty());
    }

    #[test]
    fn iter_keeps_events() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Resize { width: 800.0, height: 600.0 });
        assert_eq!(q.iter().count(), 1);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 1, a: 1.5, b: 2.5, c: 3.5 });
        let events = q.drain();
        match events[0] {
            InputEvent::Custom { kind, a, b, c } => {
                assert_eq!(kind, 1);
                assert_eq!((a, b, c), (1.5, 2.5, 3.5));
            }
            _ => panic!("Expected Custom event"),
        }
    }
}
