use std::mem;
use winit::dpi::PhysicalPosition;
use winit::keyboard::KeyCode;

/// Everything the user asked for since the last frame.
///
/// Filled from window events and drained once per frame with
/// [`InputState::take_frame`]; the cursor position carries over.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub cursor: Option<PhysicalPosition<f64>>,
    pub clicks: Vec<PhysicalPosition<f64>>,
    pub toggle_pause: bool,
    pub toggle_edit: bool,
    pub speed_up: bool,
    pub slow_down: bool,
    pub save: bool,
    pub reload: bool,
    pub clear: bool,
    pub quit: bool,
}

impl InputState {
    pub fn on_key_pressed(&mut self, code: KeyCode) {
        match code {
            KeyCode::Space => self.toggle_pause = !self.toggle_pause,
            KeyCode::KeyE => self.toggle_edit = !self.toggle_edit,
            KeyCode::ArrowUp | KeyCode::Equal | KeyCode::NumpadAdd => self.speed_up = true,
            KeyCode::ArrowDown | KeyCode::Minus | KeyCode::NumpadSubtract => {
                self.slow_down = true
            }
            KeyCode::KeyS => self.save = true,
            KeyCode::KeyL => self.reload = true,
            KeyCode::KeyC => self.clear = true,
            KeyCode::Escape | KeyCode::KeyQ => self.quit = true,
            _ => (),
        }
    }

    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = Some(position);
    }

    pub fn on_left_click(&mut self) {
        if let Some(cursor) = self.cursor {
            self.clicks.push(cursor);
        }
    }

    pub fn has_requests(&self) -> bool {
        let idle = InputState {
            cursor: self.cursor,
            ..InputState::default()
        };
        *self != idle
    }

    pub fn take_frame(&mut self) -> InputState {
        let cursor = self.cursor;
        let frame = mem::take(self);
        self.cursor = cursor;
        frame
    }
}
