use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Tracks the pointer over the window and turns left-button releases into clicks.
///
/// Positions are in physical pixels, as winit reports them.
#[derive(Debug, Default)]
pub struct Input {
    pointer: Option<Vec2>,
    pressed: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event.
    ///
    /// Returns the pointer position of a completed left click: a press
    /// followed by a release while the pointer is inside the window.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Vec2> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Some(Vec2::new(position.x as f32, position.y as f32));
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                self.pressed = false;
                None
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.pressed = true;
                    None
                }
                ElementState::Released => {
                    let clicked = std::mem::take(&mut self.pressed);
                    if clicked { self.pointer } else { None }
                }
            },
            _ => None,
        }
    }

    /// Last known pointer position, if the pointer is over the window.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Returns true while the left button is held down.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
