// input.rs
use std::collections::{HashMap, HashSet};
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Quit,
}

/// Keyboard and mouse state for one window, owned by the app state.
///
/// Keys are polled: whatever is held when the frame starts is reported by
/// [`InputState::active_actions`]. Keys without a binding are ignored.
pub struct InputState {
    bindings: HashMap<KeyCode, Action>,
    held: HashSet<KeyCode>,
    window_size: Vec2,
    cursor: Option<Vec2>,
    dragging: bool,
    drag_delta: Vec2,
}

impl InputState {
    pub fn new(width: u32, height: u32) -> Self {
        let mut input = Self {
            bindings: HashMap::new(),
            held: HashSet::new(),
            window_size: Vec2::ONE,
            cursor: None,
            dragging: false,
            drag_delta: Vec2::ZERO,
        };
        input.resize(width, height);
        input.bind(KeyCode::KeyW, Action::MoveForward);
        input.bind(KeyCode::KeyS, Action::MoveBack);
        input.bind(KeyCode::KeyA, Action::MoveLeft);
        input.bind(KeyCode::KeyD, Action::MoveRight);
        input.bind(KeyCode::Escape, Action::Quit);
        input
    }

    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    /// Returns true when the event was consumed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(key), state, .. }, ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.set_left_button(*state == ElementState::Pressed);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.dragging = false;
                true
            }
            _ => false,
        }
    }

    pub fn set_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if !self.bindings.contains_key(&key) {
            return false;
        }
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        true
    }

    pub fn move_cursor(&mut self, x: f32, y: f32) {
        let next = Vec2::new(x, y);
        if let (true, Some(prev)) = (self.dragging, self.cursor) {
            self.drag_delta += (next - prev) / self.window_size;
        }
        self.cursor = Some(next);
    }

    pub fn set_left_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn active_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.held.iter().filter_map(|key| self.bindings.get(key).copied())
    }

    pub fn quit_requested(&self) -> bool {
        self.active_actions().any(|a| a == Action::Quit)
    }

    /// Drag movement since the last call, as a fraction of the window size.
    pub fn take_drag_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag_delta)
    }
}
