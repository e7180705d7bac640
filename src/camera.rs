// camera.rs
use glam::{Mat4, Vec3};
use crate::{config, input::Action};

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy: f32, // radians
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::from_array(config::CAMERA_START),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: config::FOV_Y.to_radians(),
            aspect,
            znear: config::Z_NEAR,
            zfar: config::Z_FAR,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // Moves the eye and what it looks at together, keeping the view direction
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.target += delta;
    }
}

#[derive(Debug, Default)]
pub struct CameraController {
    pub move_fwd: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the movement actions held this frame.
    pub fn process_actions(&mut self, actions: impl IntoIterator<Item = Action>) {
        *self = Self::default();
        for action in actions {
            match action {
                Action::MoveForward => self.move_fwd = true,
                Action::MoveBack => self.move_back = true,
                Action::MoveLeft => self.move_left = true,
                Action::MoveRight => self.move_right = true,
                Action::Quit => {}
            }
        }
    }

    pub fn update_camera(&self, camera: &mut Camera, dt: f32) {
        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();

        let mut dir = Vec3::ZERO;
        if self.move_fwd { dir += forward; }
        if self.move_back { dir -= forward; }
        if self.move_right { dir += right; }
        if self.move_left { dir -= right; }
        if dir.length_squared() > 0.0 {
            camera.translate(dir.normalize() * config::MOVE_SPEED * dt);
        }
    }
}
