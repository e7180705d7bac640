// config.rs

pub const WINDOW_TITLE: &str = "Primitive Sandbox";
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 800;

// --- External resources ---
pub const VERTEX_SHADER_PATH: &str = "shaders/vertex.wgsl";
pub const FRAGMENT_SHADER_PATH: &str = "shaders/fragment.wgsl";
pub const EARTH_TEXTURE_PATH: &str = "assets/earth.png";

// --- Geometry ---
pub const CAPACITY: usize = 4096; // Default bound for every scratch buffer
pub const SPHERE_SECTORS: u32 = 24;
pub const SPHERE_STACKS: u32 = 16;
pub const EARTH_SECTORS: u32 = 32;
pub const EARTH_STACKS: u32 = 32;
pub const CIRCLE_SEGMENTS: u32 = 36;
pub const CIRCLE_RADIUS: f32 = 0.3;
pub const CIRCLE_STRIDE: usize = 4; // x, y, s, t

// --- Transforms ---
pub const TRANSFORM_CAPACITY: usize = 10;

// --- Camera ---
pub const FOV_Y: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
pub const CAMERA_START: [f32; 3] = [0.0, 0.0, 5.0];

// Movement
pub const MOVE_SPEED: f32 = 2.5; // units per second
pub const DRAG_SENSITIVITY: f32 = std::f32::consts::PI; // radians per window-width of drag
pub const SPIN_SPEED: f32 = 0.6; // radians per second, idle rotation

// --- Frame pacing ---
pub const TARGET_FPS: u32 = 60;

// --- Rendering ---
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.2, g: 0.3, b: 0.3, a: 1.0 };
