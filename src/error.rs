// error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("buffer capacity exceeded: {requested} elements requested, capacity is {capacity}")]
    CapacityExceeded { capacity: usize, requested: usize },
    #[error("invalid shape parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("transform list is full ({capacity} matrices)")]
    Full { capacity: usize },
}

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
}

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Decode { path: PathBuf, source: image::ImageError },
}

/// Fatal startup/runtime failures surfaced to `main`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to open device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface does not support the adapter")]
    UnsupportedSurface,
}
