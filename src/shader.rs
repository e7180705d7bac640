// shader.rs
use std::path::Path;
use crate::error::ShaderError;

/// Reads a WGSL source file from disk.
pub fn load_source(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|source| ShaderError::Read { path: path.to_path_buf(), source })?;
    log::info!("Loaded shader {} ({} bytes)", path.display(), source.len());
    Ok(source)
}

pub fn create_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
