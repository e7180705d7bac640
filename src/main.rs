use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod buffer;
mod camera;
mod config;
mod error;
mod geometry;
mod input;
mod pacer;
mod scene;
mod shader;
mod state;
mod texture;
mod transform;
mod vertex;

use error::AppError;
use pacer::FramePacer;
use state::State;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(config::WINDOW_WIDTH, config::WINDOW_HEIGHT))
            .build(&event_loop)?,
    );

    let mut state = pollster::block_on(State::new(window.clone()))?;
    let mut pacer = FramePacer::new(config::TARGET_FPS);
    let mut fatal: Option<AppError> = None;
    log::info!("Entering render loop at {} fps", config::TARGET_FPS);

    event_loop.run(|event, elwt| {
        match event {
            Event::WindowEvent { ref event, window_id } if window_id == window.id() => {
                // Pass input to state first
                if state.input(event) {
                    if state.input.quit_requested() {
                        elwt.exit();
                    }
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(physical_size) => state.resize(*physical_size),
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = state.update() {
                            fatal = Some(e.into());
                            elwt.exit();
                            return;
                        }
                        match state.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size()),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of GPU memory");
                                elwt.exit();
                            }
                            Err(e) => log::warn!("Render error: {:?}", e),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                pacer.wait();
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    log::info!("Shutting down");
    fatal.map_or(Ok(()), Err)
}
