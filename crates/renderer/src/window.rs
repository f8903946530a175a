use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::scene::{ChainCommand, SceneState};
use crate::types::RendererConfig;

/// Aggregates window, simulation, and GPU state for the event loop.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    scene: SceneState,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.clone(), size, config)?;
        let scene = SceneState::new(size.width, size.height, config.initial_chain_len);
        Ok(Self { window, gpu, scene })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.scene.set_bounds(new_size.width, new_size.height);
    }

    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.scene.set_cursor(position.x as f32, position.y as f32);
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if let Key::Character(text) = &event.logical_key {
            if let Some(command) = command_for_key(text.as_str()) {
                self.scene.apply(command);
            }
        }
    }

    /// Advances the simulation one step and submits a frame.
    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.scene.tick();
        self.gpu.render(&self.scene)
    }
}

/// Maps the keyboard surface to chain commands.
fn command_for_key(text: &str) -> Option<ChainCommand> {
    match text {
        "c" | "C" => Some(ChainCommand::Clear),
        "a" | "A" => Some(ChainCommand::AppendRandom),
        "r" | "R" => Some(ChainCommand::RemoveLast),
        _ => None,
    }
}

/// Opens the preview window and drives the winit event loop.
///
/// A `WindowState` is created up-front and stored inside the event-loop
/// closure. winit delivers events one by one; input handlers write into the
/// scene, and another frame is drawn whenever a redraw is requested.
pub(crate) fn run_event_loop(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window.clone(), config)?;
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| {
            // Drive redraws via vblank by waiting between events.
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.state == ElementState::Pressed && !event.repeat {
                                if matches!(event.logical_key, Key::Named(NamedKey::Escape)) {
                                    elwt.exit();
                                } else {
                                    state.handle_key(&event);
                                }
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            state.handle_cursor_moved(position);
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            // Keep the current logical size when the scale factor changes.
                            let _ = inner_size_writer.request_inner_size(state.size());
                        }
                        WindowEvent::RedrawRequested => match state.render_frame() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                tracing::warn!("surface timeout; retrying next frame");
                            }
                            Err(other) => {
                                tracing::warn!("surface error: {other:?}; retrying next frame");
                            }
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    // Schedule the next frame once winit is about to wait for events again.
                    state.window().request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_chain_commands() {
        assert_eq!(command_for_key("c"), Some(ChainCommand::Clear));
        assert_eq!(command_for_key("C"), Some(ChainCommand::Clear));
        assert_eq!(command_for_key("a"), Some(ChainCommand::AppendRandom));
        assert_eq!(command_for_key("r"), Some(ChainCommand::RemoveLast));
        assert_eq!(command_for_key("x"), None);
        assert_eq!(command_for_key(" "), None);
    }
}
