//! Renderer crate for snakeline, the cursor-trail animation toy.
//!
//! The crate glues the winit preview window, the `wgpu` rendering pipelines,
//! and the chain simulation together. The overall flow is:
//!
//! ```text
//!   CLI / snakeline
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                │                     │
//!          │          SceneState ◀── input        └─▶ GpuState ─▶ draw calls
//! ```
//!
//! `SceneState` owns the simulation (chain, cursor, background hue) and is
//! mutated only from the event-loop thread; `GpuState` owns every GPU
//! resource (surface, device, pipelines, buffers) and re-uploads the
//! chain-derived vertex and instance data each frame. `Renderer` is the thin
//! entry point the binary crate drives.

mod chain;
mod color;
mod compile;
mod gpu;
mod scene;
mod types;
mod window;

pub use chain::{Chain, SMOOTHING};
pub use color::{hsb_to_rgb, BackgroundHue};
pub use scene::{ChainCommand, SceneState};
pub use types::{Antialiasing, RendererConfig};

use anyhow::Result;

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window and GPU modules; `Renderer`
/// simply opens the preview window and drives it until close is requested.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs the event loop to completion.
    ///
    /// Returns an error when initialisation fails (event loop, window, GPU
    /// adapter, device, or surface); once the loop is running, per-frame
    /// problems are logged and recovered instead of propagated.
    pub fn run(&mut self) -> Result<()> {
        window::run_event_loop(&self.config)
    }
}
