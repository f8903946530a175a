//! GPU orchestration for the two scene passes.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `mesh` generates the static unit-circle fan shared by every instance.
//! - `vertex` derives the per-frame line vertices and circle instances from
//!   the chain.
//! - `uniforms` mirrors the `SceneParams` uniform block both pipelines read.
//! - `pipeline` compiles the shader programs into the line-strip and
//!   instanced-circle render pipelines.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod mesh;
mod pipeline;
mod state;
mod uniforms;
mod vertex;

pub(crate) use state::GpuState;
