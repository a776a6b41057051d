//! # Emberlily Graphics
//!
//! Frame orchestration built around a declarative render graph.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RenderGraph`] - Ordered passes linked through named, typed ports
//! - [`graph::passes`] - Constructors for the built-in pass repertoire
//! - [`Technique`] / [`Step`] - Per-object draw submission into queue passes
//! - [`RenderDevice`] - Command-recording device collaborator
//!
//! ## Example
//!
//! ```
//! use emberlily_graphics::{Extent2d, RenderDevice, RenderGraph};
//!
//! let device = RenderDevice::new();
//! let mut graph = RenderGraph::standard(&device, Extent2d::new(1920, 1080)).unwrap();
//! graph.run_frame().unwrap();
//! ```

pub mod device;
pub mod error;
pub mod graph;
pub mod queue;
pub mod resources;
pub mod types;

// Re-export main types for convenience
pub use device::{Command, RenderDevice};
pub use error::{DeviceError, Error, GraphError};
pub use graph::{Pass, PassHandle, PassStage, QueueConfig, RenderGraph};
pub use queue::{RenderObject, RenderQueue, Step, Task, Technique};
pub use resources::{Resource, ResourceKind};
pub use types::{
    BufferDesc, BufferUsage, ClearValue, ComponentDesc, DepthStencilDesc, Extent2d,
    RenderTargetDesc, ShaderDesc, TextureFormat,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before building any graphs.
pub fn init() {
    log::info!("Emberlily Graphics v{} initialized", VERSION);
}
