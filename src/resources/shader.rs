//! Compiled shader resource.

use std::sync::Arc;

use crate::device::RenderDevice;
use crate::types::{ShaderDesc, ShaderStage};

/// A compiled shader bound by a pass or a step before drawing.
///
/// Shader bytecode loading happens in the collaborator layer; the core only
/// carries the handle through ports and bundles.
pub struct Shader {
    device: Arc<RenderDevice>,
    descriptor: ShaderDesc,
}

impl Shader {
    /// Create a new shader (called by RenderDevice).
    pub(crate) fn new(device: Arc<RenderDevice>, descriptor: ShaderDesc) -> Self {
        Self { device, descriptor }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// Get the pipeline stage this shader runs in.
    pub fn stage(&self) -> ShaderStage {
        self.descriptor.stage
    }

    /// Get the entry point name.
    pub fn entry_point(&self) -> &str {
        &self.descriptor.entry_point
    }

    /// Get the debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("stage", &self.descriptor.stage)
            .field("entry_point", &self.descriptor.entry_point)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

static_assertions::assert_impl_all!(Shader: Send, Sync);
