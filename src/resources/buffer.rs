//! GPU buffer resource.

use std::sync::Arc;

use crate::device::RenderDevice;
use crate::types::{BufferDesc, BufferUsage};

/// A GPU buffer resource.
///
/// Buffers are created by [`RenderDevice::create_buffer`] and are
/// reference-counted. Vertex and index buffers travel inside drawable
/// objects; constant buffers travel through pass ports and step bundles.
pub struct Buffer {
    device: Arc<RenderDevice>,
    descriptor: BufferDesc,
}

impl Buffer {
    /// Create a new buffer (called by RenderDevice).
    pub(crate) fn new(device: Arc<RenderDevice>, descriptor: BufferDesc) -> Self {
        Self { device, descriptor }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// Get the buffer size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    /// Get the buffer usage flags.
    pub fn usage(&self) -> BufferUsage {
        self.descriptor.usage
    }

    /// Get the debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.descriptor.size)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

static_assertions::assert_impl_all!(Buffer: Send, Sync);
