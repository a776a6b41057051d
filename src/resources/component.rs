//! Shader-bindable fixed-function state components.

use std::sync::Arc;

use crate::device::RenderDevice;
use crate::types::ComponentDesc;

/// An opaque fixed-function state object (rasterizer, blend, stencil or
/// sampler state) bound by passes and steps.
///
/// Components are typically registered as shared outputs: one rasterizer
/// state is legitimately claimed by many consumers.
pub struct Component {
    device: Arc<RenderDevice>,
    descriptor: ComponentDesc,
    label: Option<String>,
}

impl Component {
    /// Create a new component (called by RenderDevice).
    pub(crate) fn new(
        device: Arc<RenderDevice>,
        descriptor: ComponentDesc,
        label: Option<String>,
    ) -> Self {
        Self {
            device,
            descriptor,
            label,
        }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// Get the component descriptor.
    pub fn descriptor(&self) -> &ComponentDesc {
        &self.descriptor
    }

    /// Get the debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("class", &self.descriptor.class())
            .field("label", &self.label)
            .finish()
    }
}

static_assertions::assert_impl_all!(Component: Send, Sync);
