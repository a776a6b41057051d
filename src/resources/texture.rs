//! Render-target and depth-stencil texture resources.

use std::sync::Arc;

use crate::device::RenderDevice;
use crate::types::{DepthStencilDesc, DepthUsage, Extent2d, RenderTargetDesc, TextureFormat};

/// A texture that passes render color output into.
///
/// Render targets are created by [`RenderDevice::create_render_target`] and
/// are reference-counted; several passes may legitimately alias the same
/// target (the back buffer travels through most of the frame).
pub struct RenderTarget {
    device: Arc<RenderDevice>,
    descriptor: RenderTargetDesc,
}

impl RenderTarget {
    /// Create a new render target (called by RenderDevice).
    pub(crate) fn new(device: Arc<RenderDevice>, descriptor: RenderTargetDesc) -> Self {
        Self { device, descriptor }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// Get the target size.
    pub fn size(&self) -> Extent2d {
        self.descriptor.size
    }

    /// Get the target format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// Get the debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("size", &self.descriptor.size)
            .field("format", &self.descriptor.format)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

/// A depth/stencil texture.
///
/// Depth stencils are created by [`RenderDevice::create_depth_stencil`]. A
/// depth stencil created with [`DepthUsage::ShadowSampled`] can additionally
/// be bound as a shader resource by a later pass.
pub struct DepthStencil {
    device: Arc<RenderDevice>,
    descriptor: DepthStencilDesc,
}

impl DepthStencil {
    /// Create a new depth stencil (called by RenderDevice).
    pub(crate) fn new(device: Arc<RenderDevice>, descriptor: DepthStencilDesc) -> Self {
        Self { device, descriptor }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// Get the texture size.
    pub fn size(&self) -> Extent2d {
        self.descriptor.size
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// How the texture is consumed after depth rendering.
    pub fn usage(&self) -> DepthUsage {
        self.descriptor.usage
    }

    /// Get the debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for DepthStencil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepthStencil")
            .field("size", &self.descriptor.size)
            .field("format", &self.descriptor.format)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Shared across passes, must stay thread-safe.
static_assertions::assert_impl_all!(RenderTarget: Send, Sync);
static_assertions::assert_impl_all!(DepthStencil: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Arc<RenderDevice> {
        RenderDevice::new()
    }

    #[test]
    fn test_render_target_accessors() {
        let device = create_test_device();
        let rt = device
            .create_render_target(
                &RenderTargetDesc::new(1920, 1080, TextureFormat::Bgra8Unorm)
                    .with_label("backBuffer"),
            )
            .unwrap();

        assert_eq!(rt.size(), Extent2d::new(1920, 1080));
        assert_eq!(rt.format(), TextureFormat::Bgra8Unorm);
        assert_eq!(rt.label(), Some("backBuffer"));
    }

    #[test]
    fn test_depth_stencil_shadow_usage() {
        let device = create_test_device();
        let ds = device
            .create_depth_stencil(
                &DepthStencilDesc::new(1024, 1024, TextureFormat::Depth32Float)
                    .with_usage(DepthUsage::ShadowSampled)
                    .with_label("shadowDepth"),
            )
            .unwrap();

        assert_eq!(ds.usage(), DepthUsage::ShadowSampled);
        assert!(ds.format().is_depth());
    }

    #[test]
    fn test_debug_output() {
        let device = create_test_device();
        let rt = device
            .create_render_target(&RenderTargetDesc::new(64, 64, TextureFormat::Rgba8Unorm))
            .unwrap();
        let debug = format!("{rt:?}");
        assert!(debug.contains("RenderTarget"));
        assert!(debug.contains("Rgba8Unorm"));
    }
}
