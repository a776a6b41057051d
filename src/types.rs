//! Descriptors and fixed-function state types.
//!
//! This module contains the plain-data types used to describe GPU resources
//! and the closed set of fixed-function modes the pass variants configure.

// ============================================================================
// Common
// ============================================================================

/// 2D extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent2d {
    pub width: u32,
    pub height: u32,
}

impl Extent2d {
    /// Create a new extent.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Clear value for an attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// RGBA color clear.
    Color([f32; 4]),
    /// Depth clear.
    Depth(f32),
}

impl ClearValue {
    /// Create a color clear value.
    pub fn color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::Color([r, g, b, a])
    }

    /// Create a depth clear value.
    pub fn depth(depth: f32) -> Self {
        Self::Depth(depth)
    }
}

/// Texture format for render targets and depth buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Bgra8Unorm,
    Rgba16Float,
    Depth24PlusStencil8,
    Depth32Float,
}

impl TextureFormat {
    /// Whether this is a depth or depth/stencil format.
    pub fn is_depth(self) -> bool {
        matches!(self, Self::Depth24PlusStencil8 | Self::Depth32Float)
    }
}

bitflags::bitflags! {
    /// How a buffer may be bound to the pipeline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const VERTEX   = 1 << 0;
        const INDEX    = 1 << 1;
        const CONSTANT = 1 << 2;
    }
}

/// Pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

// ============================================================================
// Fixed-function modes
// ============================================================================

/// Output blend mode configured by a pass or a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// No blending, source overwrites destination.
    #[default]
    Opaque,
    /// Standard source-alpha blending.
    Alpha,
    /// Additive blending.
    Additive,
}

/// Stencil mode configured by a pass or a step.
///
/// `Write` tags covered pixels, `Mask` discards pixels carrying the tag; the
/// outline passes use the pair to draw silhouettes around geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilMode {
    #[default]
    Off,
    Write,
    Mask,
}

/// Rasterizer state description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerDesc {
    /// Disable back-face culling.
    pub two_sided: bool,
    /// Constant depth bias, used by shadow rendering to avoid acne.
    pub depth_bias: i32,
    /// Slope-scaled depth bias.
    pub slope_bias: f32,
    /// Clamp applied to the total bias.
    pub bias_clamp: f32,
}

impl Default for RasterizerDesc {
    fn default() -> Self {
        Self {
            two_sided: false,
            depth_bias: 0,
            slope_bias: 0.0,
            bias_clamp: 0.0,
        }
    }
}

impl RasterizerDesc {
    /// Rasterizer state for shadow-map rendering with depth biasing.
    pub fn shadow(depth_bias: i32, slope_bias: f32, bias_clamp: f32) -> Self {
        Self {
            two_sided: false,
            depth_bias,
            slope_bias,
            bias_clamp,
        }
    }

    /// Two-sided rasterizer state (no culling).
    pub fn two_sided() -> Self {
        Self {
            two_sided: true,
            ..Self::default()
        }
    }
}

/// Sampler filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerFilter {
    Point,
    #[default]
    Linear,
    Anisotropic,
}

// ============================================================================
// Resource descriptors
// ============================================================================

/// Descriptor for a render-target texture.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDesc {
    pub label: Option<String>,
    pub size: Extent2d,
    pub format: TextureFormat,
}

impl RenderTargetDesc {
    /// Create a new render-target descriptor.
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            label: None,
            size: Extent2d::new(width, height),
            format,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// How a depth-stencil texture will be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthUsage {
    /// Regular depth/stencil attachment.
    #[default]
    DepthStencil,
    /// Depth-only attachment that is later sampled as a shadow map.
    ShadowSampled,
}

/// Descriptor for a depth-stencil texture.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthStencilDesc {
    pub label: Option<String>,
    pub size: Extent2d,
    pub format: TextureFormat,
    pub usage: DepthUsage,
}

impl DepthStencilDesc {
    /// Create a new depth-stencil descriptor.
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            label: None,
            size: Extent2d::new(width, height),
            format,
            usage: DepthUsage::DepthStencil,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark the texture as a shadow map sampled by later passes.
    pub fn with_usage(mut self, usage: DepthUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Descriptor for a GPU buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDesc {
    pub label: Option<String>,
    pub size: u64,
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// Create a new buffer descriptor.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            label: None,
            size,
            usage,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Descriptor for a compiled shader.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDesc {
    pub label: Option<String>,
    pub stage: ShaderStage,
    pub entry_point: String,
}

impl ShaderDesc {
    /// Create a vertex shader descriptor.
    pub fn vertex(entry_point: impl Into<String>) -> Self {
        Self {
            label: None,
            stage: ShaderStage::Vertex,
            entry_point: entry_point.into(),
        }
    }

    /// Create a pixel shader descriptor.
    pub fn pixel(entry_point: impl Into<String>) -> Self {
        Self {
            label: None,
            stage: ShaderStage::Pixel,
            entry_point: entry_point.into(),
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Descriptor for a shader-bindable fixed-function component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentDesc {
    Rasterizer(RasterizerDesc),
    Blend(BlendMode),
    Stencil(StencilMode),
    Sampler(SamplerFilter),
}

impl ComponentDesc {
    /// Short name of the component class, used in labels and logs.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Rasterizer(_) => "rasterizer",
            Self::Blend(_) => "blend",
            Self::Stencil(_) => "stencil",
            Self::Sampler(_) => "sampler",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_value_constructors() {
        assert_eq!(
            ClearValue::color(0.0, 0.5, 1.0, 1.0),
            ClearValue::Color([0.0, 0.5, 1.0, 1.0])
        );
        assert_eq!(ClearValue::depth(1.0), ClearValue::Depth(1.0));
    }

    #[test]
    fn test_depth_formats() {
        assert!(TextureFormat::Depth32Float.is_depth());
        assert!(TextureFormat::Depth24PlusStencil8.is_depth());
        assert!(!TextureFormat::Rgba8Unorm.is_depth());
    }

    #[test]
    fn test_buffer_usage_flags() {
        let usage = BufferUsage::VERTEX | BufferUsage::INDEX;
        assert!(usage.contains(BufferUsage::VERTEX));
        assert!(!usage.contains(BufferUsage::CONSTANT));
    }

    #[test]
    fn test_shadow_rasterizer() {
        let desc = RasterizerDesc::shadow(40, 2.0, 0.1);
        assert_eq!(desc.depth_bias, 40);
        assert!(!desc.two_sided);
        assert_eq!(RasterizerDesc::two_sided().two_sided, true);
    }

    #[test]
    fn test_descriptor_labels() {
        let desc = RenderTargetDesc::new(1920, 1080, TextureFormat::Bgra8Unorm)
            .with_label("backBuffer");
        assert_eq!(desc.label.as_deref(), Some("backBuffer"));
        assert_eq!(desc.size, Extent2d::new(1920, 1080));

        let desc = BufferDesc::new(256, BufferUsage::CONSTANT).with_label("blurKernel");
        assert_eq!(desc.size, 256);
        assert_eq!(desc.label.as_deref(), Some("blurKernel"));
    }

    #[test]
    fn test_component_class_names() {
        assert_eq!(
            ComponentDesc::Stencil(StencilMode::Write).class(),
            "stencil"
        );
        assert_eq!(
            ComponentDesc::Rasterizer(RasterizerDesc::default()).class(),
            "rasterizer"
        );
    }
}
