//! GPU resource types shared between passes.
//!
//! Resources form a closed polymorphic set: every value that can travel
//! through a pass port is one of the [`Resource`] variants, and every port
//! carries a [`ResourceKind`] tag that is checked before a binding is
//! accepted. The tag check replaces runtime downcasting while keeping the
//! same fail-fast contract.

mod buffer;
mod component;
mod shader;
mod texture;

use std::sync::Arc;

pub use buffer::Buffer;
pub use component::Component;
pub use shader::Shader;
pub use texture::{DepthStencil, RenderTarget};

/// Discriminant of the closed resource-type set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    RenderTarget,
    DepthStencil,
    Shader,
    Buffer,
    Component,
}

/// A shared reference to one GPU resource.
///
/// Cloning is cheap (reference-counted); the underlying resource lives as
/// long as its longest-lived holder among the graph globals, the passes and
/// the drawable objects.
#[derive(Debug, Clone)]
pub enum Resource {
    RenderTarget(Arc<RenderTarget>),
    DepthStencil(Arc<DepthStencil>),
    Shader(Arc<Shader>),
    Buffer(Arc<Buffer>),
    Component(Arc<Component>),
}

impl Resource {
    /// Get the kind tag of this resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::RenderTarget(_) => ResourceKind::RenderTarget,
            Self::DepthStencil(_) => ResourceKind::DepthStencil,
            Self::Shader(_) => ResourceKind::Shader,
            Self::Buffer(_) => ResourceKind::Buffer,
            Self::Component(_) => ResourceKind::Component,
        }
    }

    /// Get the debug label of the underlying resource.
    pub fn label(&self) -> &str {
        match self {
            Self::RenderTarget(r) => r.label().unwrap_or("unnamed"),
            Self::DepthStencil(r) => r.label().unwrap_or("unnamed"),
            Self::Shader(r) => r.label().unwrap_or("unnamed"),
            Self::Buffer(r) => r.label().unwrap_or("unnamed"),
            Self::Component(r) => r.label().unwrap_or("unnamed"),
        }
    }

    /// Whether two resource references point at the same underlying resource.
    ///
    /// This is also the [`PartialEq`] notion for `Resource`: resources are
    /// equal when they are the same reference-counted allocation.
    pub fn ptr_eq(&self, other: &Resource) -> bool {
        match (self, other) {
            (Self::RenderTarget(a), Self::RenderTarget(b)) => Arc::ptr_eq(a, b),
            (Self::DepthStencil(a), Self::DepthStencil(b)) => Arc::ptr_eq(a, b),
            (Self::Shader(a), Self::Shader(b)) => Arc::ptr_eq(a, b),
            (Self::Buffer(a), Self::Buffer(b)) => Arc::ptr_eq(a, b),
            (Self::Component(a), Self::Component(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Get the render target, if this resource is one.
    pub fn as_render_target(&self) -> Option<&Arc<RenderTarget>> {
        if let Self::RenderTarget(r) = self {
            Some(r)
        } else {
            None
        }
    }

    /// Get the depth stencil, if this resource is one.
    pub fn as_depth_stencil(&self) -> Option<&Arc<DepthStencil>> {
        if let Self::DepthStencil(r) = self {
            Some(r)
        } else {
            None
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl From<Arc<RenderTarget>> for Resource {
    fn from(value: Arc<RenderTarget>) -> Self {
        Self::RenderTarget(value)
    }
}

impl From<Arc<DepthStencil>> for Resource {
    fn from(value: Arc<DepthStencil>) -> Self {
        Self::DepthStencil(value)
    }
}

impl From<Arc<Shader>> for Resource {
    fn from(value: Arc<Shader>) -> Self {
        Self::Shader(value)
    }
}

impl From<Arc<Buffer>> for Resource {
    fn from(value: Arc<Buffer>) -> Self {
        Self::Buffer(value)
    }
}

impl From<Arc<Component>> for Resource {
    fn from(value: Arc<Component>) -> Self {
        Self::Component(value)
    }
}
