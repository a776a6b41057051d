//! Graphics device collaborator.
//!
//! The device creates resources and records the commands that passes and
//! draw tasks issue during a frame. Recording instead of submitting keeps the
//! frame orchestration observable: tests inspect the command log to verify
//! ordering, binding and draw counts without a GPU.

use std::sync::{Arc, RwLock, Weak};

use crate::error::DeviceError;
use crate::resources::{Buffer, Component, DepthStencil, RenderTarget, ResourceKind, Shader};
use crate::types::{
    BufferDesc, ClearValue, ComponentDesc, DepthStencilDesc, RenderTargetDesc, ShaderDesc,
};

/// One recorded device command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Output-merger targets were bound for a pass.
    BindTargets {
        render_target: Option<String>,
        depth_stencil: Option<String>,
    },
    /// A pipeline resource (shader, buffer, state component) was bound.
    BindResource { kind: ResourceKind, label: String },
    /// A texture was bound to a pixel-shader resource slot.
    BindShaderResource { slot: u32, label: String },
    /// A pixel-shader resource slot was cleared.
    UnbindShaderResource { slot: u32 },
    /// A render target was cleared.
    ClearTarget { label: String, value: ClearValue },
    /// A depth stencil was cleared.
    ClearDepth { label: String, depth: f32 },
    /// An indexed draw was issued.
    DrawIndexed { index_count: u32 },
    /// The frame was presented.
    Present,
}

/// The graphics device.
///
/// Resource creation returns reference-counted handles; the device keeps weak
/// references for leak diagnostics. All state is behind locks so a device can
/// be shared across threads.
pub struct RenderDevice {
    commands: RwLock<Vec<Command>>,
    removed: RwLock<Option<u32>>,
    render_targets: RwLock<Vec<Weak<RenderTarget>>>,
    depth_stencils: RwLock<Vec<Weak<DepthStencil>>>,
    buffers: RwLock<Vec<Weak<Buffer>>>,
    shaders: RwLock<Vec<Weak<Shader>>>,
    components: RwLock<Vec<Weak<Component>>>,
}

impl RenderDevice {
    /// Create a new device.
    pub fn new() -> Arc<Self> {
        log::info!("Creating render device");
        Arc::new(Self {
            commands: RwLock::new(Vec::new()),
            removed: RwLock::new(None),
            render_targets: RwLock::new(Vec::new()),
            depth_stencils: RwLock::new(Vec::new()),
            buffers: RwLock::new(Vec::new()),
            shaders: RwLock::new(Vec::new()),
            components: RwLock::new(Vec::new()),
        })
    }

    /// Create a render-target texture.
    pub fn create_render_target(
        self: &Arc<Self>,
        descriptor: &RenderTargetDesc,
    ) -> Result<Arc<RenderTarget>, DeviceError> {
        if descriptor.size.width == 0 || descriptor.size.height == 0 {
            return Err(DeviceError::InvalidDescriptor(format!(
                "render target extent {}x{} must be non-zero",
                descriptor.size.width, descriptor.size.height
            )));
        }
        if descriptor.format.is_depth() {
            return Err(DeviceError::InvalidDescriptor(
                "render target cannot use a depth format".to_string(),
            ));
        }
        log::trace!(
            "Creating render target {:?} ({}x{})",
            descriptor.label,
            descriptor.size.width,
            descriptor.size.height
        );
        let target = Arc::new(RenderTarget::new(self.clone(), descriptor.clone()));
        self.render_targets
            .write()
            .unwrap()
            .push(Arc::downgrade(&target));
        Ok(target)
    }

    /// Create a depth-stencil texture.
    pub fn create_depth_stencil(
        self: &Arc<Self>,
        descriptor: &DepthStencilDesc,
    ) -> Result<Arc<DepthStencil>, DeviceError> {
        if descriptor.size.width == 0 || descriptor.size.height == 0 {
            return Err(DeviceError::InvalidDescriptor(format!(
                "depth stencil extent {}x{} must be non-zero",
                descriptor.size.width, descriptor.size.height
            )));
        }
        if !descriptor.format.is_depth() {
            return Err(DeviceError::InvalidDescriptor(
                "depth stencil requires a depth format".to_string(),
            ));
        }
        log::trace!(
            "Creating depth stencil {:?} ({}x{})",
            descriptor.label,
            descriptor.size.width,
            descriptor.size.height
        );
        let texture = Arc::new(DepthStencil::new(self.clone(), descriptor.clone()));
        self.depth_stencils
            .write()
            .unwrap()
            .push(Arc::downgrade(&texture));
        Ok(texture)
    }

    /// Create a GPU buffer.
    pub fn create_buffer(
        self: &Arc<Self>,
        descriptor: &BufferDesc,
    ) -> Result<Arc<Buffer>, DeviceError> {
        if descriptor.size == 0 {
            return Err(DeviceError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        log::trace!(
            "Creating buffer {:?} ({} bytes)",
            descriptor.label,
            descriptor.size
        );
        let buffer = Arc::new(Buffer::new(self.clone(), descriptor.clone()));
        self.buffers.write().unwrap().push(Arc::downgrade(&buffer));
        Ok(buffer)
    }

    /// Create a compiled shader.
    pub fn create_shader(
        self: &Arc<Self>,
        descriptor: &ShaderDesc,
    ) -> Result<Arc<Shader>, DeviceError> {
        if descriptor.entry_point.is_empty() {
            return Err(DeviceError::InvalidDescriptor(
                "shader entry point must be non-empty".to_string(),
            ));
        }
        log::trace!(
            "Creating {:?} shader `{}`",
            descriptor.stage,
            descriptor.entry_point
        );
        let shader = Arc::new(Shader::new(self.clone(), descriptor.clone()));
        self.shaders.write().unwrap().push(Arc::downgrade(&shader));
        Ok(shader)
    }

    /// Create a fixed-function state component.
    pub fn create_component(
        self: &Arc<Self>,
        descriptor: ComponentDesc,
        label: Option<String>,
    ) -> Result<Arc<Component>, DeviceError> {
        log::trace!("Creating {} component {:?}", descriptor.class(), label);
        let component = Arc::new(Component::new(self.clone(), descriptor, label));
        self.components
            .write()
            .unwrap()
            .push(Arc::downgrade(&component));
        Ok(component)
    }

    /// Record one command into the frame log.
    pub(crate) fn record(&self, command: Command) {
        log::trace!("Recording {command:?}");
        self.commands.write().unwrap().push(command);
    }

    /// Get a snapshot of the recorded commands.
    pub fn commands(&self) -> Vec<Command> {
        self.commands.read().unwrap().clone()
    }

    /// Number of indexed draws recorded since the last clear.
    pub fn draw_count(&self) -> usize {
        self.commands
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Command::DrawIndexed { .. }))
            .count()
    }

    /// Discard the recorded commands.
    pub fn clear_commands(&self) {
        self.commands.write().unwrap().clear();
    }

    /// Present the frame.
    ///
    /// Fails with [`DeviceError::DeviceRemoved`] once the device has been
    /// lost; the graph propagates this to abort rendering.
    pub fn present(&self) -> Result<(), DeviceError> {
        if let Some(code) = *self.removed.read().unwrap() {
            return Err(DeviceError::DeviceRemoved { code });
        }
        self.record(Command::Present);
        Ok(())
    }

    /// Simulate device loss with the given native error code.
    pub fn mark_removed(&self, code: u32) {
        log::warn!("Device removed (code {code:#010x})");
        *self.removed.write().unwrap() = Some(code);
    }

    /// Number of resources still alive on this device.
    pub fn alive_resource_count(&self) -> usize {
        self.render_targets
            .read()
            .unwrap()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
            + self
                .depth_stencils
                .read()
                .unwrap()
                .iter()
                .filter(|w| w.strong_count() > 0)
                .count()
            + self
                .buffers
                .read()
                .unwrap()
                .iter()
                .filter(|w| w.strong_count() > 0)
                .count()
            + self
                .shaders
                .read()
                .unwrap()
                .iter()
                .filter(|w| w.strong_count() > 0)
                .count()
            + self
                .components
                .read()
                .unwrap()
                .iter()
                .filter(|w| w.strong_count() > 0)
                .count()
    }

    /// Drop tracking entries for resources that no longer exist.
    pub fn cleanup_dead_resources(&self) {
        self.render_targets
            .write()
            .unwrap()
            .retain(|w| w.strong_count() > 0);
        self.depth_stencils
            .write()
            .unwrap()
            .retain(|w| w.strong_count() > 0);
        self.buffers.write().unwrap().retain(|w| w.strong_count() > 0);
        self.shaders.write().unwrap().retain(|w| w.strong_count() > 0);
        self.components
            .write()
            .unwrap()
            .retain(|w| w.strong_count() > 0);
    }
}

impl std::fmt::Debug for RenderDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDevice")
            .field("commands", &self.commands.read().unwrap().len())
            .field("removed", &*self.removed.read().unwrap())
            .finish()
    }
}

static_assertions::assert_impl_all!(RenderDevice: Send, Sync);
