//! Render passes.
//!
//! A pass owns its ports, the target slots it draws into and the resources it
//! binds before drawing. What a pass actually does each frame is selected by
//! its [`PassStage`]; the surrounding port plumbing is identical for all
//! stages.

use crate::device::{Command, RenderDevice};
use crate::error::GraphError;
use crate::graph::name::{validate_identifier, TargetRef};
use crate::graph::port::{PassInput, PassOutput, ResourceSlot};
use crate::queue::RenderQueue;

/// Frame-time behaviour of a pass.
#[derive(Debug)]
pub enum PassStage {
    /// Clear the bound targets and produce them unchanged.
    Clear { color: [f32; 4], depth: f32 },
    /// Issue one fixed draw covering the bound target.
    FullScreen { index_count: u32 },
    /// Drain an accumulated queue of draw tasks.
    Queue {
        queue: RenderQueue,
        config: QueueConfig,
    },
}

/// Per-pass tweaks applied around queue draining.
#[derive(Debug, Default)]
pub struct QueueConfig {
    /// Clear the bound depth stencil before drawing. Used by the shadow pass,
    /// which renders depth into a target no clear pass touches.
    pub clear_depth_first: bool,
    /// Unbind this pixel-shader resource slot before binding targets. A
    /// texture cannot be simultaneously read and rendered into.
    pub unbind_slot: Option<u32>,
}

/// A named node of the render graph.
pub struct Pass {
    name: String,
    inputs: Vec<PassInput>,
    outputs: Vec<PassOutput>,
    render_target: Option<ResourceSlot>,
    depth_stencil: Option<ResourceSlot>,
    bindables: Vec<ResourceSlot>,
    shader_resource_inputs: Vec<(String, u32)>,
    stage: PassStage,
}

impl Pass {
    /// Create an empty pass with the given stage.
    pub fn new(name: impl Into<String>, stage: PassStage) -> Result<Self, GraphError> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self {
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
            render_target: None,
            depth_stencil: None,
            bindables: Vec::new(),
            shader_resource_inputs: Vec::new(),
            stage,
        })
    }

    /// Get the pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the frame-time stage.
    pub fn stage(&self) -> &PassStage {
        &self.stage
    }

    /// Whether this pass drains a draw queue.
    pub fn is_queue(&self) -> bool {
        matches!(self.stage, PassStage::Queue { .. })
    }

    /// Register an input port. Port names must be unique per pass.
    pub fn register_input(&mut self, input: PassInput) -> Result<(), GraphError> {
        if self.inputs.iter().any(|i| i.name() == input.name()) {
            return Err(GraphError::DuplicatePort {
                pass: self.name.clone(),
                port: input.name().to_string(),
            });
        }
        self.inputs.push(input);
        Ok(())
    }

    /// Register an output port. Port names must be unique per pass.
    pub fn register_output(&mut self, output: PassOutput) -> Result<(), GraphError> {
        if self.outputs.iter().any(|o| o.name() == output.name()) {
            return Err(GraphError::DuplicatePort {
                pass: self.name.clone(),
                port: output.name().to_string(),
            });
        }
        self.outputs.push(output);
        Ok(())
    }

    /// Wire an input to a `pass.output` target.
    pub fn set_input_source(&mut self, input: &str, target: &str) -> Result<(), GraphError> {
        let target = TargetRef::parse(target)?;
        let port = self
            .inputs
            .iter_mut()
            .find(|i| i.name() == input)
            .ok_or_else(|| GraphError::UnknownPort {
                pass: self.name.clone(),
                port: input.to_string(),
            })?;
        port.set_target(target);
        Ok(())
    }

    /// Set the slot this pass renders color into.
    pub fn set_render_target(&mut self, slot: ResourceSlot) {
        self.render_target = Some(slot);
    }

    /// Set the slot this pass uses for depth and stencil.
    pub fn set_depth_stencil(&mut self, slot: ResourceSlot) {
        self.depth_stencil = Some(slot);
    }

    /// Add a slot whose resource is bound before every draw of this pass.
    pub fn add_bindable(&mut self, slot: ResourceSlot) {
        self.bindables.push(slot);
    }

    /// Bind the named input's resource to a pixel-shader resource slot
    /// before drawing. Each input may be routed to one slot only.
    pub fn bind_input_to_slot(&mut self, input: &str, slot: u32) -> Result<(), GraphError> {
        if !self.inputs.iter().any(|i| i.name() == input) {
            return Err(GraphError::UnknownPort {
                pass: self.name.clone(),
                port: input.to_string(),
            });
        }
        if self.shader_resource_inputs.iter().any(|(name, _)| name == input) {
            return Err(GraphError::DuplicatePort {
                pass: self.name.clone(),
                port: input.to_string(),
            });
        }
        self.shader_resource_inputs.push((input.to_string(), slot));
        Ok(())
    }

    /// Get an input port by name.
    pub fn input(&self, name: &str) -> Option<&PassInput> {
        self.inputs.iter().find(|i| i.name() == name)
    }

    /// Get an input port by name, mutably.
    pub fn input_mut(&mut self, name: &str) -> Option<&mut PassInput> {
        self.inputs.iter_mut().find(|i| i.name() == name)
    }

    /// Get an output port by name.
    pub fn output(&self, name: &str) -> Option<&PassOutput> {
        self.outputs.iter().find(|o| o.name() == name)
    }

    /// Get an output port by name, mutably.
    pub fn output_mut(&mut self, name: &str) -> Option<&mut PassOutput> {
        self.outputs.iter_mut().find(|o| o.name() == name)
    }

    /// Iterate the input ports in registration order.
    pub fn inputs(&self) -> impl Iterator<Item = &PassInput> {
        self.inputs.iter()
    }

    pub(crate) fn inputs_mut(&mut self) -> impl Iterator<Item = &mut PassInput> {
        self.inputs.iter_mut()
    }

    /// Iterate the output ports in registration order.
    pub fn outputs(&self) -> impl Iterator<Item = &PassOutput> {
        self.outputs.iter()
    }

    /// Get the draw queue of a queue pass.
    pub fn queue(&self) -> Option<&RenderQueue> {
        match &self.stage {
            PassStage::Queue { queue, .. } => Some(queue),
            _ => None,
        }
    }

    /// Get the draw queue of a queue pass, mutably.
    pub fn queue_mut(&mut self) -> Option<&mut RenderQueue> {
        match &mut self.stage {
            PassStage::Queue { queue, .. } => Some(queue),
            _ => None,
        }
    }

    /// Check that every port is satisfied and drawing passes have targets.
    pub fn validate(&self) -> Result<(), GraphError> {
        for input in &self.inputs {
            input.validate(&self.name)?;
        }
        for output in &self.outputs {
            output.validate(&self.name)?;
        }
        let draws = matches!(
            self.stage,
            PassStage::FullScreen { .. } | PassStage::Queue { .. }
        );
        if draws && !self.has_filled_slot() {
            return Err(GraphError::MissingTargets {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    fn has_filled_slot(&self) -> bool {
        let filled = |slot: &Option<ResourceSlot>| {
            slot.as_ref()
                .is_some_and(|s| s.read().unwrap().is_some())
        };
        filled(&self.render_target) || filled(&self.depth_stencil)
    }

    /// Record this pass's commands for the current frame.
    pub fn execute(&self, device: &RenderDevice) {
        log::trace!("Executing pass `{}`", self.name);
        match &self.stage {
            PassStage::Clear { color, depth } => self.record_clears(device, *color, *depth),
            PassStage::FullScreen { index_count } => {
                self.bind(device, &QueueConfig::default());
                device.record(Command::DrawIndexed {
                    index_count: *index_count,
                });
            }
            PassStage::Queue { queue, config } => {
                self.bind(device, config);
                queue.execute(device);
            }
        }
    }

    /// Drop per-frame state so the next frame starts empty.
    pub fn reset(&mut self) {
        if let PassStage::Queue { queue, .. } = &mut self.stage {
            queue.reset();
        }
    }

    fn record_clears(&self, device: &RenderDevice, color: [f32; 4], depth: f32) {
        if let Some(label) = Self::slot_label(&self.render_target) {
            device.record(Command::ClearTarget {
                label,
                value: crate::types::ClearValue::Color(color),
            });
        }
        if let Some(label) = Self::slot_label(&self.depth_stencil) {
            device.record(Command::ClearDepth { label, depth });
        }
    }

    fn bind(&self, device: &RenderDevice, config: &QueueConfig) {
        if let Some(slot) = config.unbind_slot {
            device.record(Command::UnbindShaderResource { slot });
        }
        if config.clear_depth_first {
            if let Some(label) = Self::slot_label(&self.depth_stencil) {
                device.record(Command::ClearDepth { label, depth: 1.0 });
            }
        }
        device.record(Command::BindTargets {
            render_target: Self::slot_label(&self.render_target),
            depth_stencil: Self::slot_label(&self.depth_stencil),
        });
        for slot in &self.bindables {
            if let Some(resource) = slot.read().unwrap().as_ref() {
                device.record(Command::BindResource {
                    kind: resource.kind(),
                    label: resource.label().to_string(),
                });
            }
        }
        for (input, slot) in &self.shader_resource_inputs {
            let resource = self.input(input).and_then(|i| i.resource());
            if let Some(resource) = resource {
                device.record(Command::BindShaderResource {
                    slot: *slot,
                    label: resource.label().to_string(),
                });
            }
        }
    }

    fn slot_label(slot: &Option<ResourceSlot>) -> Option<String> {
        slot.as_ref()
            .and_then(|s| s.read().unwrap().as_ref().map(|r| r.label().to_string()))
    }
}

impl std::fmt::Debug for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pass")
            .field("name", &self.name)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}
