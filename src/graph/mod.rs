//! The render graph.
//!
//! A [`RenderGraph`] owns an ordered list of passes and the frame-global
//! resources they start from. Passes are linked as they are added: every
//! input wired to a `pass.output` target must name a global output or an
//! output of an earlier pass, so execution in registration order always runs
//! producers before consumers. After [`RenderGraph::validate`] the topology
//! is frozen; per-frame work is then execute, present, reset.

mod name;
mod pass;
pub mod passes;
mod port;

use std::sync::Arc;

pub use name::{validate_identifier, TargetRef, GLOBAL_PASS};
pub use pass::{Pass, PassStage, QueueConfig};
pub use port::{empty_slot, filled_slot, OutputSharing, PassInput, PassOutput, ResourceSlot};

use crate::device::RenderDevice;
use crate::error::{DeviceError, Error, GraphError};
use crate::queue::{RenderQueue, Task};
use crate::resources::{Resource, ResourceKind};
use crate::types::{DepthStencilDesc, Extent2d, RenderTargetDesc, TextureFormat};

/// Stable index of a pass inside one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassHandle(u32);

impl PassHandle {
    /// Get the pass index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

fn find_output<'a>(
    global_outputs: &'a mut [PassOutput],
    passes: &'a mut [Pass],
    target: &TargetRef,
) -> Option<&'a mut PassOutput> {
    if target.is_global() {
        global_outputs
            .iter_mut()
            .find(|o| o.name() == target.output)
    } else {
        passes
            .iter_mut()
            .find(|p| p.name() == target.pass)?
            .output_mut(&target.output)
    }
}

fn find_output_ref<'a>(
    global_outputs: &'a [PassOutput],
    passes: &'a [Pass],
    target: &TargetRef,
) -> Option<&'a PassOutput> {
    if target.is_global() {
        global_outputs.iter().find(|o| o.name() == target.output)
    } else {
        passes
            .iter()
            .find(|p| p.name() == target.pass)?
            .output(&target.output)
    }
}

/// Frame orchestrator.
pub struct RenderGraph {
    device: Arc<RenderDevice>,
    extent: Extent2d,
    passes: Vec<Pass>,
    global_outputs: Vec<PassOutput>,
    global_inputs: Vec<PassInput>,
    validated: bool,
}

impl RenderGraph {
    /// Create an empty graph owning a back buffer and a master depth stencil
    /// sized to `extent`.
    ///
    /// Both are exposed as the global outputs `$.backBuffer` and
    /// `$.masterDepth`; the global input `$.backBuffer` must be wired to the
    /// output that ends up holding the finished frame.
    pub fn new(device: &Arc<RenderDevice>, extent: Extent2d) -> Result<Self, Error> {
        let back_buffer = device.create_render_target(
            &RenderTargetDesc::new(extent.width, extent.height, TextureFormat::Bgra8Unorm)
                .with_label("backBuffer"),
        )?;
        let master_depth = device.create_depth_stencil(
            &DepthStencilDesc::new(extent.width, extent.height, TextureFormat::Depth24PlusStencil8)
                .with_label("masterDepth"),
        )?;

        let global_outputs = vec![
            PassOutput::exclusive(
                "backBuffer",
                ResourceKind::RenderTarget,
                filled_slot(back_buffer.into()),
            )?,
            PassOutput::exclusive(
                "masterDepth",
                ResourceKind::DepthStencil,
                filled_slot(master_depth.into()),
            )?,
        ];
        let global_inputs = vec![PassInput::new(
            "backBuffer",
            ResourceKind::RenderTarget,
            empty_slot(),
        )?];

        Ok(Self {
            device: device.clone(),
            extent,
            passes: Vec::new(),
            global_outputs,
            global_inputs,
            validated: false,
        })
    }

    /// Get the device this graph records into.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// Get the frame extent.
    pub fn extent(&self) -> Extent2d {
        self.extent
    }

    /// Number of registered passes.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Get a pass by name.
    pub fn pass(&self, name: &str) -> Option<&Pass> {
        self.passes.iter().find(|p| p.name() == name)
    }

    /// Get the draw queue of the named pass, if it has one.
    pub fn queue(&self, name: &str) -> Option<&RenderQueue> {
        self.pass(name)?.queue()
    }

    /// Get the resource wired to the global `backBuffer` input. Empty until
    /// validation links the global inputs.
    pub fn back_buffer(&self) -> Option<Resource> {
        self.global_inputs
            .iter()
            .find(|i| i.name() == "backBuffer")
            .and_then(|i| i.resource())
    }

    /// Get a graph-owned resource by global output name.
    pub fn global_resource(&self, name: &str) -> Option<Resource> {
        self.global_outputs
            .iter()
            .find(|o| o.name() == name)
            .and_then(|o| o.slot().read().unwrap().clone())
    }

    /// Expose an additional graph-owned resource as `$.<name>`.
    pub fn add_global_output(&mut self, output: PassOutput) -> Result<(), GraphError> {
        if self.validated {
            return Err(GraphError::AlreadyValidated);
        }
        if self.global_outputs.iter().any(|o| o.name() == output.name()) {
            return Err(GraphError::DuplicatePort {
                pass: GLOBAL_PASS.to_string(),
                port: output.name().to_string(),
            });
        }
        self.global_outputs.push(output);
        Ok(())
    }

    /// Register a pass and link its wired inputs.
    ///
    /// Every wired input must resolve against the global outputs or the
    /// outputs of passes added before this one; a forward or dangling
    /// reference fails and leaves the graph unchanged.
    pub fn add_pass(&mut self, mut pass: Pass) -> Result<PassHandle, GraphError> {
        if self.validated {
            return Err(GraphError::AlreadyValidated);
        }
        if self.passes.iter().any(|p| p.name() == pass.name()) {
            return Err(GraphError::DuplicatePass {
                name: pass.name().to_string(),
            });
        }

        // Two-phase linking: pre-flight every wired input first, so a failure
        // on a later input has not already claimed an earlier producer.
        let pass_name = pass.name().to_string();
        let mut exclusive_claims: Vec<TargetRef> = Vec::new();
        for input in pass.inputs() {
            let Some(target) = input.target() else {
                continue;
            };
            let output = find_output_ref(&self.global_outputs, &self.passes, target)
                .ok_or_else(|| GraphError::UnresolvedInput {
                    pass: pass_name.clone(),
                    input: input.name().to_string(),
                    target_pass: target.pass.clone(),
                    target_output: target.output.clone(),
                })?;
            if output.kind() != input.kind() {
                return Err(GraphError::KindMismatch {
                    input: format!("{pass_name}.{}", input.name()),
                    output: format!("{}.{}", target.pass, output.name()),
                    expected: input.kind(),
                    found: output.kind(),
                });
            }
            output.can_acquire(&target.pass)?;
            if output.sharing() == OutputSharing::Exclusive {
                if exclusive_claims.contains(target) {
                    return Err(GraphError::OutputBoundTwice {
                        pass: target.pass.clone(),
                        output: target.output.clone(),
                    });
                }
                exclusive_claims.push(target.clone());
            }
        }
        for input in pass.inputs_mut() {
            let Some(target) = input.target().cloned() else {
                continue;
            };
            let output = find_output(&mut self.global_outputs, &mut self.passes, &target)
                .ok_or_else(|| GraphError::UnresolvedInput {
                    pass: pass_name.clone(),
                    input: input.name().to_string(),
                    target_pass: target.pass.clone(),
                    target_output: target.output.clone(),
                })?;
            input.bind(&pass_name, &target.pass, output)?;
        }

        log::info!("Registered pass `{pass_name}`");
        let handle = PassHandle(self.passes.len() as u32);
        self.passes.push(pass);
        Ok(handle)
    }

    /// Wire a global input to a `pass.output` target. The link is made
    /// during validation, once all producers exist.
    pub fn set_global_input_source(&mut self, input: &str, target: &str) -> Result<(), GraphError> {
        let target = TargetRef::parse(target)?;
        let port = self
            .global_inputs
            .iter_mut()
            .find(|i| i.name() == input)
            .ok_or_else(|| GraphError::UnknownPort {
                pass: GLOBAL_PASS.to_string(),
                port: input.to_string(),
            })?;
        port.set_target(target);
        Ok(())
    }

    /// Link the global inputs and check every port of every pass. Freezes
    /// the topology on success; calling twice is an error.
    pub fn validate(&mut self) -> Result<(), GraphError> {
        if self.validated {
            return Err(GraphError::AlreadyValidated);
        }

        let mut global_inputs = std::mem::take(&mut self.global_inputs);
        let mut link_result = Ok(());
        for input in &mut global_inputs {
            let Some(target) = input.target().cloned() else {
                continue;
            };
            link_result = match find_output(&mut self.global_outputs, &mut self.passes, &target) {
                Some(output) => input.bind(GLOBAL_PASS, &target.pass, output),
                None => Err(GraphError::UnresolvedInput {
                    pass: GLOBAL_PASS.to_string(),
                    input: input.name().to_string(),
                    target_pass: target.pass.clone(),
                    target_output: target.output.clone(),
                }),
            };
            if link_result.is_err() {
                break;
            }
        }
        self.global_inputs = global_inputs;
        link_result?;

        for pass in &self.passes {
            pass.validate()?;
        }
        for input in &self.global_inputs {
            input.validate(GLOBAL_PASS)?;
        }

        self.validated = true;
        log::info!("Validated render graph with {} passes", self.passes.len());
        Ok(())
    }

    /// Whether the graph has been validated.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Record one frame in pass registration order.
    pub fn execute(&mut self) -> Result<(), DeviceError> {
        assert!(
            self.validated,
            "render graph must be validated before execution"
        );
        for pass in &self.passes {
            pass.execute(&self.device);
        }
        Ok(())
    }

    /// Drop all per-frame state accumulated in the queues.
    pub fn reset(&mut self) {
        assert!(
            self.validated,
            "render graph must be validated before reset"
        );
        for pass in &mut self.passes {
            pass.reset();
        }
    }

    /// Record, present and reset one frame.
    pub fn run_frame(&mut self) -> Result<(), DeviceError> {
        self.execute()?;
        self.device.present()?;
        self.reset();
        Ok(())
    }

    /// Get the draw queue of the named queue pass, mutably.
    pub fn render_queue_mut(&mut self, name: &str) -> Result<&mut RenderQueue, GraphError> {
        let pass = self
            .passes
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| GraphError::UnknownPass {
                name: name.to_string(),
            })?;
        pass.queue_mut().ok_or_else(|| GraphError::NotAQueuePass {
            name: name.to_string(),
        })
    }

    /// Resolve a queue pass name to its handle.
    pub fn queue_pass_handle(&self, name: &str) -> Result<PassHandle, GraphError> {
        let index = self
            .passes
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| GraphError::UnknownPass {
                name: name.to_string(),
            })?;
        if !self.passes[index].is_queue() {
            return Err(GraphError::NotAQueuePass {
                name: name.to_string(),
            });
        }
        Ok(PassHandle(index as u32))
    }

    pub(crate) fn push_task(&mut self, handle: PassHandle, task: Task) {
        match self.passes.get_mut(handle.index()).and_then(Pass::queue_mut) {
            Some(queue) => queue.accept(task),
            None => unreachable!("pass handles resolve only to queue passes"),
        }
    }

    /// Build the standard frame topology.
    ///
    /// Clear, shadow map, main shading, skybox and the two outline passes,
    /// wired back buffer in, back buffer out.
    pub fn standard(device: &Arc<RenderDevice>, extent: Extent2d) -> Result<Self, Error> {
        use crate::types::{ComponentDesc, RasterizerDesc};

        let mut graph = Self::new(device, extent)?;

        let rasterizer = device.create_component(
            ComponentDesc::Rasterizer(RasterizerDesc::shadow(40, 2.0, 0.1)),
            Some("shadowRasterizer".to_string()),
        )?;
        graph.add_global_output(PassOutput::shared(
            "shadowRasterizer",
            ResourceKind::Component,
            filled_slot(rasterizer.into()),
        )?)?;

        let mut clear = passes::clear("clear", [0.07, 0.0, 0.12, 1.0], 1.0)?;
        clear.set_input_source("renderTarget", "$.backBuffer")?;
        clear.set_input_source("depthStencil", "$.masterDepth")?;
        graph.add_pass(clear)?;

        let mut shadow = passes::shadow_map(device, "shadowMap", 1024)?;
        shadow.set_input_source("rasterizer", "$.shadowRasterizer")?;
        graph.add_pass(shadow)?;

        let mut phong = passes::phong("phong")?;
        phong.set_input_source("renderTarget", "clear.renderTarget")?;
        phong.set_input_source("depthStencil", "clear.depthStencil")?;
        phong.set_input_source("shadowMap", "shadowMap.map")?;
        graph.add_pass(phong)?;

        let mut skybox = passes::skybox(device, "skybox")?;
        skybox.set_input_source("renderTarget", "phong.renderTarget")?;
        skybox.set_input_source("depthStencil", "phong.depthStencil")?;
        graph.add_pass(skybox)?;

        let mut mask = passes::outline_mask(device, "outlineMask")?;
        mask.set_input_source("depthStencil", "skybox.depthStencil")?;
        graph.add_pass(mask)?;

        let mut draw = passes::outline_draw(device, "outlineDraw")?;
        draw.set_input_source("renderTarget", "skybox.renderTarget")?;
        draw.set_input_source("depthStencil", "outlineMask.depthStencil")?;
        graph.add_pass(draw)?;

        graph.set_global_input_source("backBuffer", "outlineDraw.renderTarget")?;
        graph.validate()?;
        Ok(graph)
    }

    /// Build the frame topology with blurred outlines.
    ///
    /// Like [`RenderGraph::standard`] up to the outline mask, then the
    /// silhouettes are drawn offscreen, blurred in two separable passes
    /// sharing the `$.blurKernel` weights, and composited through the
    /// stencil mask.
    pub fn blur_outline(device: &Arc<RenderDevice>, extent: Extent2d) -> Result<Self, Error> {
        use crate::types::{BufferDesc, BufferUsage, ComponentDesc, RasterizerDesc};

        let mut graph = Self::new(device, extent)?;

        let rasterizer = device.create_component(
            ComponentDesc::Rasterizer(RasterizerDesc::shadow(40, 2.0, 0.1)),
            Some("shadowRasterizer".to_string()),
        )?;
        graph.add_global_output(PassOutput::shared(
            "shadowRasterizer",
            ResourceKind::Component,
            filled_slot(rasterizer.into()),
        )?)?;

        let kernel = device.create_buffer(
            &BufferDesc::new(256, BufferUsage::CONSTANT).with_label("blurKernel"),
        )?;
        graph.add_global_output(PassOutput::shared(
            "blurKernel",
            ResourceKind::Buffer,
            filled_slot(kernel.into()),
        )?)?;

        let mut clear = passes::clear("clear", [0.07, 0.0, 0.12, 1.0], 1.0)?;
        clear.set_input_source("renderTarget", "$.backBuffer")?;
        clear.set_input_source("depthStencil", "$.masterDepth")?;
        graph.add_pass(clear)?;

        let mut shadow = passes::shadow_map(device, "shadowMap", 1024)?;
        shadow.set_input_source("rasterizer", "$.shadowRasterizer")?;
        graph.add_pass(shadow)?;

        let mut phong = passes::phong("phong")?;
        phong.set_input_source("renderTarget", "clear.renderTarget")?;
        phong.set_input_source("depthStencil", "clear.depthStencil")?;
        phong.set_input_source("shadowMap", "shadowMap.map")?;
        graph.add_pass(phong)?;

        let mut skybox = passes::skybox(device, "skybox")?;
        skybox.set_input_source("renderTarget", "phong.renderTarget")?;
        skybox.set_input_source("depthStencil", "phong.depthStencil")?;
        graph.add_pass(skybox)?;

        let mut mask = passes::outline_mask(device, "outlineMask")?;
        mask.set_input_source("depthStencil", "skybox.depthStencil")?;
        graph.add_pass(mask)?;

        graph.add_pass(passes::outline_source(device, "outlineDraw", extent)?)?;

        let mut horizontal = passes::blur_horizontal(device, "blurHorizontal", extent)?;
        horizontal.set_input_source("source", "outlineDraw.renderTarget")?;
        horizontal.set_input_source("kernel", "$.blurKernel")?;
        graph.add_pass(horizontal)?;

        let mut vertical = passes::blur_vertical(device, "blurVertical")?;
        vertical.set_input_source("source", "blurHorizontal.renderTarget")?;
        vertical.set_input_source("kernel", "$.blurKernel")?;
        vertical.set_input_source("renderTarget", "skybox.renderTarget")?;
        vertical.set_input_source("depthStencil", "outlineMask.depthStencil")?;
        graph.add_pass(vertical)?;

        graph.set_global_input_source("backBuffer", "blurVertical.renderTarget")?;
        graph.validate()?;
        Ok(graph)
    }
}

impl std::fmt::Debug for RenderGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderGraph")
            .field("passes", &self.passes)
            .field("validated", &self.validated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Command;

    fn test_device() -> Arc<RenderDevice> {
        RenderDevice::new()
    }

    #[test]
    fn test_duplicate_pass_leaves_graph_unchanged() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();
        graph
            .add_pass(passes::clear("clear", [0.0; 4], 1.0).unwrap())
            .unwrap();
        assert_eq!(graph.pass_count(), 1);

        let err = graph
            .add_pass(passes::clear("clear", [0.0; 4], 1.0).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicatePass {
                name: "clear".to_string(),
            }
        );
        assert_eq!(graph.pass_count(), 1);
    }

    #[test]
    fn test_forward_reference_fails() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();

        let mut phong = passes::phong("phong").unwrap();
        phong
            .set_input_source("renderTarget", "clear.renderTarget")
            .unwrap();
        let err = graph.add_pass(phong).unwrap_err();
        assert!(matches!(err, GraphError::UnresolvedInput { .. }));
        assert_eq!(graph.pass_count(), 0);
    }

    #[test]
    fn test_add_after_validate_fails() {
        let device = test_device();
        let mut graph = RenderGraph::standard(&device, Extent2d::new(64, 64)).unwrap();

        let err = graph
            .add_pass(passes::clear("clear2", [0.0; 4], 1.0).unwrap())
            .unwrap_err();
        assert_eq!(err, GraphError::AlreadyValidated);

        let mut other = RenderGraph::standard(&device, Extent2d::new(64, 64)).unwrap();
        assert_eq!(other.validate(), Err(GraphError::AlreadyValidated));
    }

    #[test]
    fn test_standard_topology_builds() {
        let device = test_device();
        let graph = RenderGraph::standard(&device, Extent2d::new(1920, 1080)).unwrap();

        assert!(graph.is_validated());
        assert_eq!(graph.pass_count(), 6);
        for name in ["clear", "shadowMap", "phong", "skybox", "outlineMask", "outlineDraw"] {
            assert!(graph.pass(name).is_some(), "missing pass {name}");
        }
    }

    #[test]
    fn test_back_buffer_flows_through_the_frame() {
        let device = test_device();
        let graph = RenderGraph::standard(&device, Extent2d::new(64, 64)).unwrap();

        // The target cleared first and the one presented last are the same
        // texture, threaded through every drawing pass in between.
        let global = graph.global_resource("backBuffer").unwrap();
        let final_product = graph.back_buffer().unwrap();
        assert!(global.ptr_eq(&final_product));

        let cleared = graph
            .pass("clear")
            .unwrap()
            .input("renderTarget")
            .unwrap()
            .resource()
            .unwrap();
        assert!(global.ptr_eq(&cleared));
    }

    #[test]
    fn test_blur_outline_topology_builds() {
        let device = test_device();
        let graph = RenderGraph::blur_outline(&device, Extent2d::new(64, 64)).unwrap();

        assert_eq!(graph.pass_count(), 9);
        let kernel = graph.global_resource("blurKernel").unwrap();
        let horizontal = graph
            .pass("blurHorizontal")
            .unwrap()
            .input("kernel")
            .unwrap()
            .resource()
            .unwrap();
        let vertical = graph
            .pass("blurVertical")
            .unwrap()
            .input("kernel")
            .unwrap()
            .resource()
            .unwrap();
        assert!(kernel.ptr_eq(&horizontal));
        assert!(kernel.ptr_eq(&vertical));
    }

    #[test]
    #[should_panic(expected = "must be validated")]
    fn test_execute_before_validate_panics() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();
        let _ = graph.execute();
    }

    #[test]
    #[should_panic(expected = "must be validated")]
    fn test_reset_before_validate_panics() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();
        graph.reset();
    }

    #[test]
    fn test_failed_link_consumes_no_producer_output() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();

        let mut clear = passes::clear("clear", [0.0; 4], 1.0).unwrap();
        clear
            .set_input_source("renderTarget", "$.backBuffer")
            .unwrap();
        clear
            .set_input_source("depthStencil", "$.masterDepth")
            .unwrap();
        graph.add_pass(clear).unwrap();

        // First input resolves, second dangles. The whole link must fail
        // without claiming the resolvable producer.
        let mut broken = Pass::new(
            "broken",
            PassStage::Clear {
                color: [0.0; 4],
                depth: 1.0,
            },
        )
        .unwrap();
        broken
            .register_input(
                PassInput::new("renderTarget", ResourceKind::RenderTarget, empty_slot()).unwrap(),
            )
            .unwrap();
        broken
            .register_input(
                PassInput::new("depthStencil", ResourceKind::DepthStencil, empty_slot()).unwrap(),
            )
            .unwrap();
        broken
            .set_input_source("renderTarget", "clear.renderTarget")
            .unwrap();
        broken
            .set_input_source("depthStencil", "ghost.depthStencil")
            .unwrap();

        let err = graph.add_pass(broken).unwrap_err();
        assert!(matches!(err, GraphError::UnresolvedInput { .. }));
        assert_eq!(graph.pass_count(), 1);

        // A corrected consumer still claims the exclusive output.
        let mut fixed = Pass::new(
            "fixed",
            PassStage::Clear {
                color: [0.0; 4],
                depth: 1.0,
            },
        )
        .unwrap();
        fixed
            .register_input(
                PassInput::new("renderTarget", ResourceKind::RenderTarget, empty_slot()).unwrap(),
            )
            .unwrap();
        fixed
            .set_input_source("renderTarget", "clear.renderTarget")
            .unwrap();
        graph.add_pass(fixed).unwrap();
    }

    #[test]
    fn test_one_pass_cannot_claim_an_exclusive_output_twice() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();

        let mut clear = passes::clear("clear", [0.0; 4], 1.0).unwrap();
        clear
            .set_input_source("renderTarget", "$.backBuffer")
            .unwrap();
        clear
            .set_input_source("depthStencil", "$.masterDepth")
            .unwrap();
        graph.add_pass(clear).unwrap();

        let mut greedy = Pass::new(
            "greedy",
            PassStage::Clear {
                color: [0.0; 4],
                depth: 1.0,
            },
        )
        .unwrap();
        for name in ["first", "second"] {
            greedy
                .register_input(
                    PassInput::new(name, ResourceKind::RenderTarget, empty_slot()).unwrap(),
                )
                .unwrap();
            greedy
                .set_input_source(name, "clear.renderTarget")
                .unwrap();
        }

        let err = graph.add_pass(greedy).unwrap_err();
        assert_eq!(
            err,
            GraphError::OutputBoundTwice {
                pass: "clear".to_string(),
                output: "renderTarget".to_string(),
            }
        );
        assert_eq!(graph.pass_count(), 1);
    }

    #[test]
    fn test_unlinked_input_fails_validation() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();
        graph
            .add_pass(passes::phong("phong").unwrap())
            .unwrap();

        let err = graph.validate().unwrap_err();
        assert!(matches!(err, GraphError::UnlinkedInput { .. }));
    }

    #[test]
    fn test_exclusive_global_output_claimed_once() {
        let device = test_device();
        let mut graph = RenderGraph::new(&device, Extent2d::new(64, 64)).unwrap();

        let mut first = passes::clear("clear", [0.0; 4], 1.0).unwrap();
        first
            .set_input_source("renderTarget", "$.backBuffer")
            .unwrap();
        first
            .set_input_source("depthStencil", "$.masterDepth")
            .unwrap();
        graph.add_pass(first).unwrap();

        let mut second = passes::clear("clearAgain", [0.0; 4], 1.0).unwrap();
        second
            .set_input_source("renderTarget", "$.backBuffer")
            .unwrap();
        let err = graph.add_pass(second).unwrap_err();
        assert_eq!(
            err,
            GraphError::OutputBoundTwice {
                pass: GLOBAL_PASS.to_string(),
                output: "backBuffer".to_string(),
            }
        );
    }

    #[test]
    fn test_run_frame_presents_and_resets() {
        let device = test_device();
        let mut graph = RenderGraph::standard(&device, Extent2d::new(64, 64)).unwrap();

        graph.run_frame().unwrap();
        assert!(matches!(
            device.commands().last(),
            Some(Command::Present)
        ));

        device.mark_removed(0x887A0005);
        assert_eq!(
            graph.run_frame(),
            Err(DeviceError::DeviceRemoved { code: 0x887A0005 })
        );
    }
}
