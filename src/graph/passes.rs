//! Built-in pass constructors.
//!
//! These build the passes the standard topologies are assembled from. Each
//! constructor declares the ports and bindables of one pass; wiring the ports
//! is left to the caller.
//!
//! Passes that both consume and produce a target register the input and the
//! output over the same slot, so linking the input fills the output in the
//! same motion and downstream consumers see the identical resource.

use std::sync::Arc;

use crate::device::RenderDevice;
use crate::error::Error;
use crate::graph::pass::{Pass, PassStage, QueueConfig};
use crate::graph::port::{empty_slot, filled_slot, PassInput, PassOutput, ResourceSlot};
use crate::queue::RenderQueue;
use crate::resources::ResourceKind;
use crate::types::{
    ComponentDesc, DepthStencilDesc, DepthUsage, Extent2d, RasterizerDesc, RenderTargetDesc,
    StencilMode, TextureFormat,
};

/// Texture slot the shadow map occupies in shading passes.
pub const SHADOW_MAP_SLOT: u32 = 3;

/// Texture slot full-screen effects read their source from.
pub const FULLSCREEN_SOURCE_SLOT: u32 = 0;

const FULLSCREEN_INDEX_COUNT: u32 = 6;
const SKYBOX_INDEX_COUNT: u32 = 14;

fn passthrough_render_target(pass: &mut Pass) -> Result<ResourceSlot, Error> {
    let slot = empty_slot();
    pass.register_input(PassInput::new(
        "renderTarget",
        ResourceKind::RenderTarget,
        slot.clone(),
    )?)?;
    pass.register_output(PassOutput::exclusive(
        "renderTarget",
        ResourceKind::RenderTarget,
        slot.clone(),
    )?)?;
    pass.set_render_target(slot.clone());
    Ok(slot)
}

fn passthrough_depth_stencil(pass: &mut Pass) -> Result<ResourceSlot, Error> {
    let slot = empty_slot();
    pass.register_input(PassInput::new(
        "depthStencil",
        ResourceKind::DepthStencil,
        slot.clone(),
    )?)?;
    pass.register_output(PassOutput::exclusive(
        "depthStencil",
        ResourceKind::DepthStencil,
        slot.clone(),
    )?)?;
    pass.set_depth_stencil(slot.clone());
    Ok(slot)
}

/// Clear pass. Consumes a render target and a depth stencil, clears both and
/// produces them unchanged.
pub fn clear(name: &str, color: [f32; 4], depth: f32) -> Result<Pass, Error> {
    let mut pass = Pass::new(name, PassStage::Clear { color, depth })?;
    passthrough_render_target(&mut pass)?;
    passthrough_depth_stencil(&mut pass)?;
    Ok(pass)
}

/// Shadow-map pass. Owns a depth-only texture it renders scene depth into
/// from the light's point of view, produced as `map` for shading passes to
/// sample. Claims a rasterizer with depth biasing through the `rasterizer`
/// input.
pub fn shadow_map(device: &Arc<RenderDevice>, name: &str, size: u32) -> Result<Pass, Error> {
    let depth = device.create_depth_stencil(
        &DepthStencilDesc::new(size, size, TextureFormat::Depth32Float)
            .with_usage(DepthUsage::ShadowSampled)
            .with_label("shadowDepth"),
    )?;
    let slot = filled_slot(depth.into());

    let mut pass = Pass::new(
        name,
        PassStage::Queue {
            queue: RenderQueue::default(),
            config: QueueConfig {
                clear_depth_first: true,
                unbind_slot: Some(SHADOW_MAP_SLOT),
            },
        },
    )?;
    pass.register_output(PassOutput::exclusive(
        "map",
        ResourceKind::DepthStencil,
        slot.clone(),
    )?)?;
    pass.set_depth_stencil(slot);

    let rasterizer_slot = empty_slot();
    pass.register_input(PassInput::new(
        "rasterizer",
        ResourceKind::Component,
        rasterizer_slot.clone(),
    )?)?;
    pass.add_bindable(rasterizer_slot);
    Ok(pass)
}

/// Main shading pass. Draws queued geometry into the frame targets with the
/// shadow map bound for sampling.
pub fn phong(name: &str) -> Result<Pass, Error> {
    let mut pass = Pass::new(
        name,
        PassStage::Queue {
            queue: RenderQueue::default(),
            config: QueueConfig::default(),
        },
    )?;
    passthrough_render_target(&mut pass)?;
    passthrough_depth_stencil(&mut pass)?;
    pass.register_input(PassInput::new(
        "shadowMap",
        ResourceKind::DepthStencil,
        empty_slot(),
    )?)?;
    pass.bind_input_to_slot("shadowMap", SHADOW_MAP_SLOT)?;
    Ok(pass)
}

/// Skybox pass. One fixed draw of a cube triangle strip behind all geometry,
/// rasterized two-sided since the camera sits inside the cube.
pub fn skybox(device: &Arc<RenderDevice>, name: &str) -> Result<Pass, Error> {
    let rasterizer = device.create_component(
        ComponentDesc::Rasterizer(RasterizerDesc::two_sided()),
        Some("skyboxRasterizer".to_string()),
    )?;

    let mut pass = Pass::new(
        name,
        PassStage::FullScreen {
            index_count: SKYBOX_INDEX_COUNT,
        },
    )?;
    passthrough_render_target(&mut pass)?;
    passthrough_depth_stencil(&mut pass)?;
    pass.add_bindable(filled_slot(rasterizer.into()));
    Ok(pass)
}

/// Outline mask pass. Draws queued silhouettes into the stencil buffer only.
pub fn outline_mask(device: &Arc<RenderDevice>, name: &str) -> Result<Pass, Error> {
    let stencil = device.create_component(
        ComponentDesc::Stencil(StencilMode::Write),
        Some("outlineWriteStencil".to_string()),
    )?;

    let mut pass = Pass::new(
        name,
        PassStage::Queue {
            queue: RenderQueue::default(),
            config: QueueConfig::default(),
        },
    )?;
    passthrough_depth_stencil(&mut pass)?;
    pass.add_bindable(filled_slot(stencil.into()));
    Ok(pass)
}

/// Outline draw pass. Draws queued silhouettes into the frame target wherever
/// the mask pass did not tag pixels.
pub fn outline_draw(device: &Arc<RenderDevice>, name: &str) -> Result<Pass, Error> {
    let stencil = device.create_component(
        ComponentDesc::Stencil(StencilMode::Mask),
        Some("outlineMaskStencil".to_string()),
    )?;

    let mut pass = Pass::new(
        name,
        PassStage::Queue {
            queue: RenderQueue::default(),
            config: QueueConfig::default(),
        },
    )?;
    passthrough_render_target(&mut pass)?;
    passthrough_depth_stencil(&mut pass)?;
    pass.add_bindable(filled_slot(stencil.into()));
    Ok(pass)
}

/// Offscreen variant of the outline draw pass. Owns a scratch target the
/// silhouettes are drawn into so a blur can read them back.
pub fn outline_source(
    device: &Arc<RenderDevice>,
    name: &str,
    extent: Extent2d,
) -> Result<Pass, Error> {
    let scratch = device.create_render_target(
        &RenderTargetDesc::new(extent.width, extent.height, TextureFormat::Rgba8Unorm)
            .with_label("outlineScratch"),
    )?;
    let slot = filled_slot(scratch.into());

    let mut pass = Pass::new(
        name,
        PassStage::Queue {
            queue: RenderQueue::default(),
            config: QueueConfig::default(),
        },
    )?;
    pass.register_output(PassOutput::exclusive(
        "renderTarget",
        ResourceKind::RenderTarget,
        slot.clone(),
    )?)?;
    pass.set_render_target(slot);
    Ok(pass)
}

/// Horizontal half of the separable blur. Owns a scratch target and reads its
/// source texture and kernel weights through input ports.
pub fn blur_horizontal(
    device: &Arc<RenderDevice>,
    name: &str,
    extent: Extent2d,
) -> Result<Pass, Error> {
    let scratch = device.create_render_target(
        &RenderTargetDesc::new(extent.width, extent.height, TextureFormat::Rgba8Unorm)
            .with_label("blurScratch"),
    )?;
    let slot = filled_slot(scratch.into());

    let mut pass = full_screen(name)?;
    pass.register_output(PassOutput::exclusive(
        "renderTarget",
        ResourceKind::RenderTarget,
        slot.clone(),
    )?)?;
    pass.set_render_target(slot);
    Ok(pass)
}

/// Vertical half of the separable blur. Composites the blurred silhouette
/// onto the frame target through the outline stencil mask.
pub fn blur_vertical(device: &Arc<RenderDevice>, name: &str) -> Result<Pass, Error> {
    let stencil = device.create_component(
        ComponentDesc::Stencil(StencilMode::Mask),
        Some("outlineMaskStencil".to_string()),
    )?;

    let mut pass = full_screen(name)?;
    passthrough_render_target(&mut pass)?;
    passthrough_depth_stencil(&mut pass)?;
    pass.add_bindable(filled_slot(stencil.into()));
    Ok(pass)
}

/// Bare full-screen pass: a `source` texture, a `kernel` constant buffer and
/// one quad draw. Target ports are added by the callers.
pub fn full_screen(name: &str) -> Result<Pass, Error> {
    let mut pass = Pass::new(
        name,
        PassStage::FullScreen {
            index_count: FULLSCREEN_INDEX_COUNT,
        },
    )?;
    pass.register_input(PassInput::new(
        "source",
        ResourceKind::RenderTarget,
        empty_slot(),
    )?)?;
    pass.bind_input_to_slot("source", FULLSCREEN_SOURCE_SLOT)?;

    let kernel_slot = empty_slot();
    pass.register_input(PassInput::new(
        "kernel",
        ResourceKind::Buffer,
        kernel_slot.clone(),
    )?)?;
    pass.add_bindable(kernel_slot);
    Ok(pass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_aliases_input_and_output() {
        let device = RenderDevice::new();
        let rt = device
            .create_render_target(&RenderTargetDesc::new(8, 8, TextureFormat::Rgba8Unorm))
            .unwrap();
        let mut pass = clear("clear", [0.0; 4], 1.0).unwrap();
        assert_eq!(pass.inputs().count(), 2);
        assert_eq!(pass.outputs().count(), 2);

        // Linking the input fills the aliased output in the same motion.
        let mut producer = PassOutput::exclusive(
            "renderTarget",
            ResourceKind::RenderTarget,
            filled_slot(rt.into()),
        )
        .unwrap();
        pass.input_mut("renderTarget")
            .unwrap()
            .bind("clear", "$", &mut producer)
            .unwrap();

        let claimed = pass
            .output_mut("renderTarget")
            .unwrap()
            .acquire("clear")
            .unwrap();
        let via_input = pass.input("renderTarget").unwrap().resource().unwrap();
        assert!(claimed.ptr_eq(&via_input));
    }

    #[test]
    fn test_shadow_map_owns_its_depth() {
        let device = RenderDevice::new();
        let pass = shadow_map(&device, "shadowMap", 1024).unwrap();

        let map = pass.output("map").unwrap();
        let resource = map.slot().read().unwrap().clone().unwrap();
        let depth = resource.as_depth_stencil().unwrap();
        assert_eq!(depth.usage(), DepthUsage::ShadowSampled);
        assert_eq!(depth.size(), Extent2d::new(1024, 1024));
    }

    #[test]
    fn test_phong_binds_shadow_map_slot() {
        let pass = phong("phong").unwrap();
        assert!(pass.input("shadowMap").is_some());
        assert!(pass.input("renderTarget").is_some());
        assert!(pass.output("depthStencil").is_some());
    }

    #[test]
    fn test_outline_mask_has_no_color_target() {
        let device = RenderDevice::new();
        let pass = outline_mask(&device, "outlineMask").unwrap();
        assert!(pass.input("renderTarget").is_none());
        assert!(pass.input("depthStencil").is_some());
    }
}
