//! Typed pass ports.
//!
//! Each pass declares named inputs and outputs. An output exposes a resource
//! slot; an input names a target output and, when the graph links them, binds
//! the producer's slot into its own. Slots are shared so a pass observes the
//! resource its port received without a second lookup.

use std::sync::{Arc, RwLock};

use crate::error::GraphError;
use crate::graph::name::{validate_identifier, TargetRef};
use crate::resources::{Resource, ResourceKind};

/// Storage cell a port exposes or fills.
///
/// A slot is shared between the port and the pass that reads from it, so
/// linking an input updates everything that holds the slot.
pub type ResourceSlot = Arc<RwLock<Option<Resource>>>;

/// Create an unfilled slot.
pub fn empty_slot() -> ResourceSlot {
    Arc::new(RwLock::new(None))
}

/// Create a slot holding a resource.
pub fn filled_slot(resource: Resource) -> ResourceSlot {
    Arc::new(RwLock::new(Some(resource)))
}

/// How many consumers an output accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSharing {
    /// The output hands over its resource once; a second claim is an error.
    Exclusive,
    /// The output may be claimed by any number of inputs.
    Shared,
}

/// A named output port of a pass.
#[derive(Debug)]
pub struct PassOutput {
    name: String,
    kind: ResourceKind,
    slot: ResourceSlot,
    sharing: OutputSharing,
    consumed: bool,
}

impl PassOutput {
    /// Create an exclusive output over the given slot.
    pub fn exclusive(
        name: impl Into<String>,
        kind: ResourceKind,
        slot: ResourceSlot,
    ) -> Result<Self, GraphError> {
        Self::new(name.into(), kind, slot, OutputSharing::Exclusive)
    }

    /// Create a shared output over the given slot.
    pub fn shared(
        name: impl Into<String>,
        kind: ResourceKind,
        slot: ResourceSlot,
    ) -> Result<Self, GraphError> {
        Self::new(name.into(), kind, slot, OutputSharing::Shared)
    }

    fn new(
        name: String,
        kind: ResourceKind,
        slot: ResourceSlot,
        sharing: OutputSharing,
    ) -> Result<Self, GraphError> {
        validate_identifier(&name)?;
        Ok(Self {
            name,
            kind,
            slot,
            sharing,
            consumed: false,
        })
    }

    /// Get the port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the resource kind this output produces.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Get the backing slot.
    pub fn slot(&self) -> &ResourceSlot {
        &self.slot
    }

    /// Get the sharing mode.
    pub fn sharing(&self) -> OutputSharing {
        self.sharing
    }

    /// Check whether a claim would succeed, without consuming anything.
    ///
    /// Used to pre-flight a whole batch of links before the first claim, so
    /// a failure partway through the batch leaves no output consumed.
    pub fn can_acquire(&self, pass: &str) -> Result<(), GraphError> {
        if self.sharing == OutputSharing::Exclusive && self.consumed {
            return Err(GraphError::OutputBoundTwice {
                pass: pass.to_string(),
                output: self.name.clone(),
            });
        }
        if self.slot.read().unwrap().is_none() {
            return Err(GraphError::EmptyOutput {
                pass: pass.to_string(),
                output: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Claim the output's resource for a consumer.
    ///
    /// `pass` names the owning pass for error reporting. Exclusive outputs
    /// fail on the second claim; an output whose slot is still empty fails
    /// for any claim.
    pub fn acquire(&mut self, pass: &str) -> Result<Resource, GraphError> {
        if self.sharing == OutputSharing::Exclusive && self.consumed {
            return Err(GraphError::OutputBoundTwice {
                pass: pass.to_string(),
                output: self.name.clone(),
            });
        }
        let resource = self
            .slot
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| GraphError::EmptyOutput {
                pass: pass.to_string(),
                output: self.name.clone(),
            })?;
        self.consumed = true;
        Ok(resource)
    }

    /// Check that the output holds a resource.
    pub fn validate(&self, pass: &str) -> Result<(), GraphError> {
        if self.slot.read().unwrap().is_some() {
            Ok(())
        } else {
            Err(GraphError::EmptyOutput {
                pass: pass.to_string(),
                output: self.name.clone(),
            })
        }
    }
}

/// A named input port of a pass.
#[derive(Debug)]
pub struct PassInput {
    name: String,
    kind: ResourceKind,
    slot: ResourceSlot,
    target: Option<TargetRef>,
    linked: bool,
}

impl PassInput {
    /// Create an input filling the given slot when linked.
    pub fn new(
        name: impl Into<String>,
        kind: ResourceKind,
        slot: ResourceSlot,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self {
            name,
            kind,
            slot,
            target: None,
            linked: false,
        })
    }

    /// Get the port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the resource kind this input accepts.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Get the wiring target, if one was set.
    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    /// Set the output this input should be linked to.
    pub fn set_target(&mut self, target: TargetRef) {
        self.target = Some(target);
    }

    /// Whether the input has been linked to a producing output.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Bind the producing output's resource into this input's slot.
    ///
    /// The kind check runs before the claim, so a mismatch leaves both the
    /// input unlinked and the output unconsumed. `owner` and `producer` name
    /// the two passes for error reporting.
    pub fn bind(
        &mut self,
        owner: &str,
        producer: &str,
        output: &mut PassOutput,
    ) -> Result<(), GraphError> {
        if output.kind() != self.kind {
            return Err(GraphError::KindMismatch {
                input: format!("{owner}.{}", self.name),
                output: format!("{producer}.{}", output.name()),
                expected: self.kind,
                found: output.kind(),
            });
        }
        let resource = output.acquire(producer)?;
        log::trace!(
            "Linking {owner}.{} to {producer}.{} ({})",
            self.name,
            output.name(),
            resource.label()
        );
        *self.slot.write().unwrap() = Some(resource);
        self.linked = true;
        Ok(())
    }

    /// Check that the input has been linked.
    pub fn validate(&self, pass: &str) -> Result<(), GraphError> {
        if self.linked {
            Ok(())
        } else {
            Err(GraphError::UnlinkedInput {
                pass: pass.to_string(),
                input: self.name.clone(),
            })
        }
    }

    /// Get the bound resource, if the input is linked.
    pub fn resource(&self) -> Option<Resource> {
        self.slot.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RenderDevice;
    use crate::types::{RenderTargetDesc, TextureFormat};

    fn test_target() -> Resource {
        let device = RenderDevice::new();
        device
            .create_render_target(&RenderTargetDesc::new(64, 64, TextureFormat::Rgba8Unorm))
            .unwrap()
            .into()
    }

    #[test]
    fn test_exclusive_output_single_claim() {
        let mut output =
            PassOutput::exclusive("renderTarget", ResourceKind::RenderTarget, filled_slot(test_target()))
                .unwrap();

        assert!(output.acquire("clear").is_ok());
        assert_eq!(
            output.acquire("clear"),
            Err(GraphError::OutputBoundTwice {
                pass: "clear".to_string(),
                output: "renderTarget".to_string(),
            })
        );
    }

    #[test]
    fn test_shared_output_many_claims() {
        let mut output =
            PassOutput::shared("rasterizer", ResourceKind::RenderTarget, filled_slot(test_target()))
                .unwrap();

        let first = output.acquire("a").unwrap();
        let second = output.acquire("b").unwrap();
        assert!(first.ptr_eq(&second));
        assert!(output.acquire("c").is_ok());
    }

    #[test]
    fn test_empty_output_claim_fails() {
        let mut output =
            PassOutput::exclusive("renderTarget", ResourceKind::RenderTarget, empty_slot())
                .unwrap();
        assert!(matches!(
            output.acquire("clear"),
            Err(GraphError::EmptyOutput { .. })
        ));
    }

    #[test]
    fn test_bind_fills_input_slot() {
        let resource = test_target();
        let mut output = PassOutput::exclusive(
            "renderTarget",
            ResourceKind::RenderTarget,
            filled_slot(resource.clone()),
        )
        .unwrap();
        let slot = empty_slot();
        let mut input = PassInput::new("buffer", ResourceKind::RenderTarget, slot.clone()).unwrap();

        input.bind("phong", "clear", &mut output).unwrap();

        assert!(input.is_linked());
        let bound = slot.read().unwrap().clone().unwrap();
        assert!(bound.ptr_eq(&resource));
    }

    #[test]
    fn test_kind_mismatch_leaves_both_sides_untouched() {
        let mut output = PassOutput::exclusive(
            "renderTarget",
            ResourceKind::RenderTarget,
            filled_slot(test_target()),
        )
        .unwrap();
        let mut input =
            PassInput::new("depthStencil", ResourceKind::DepthStencil, empty_slot()).unwrap();

        let err = input.bind("phong", "clear", &mut output).unwrap_err();
        assert!(matches!(err, GraphError::KindMismatch { .. }));

        // Failed bind consumes nothing; the output is still claimable.
        assert!(!input.is_linked());
        assert!(output.acquire("clear").is_ok());
    }

    #[test]
    fn test_port_names_validated() {
        assert!(PassOutput::exclusive("1bad", ResourceKind::Buffer, empty_slot()).is_err());
        assert!(PassInput::new("also bad", ResourceKind::Buffer, empty_slot()).is_err());
    }

    #[test]
    fn test_unlinked_input_fails_validation() {
        let input = PassInput::new("buffer", ResourceKind::RenderTarget, empty_slot()).unwrap();
        assert_eq!(
            input.validate("phong"),
            Err(GraphError::UnlinkedInput {
                pass: "phong".to_string(),
                input: "buffer".to_string(),
            })
        );
    }
}
