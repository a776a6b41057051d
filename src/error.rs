//! Error types for graph construction and frame execution.
//!
//! The split follows the failure taxonomy of the engine: everything that can
//! go wrong while *describing* a frame (bad names, broken wiring, unlinked
//! ports) is a [`GraphError`] and aborts graph construction; everything that
//! can go wrong while *running* a frame is a [`DeviceError`] surfaced by the
//! device collaborator.

use thiserror::Error;

use crate::resources::ResourceKind;

/// Setup-time errors raised while building, linking or validating a graph.
///
/// These indicate a programming error in the pass topology definition and are
/// not recoverable for that graph instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A name does not match identifier syntax (`[A-Za-z_][A-Za-z0-9_]*`).
    #[error("invalid identifier `{name}`")]
    InvalidName { name: String },

    /// A pass with the same name is already registered in the graph.
    #[error("pass `{name}` is already registered")]
    DuplicatePass { name: String },

    /// A port with the same name is already registered on the pass.
    #[error("port `{port}` is already registered on pass `{pass}`")]
    DuplicatePort { pass: String, port: String },

    /// Port lookup by name failed.
    #[error("pass `{pass}` has no port named `{port}`")]
    UnknownPort { pass: String, port: String },

    /// Pass lookup by name failed.
    #[error("no pass named `{name}` in the graph")]
    UnknownPass { name: String },

    /// A wiring string did not split into exactly `pass.output`.
    #[error("malformed target `{target}`, expected `pass.output`")]
    MalformedTarget { target: String },

    /// An input references an output that does not exist among the global
    /// outputs or the outputs of previously added passes.
    #[error("input `{pass}.{input}` references unknown output `{target_pass}.{target_output}`")]
    UnresolvedInput {
        pass: String,
        input: String,
        target_pass: String,
        target_output: String,
    },

    /// The resource kinds of an input and the output wired to it differ.
    #[error("cannot bind `{output}` ({found:?}) to `{input}` ({expected:?}): resource kind mismatch")]
    KindMismatch {
        input: String,
        output: String,
        expected: ResourceKind,
        found: ResourceKind,
    },

    /// An exclusive output was claimed a second time.
    #[error("output `{pass}.{output}` bound twice; exclusive outputs may be claimed only once")]
    OutputBoundTwice { pass: String, output: String },

    /// An input was never linked to a producing output.
    #[error("input `{pass}.{input}` was never linked to an output")]
    UnlinkedInput { pass: String, input: String },

    /// An output holds no resource at validation time.
    #[error("output `{pass}.{output}` holds no resource")]
    EmptyOutput { pass: String, output: String },

    /// A drawing pass declared neither a render target nor a depth stencil.
    #[error("pass `{name}` requires a render target or a depth stencil")]
    MissingTargets { name: String },

    /// `validate` was called on an already validated graph, or a pass was
    /// added after validation.
    #[error("render graph is already validated")]
    AlreadyValidated,

    /// The named pass exists but does not accumulate draw tasks.
    #[error("pass `{name}` has no render queue")]
    NotAQueuePass { name: String },

    /// A technique step was submitted before `Technique::link` resolved it.
    #[error("step targeting pass `{pass}` in technique `{technique}` was never linked")]
    UnlinkedStep { technique: String, pass: String },
}

/// Frame-time errors surfaced by the graphics device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device is no longer usable; the process cannot render further.
    #[error("graphics device removed (code {code:#010x})")]
    DeviceRemoved { code: u32 },

    /// A resource descriptor was rejected by the device.
    #[error("invalid resource descriptor: {0}")]
    InvalidDescriptor(String),

    /// Any other device failure, carrying the native error code.
    #[error("graphics operation failed (code {code:#010x})")]
    Failure { code: u32 },
}

/// Umbrella error for operations that touch both the graph and the device,
/// such as the built-in topology constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::DuplicatePass {
            name: "phong".to_string(),
        };
        assert_eq!(err.to_string(), "pass `phong` is already registered");

        let err = GraphError::MalformedTarget {
            target: "a.b.c".to_string(),
        };
        assert!(err.to_string().contains("expected `pass.output`"));
    }

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::DeviceRemoved { code: 0x887A0005 };
        assert_eq!(
            err.to_string(),
            "graphics device removed (code 0x887a0005)"
        );
    }

    #[test]
    fn test_umbrella_conversions() {
        let err: Error = GraphError::AlreadyValidated.into();
        assert!(matches!(err, Error::Graph(_)));

        let err: Error = DeviceError::Failure { code: 1 }.into();
        assert!(matches!(err, Error::Device(_)));
    }
}
