//! Names and wiring targets.
//!
//! Passes and ports are addressed by identifiers, and inputs are wired with
//! `pass.output` strings. The pseudo pass `$` addresses resources owned by
//! the graph itself.

use crate::error::GraphError;

/// Name of the pseudo pass holding graph-owned resources.
pub const GLOBAL_PASS: &str = "$";

/// Check that a name is a valid identifier.
///
/// Identifiers start with a letter or underscore and continue with letters,
/// digits or underscores.
pub fn validate_identifier(name: &str) -> Result<(), GraphError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(GraphError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// A parsed `pass.output` wiring target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub pass: String,
    pub output: String,
}

impl TargetRef {
    /// Create a target from already validated parts.
    pub fn new(pass: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            pass: pass.into(),
            output: output.into(),
        }
    }

    /// Parse a `pass.output` string.
    ///
    /// The string must split on `.` into exactly two tokens. The pass token
    /// may be `$`; both tokens are otherwise validated as identifiers.
    pub fn parse(target: &str) -> Result<Self, GraphError> {
        let mut parts = target.split('.');
        let (pass, output) = match (parts.next(), parts.next(), parts.next()) {
            (Some(pass), Some(output), None) => (pass, output),
            _ => {
                return Err(GraphError::MalformedTarget {
                    target: target.to_string(),
                })
            }
        };
        if pass != GLOBAL_PASS {
            validate_identifier(pass)?;
        }
        validate_identifier(output)?;
        Ok(Self::new(pass, output))
    }

    /// Whether this target addresses a graph-owned resource.
    pub fn is_global(&self) -> bool {
        self.pass == GLOBAL_PASS
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.pass, self.output)
    }
}
