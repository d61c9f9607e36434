//! Error taxonomy for graph construction and provisioning.

use thiserror::Error;

use projovo_core::{DomainError, LogicalId};

use crate::resource::ResourceKind;

/// Failure while assembling a resource graph.
///
/// Terminal for the `build` call that raised it: no partial graph is ever
/// returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Malformed configuration, caught before any node is built.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The same group name was configured more than once.
    #[error("duplicate group '{0}'")]
    DuplicateGroup(String),

    /// The assembled graph violates a structural invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<DomainError> for BuildError {
    fn from(value: DomainError) -> Self {
        BuildError::InvalidConfig(value.to_string())
    }
}

/// Structural violation of a resource graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("logical id '{0}' is used by more than one node")]
    DuplicateLogicalId(LogicalId),

    #[error("node '{node}' references '{dependency}', which has not been added yet")]
    MissingDependency { node: LogicalId, dependency: LogicalId },

    #[error("node '{node}' references '{target}', which is a {found:?} and not a {expected:?}")]
    WrongReferenceKind {
        node: LogicalId,
        target: LogicalId,
        expected: ResourceKind,
        found: ResourceKind,
    },

    #[error("expected exactly {expected} {kind:?} node(s), found {found}")]
    Cardinality {
        kind: ResourceKind,
        expected: usize,
        found: usize,
    },

    #[error("group name '{0}' appears more than once")]
    DuplicateGroupName(String),

    #[error("exchange '{0}' has no provider referencing the directory")]
    NoDirectoryProvider(LogicalId),

    #[error("dependent node '{0}' must use the destroy removal policy")]
    RetainedDependent(LogicalId),

    #[error("edge {from} -> {to} points at a node outside the graph")]
    DanglingEdge { from: LogicalId, to: LogicalId },

    #[error("edge set does not match the references of node '{0}'")]
    EdgeMismatch(LogicalId),

    #[error("dependency cycle detected among: {0:?}")]
    Cycle(Vec<LogicalId>),

    #[error("output '{0}' is declared more than once")]
    DuplicateOutput(String),

    #[error("output '{output}' references unknown node '{target}'")]
    UnknownOutputTarget { output: String, target: LogicalId },
}

/// Failure reported by the provisioning collaborator.
///
/// Passed through unchanged; this crate neither retries nor interprets them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    /// A directory with the same name already exists in the target region.
    #[error("directory name '{name}' is already taken in region {region}")]
    NameConflict { name: String, region: String },

    /// A deferred value was requested for a resource that was never realized.
    #[error("resource '{0}' has not been realized")]
    NotRealized(LogicalId),

    #[error("stack '{0}' is not deployed")]
    UnknownStack(String),

    /// Internal state lock was poisoned.
    #[error("provisioner state poisoned")]
    Poisoned,

    /// Opaque failure from the provider.
    #[error("provider error: {0}")]
    Provider(String),
}
