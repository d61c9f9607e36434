//! Output bindings: named identifiers other stacks integrate against.
//!
//! A binding only *describes* where its value comes from. The value itself
//! exists once the graph has been realized, so resolution always goes through
//! a [`Realization`].

use std::collections::BTreeMap;

use projovo_core::LogicalId;

use crate::error::ProvisioningError;
use crate::graph::ResourceGraph;
use crate::provision::Realization;

pub const USER_POOL_ID: &str = "UserPoolId";
pub const USER_POOL_CLIENT_ID: &str = "UserPoolClientId";
pub const USER_POOL_REGION: &str = "UserPoolRegion";
pub const IDENTITY_POOL_ID: &str = "IdentityPoolId";

/// Value known only after realization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// Provider-assigned identifier of a node.
    PhysicalId(LogicalId),
    /// Region the stack was deployed into.
    Region,
}

impl Deferred {
    /// Node this value is read from, if any.
    pub fn target(&self) -> Option<&LogicalId> {
        match self {
            Deferred::PhysicalId(id) => Some(id),
            Deferred::Region => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBinding {
    pub name: String,
    pub value: Deferred,
}

impl OutputBinding {
    pub fn new(name: impl Into<String>, value: Deferred) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Resolve every output binding of `graph` against a realization.
///
/// Fails with [`ProvisioningError::NotRealized`] when a binding points at a
/// node the realization does not know about.
pub fn resolve_outputs(
    graph: &ResourceGraph,
    realization: &Realization,
) -> Result<BTreeMap<String, String>, ProvisioningError> {
    let mut resolved = BTreeMap::new();
    for binding in graph.outputs() {
        let value = match &binding.value {
            Deferred::PhysicalId(id) => realization
                .physical_id(id)
                .ok_or_else(|| ProvisioningError::NotRealized(id.clone()))?
                .to_string(),
            Deferred::Region => realization.region().to_string(),
        };
        resolved.insert(binding.name.clone(), value);
    }
    Ok(resolved)
}
