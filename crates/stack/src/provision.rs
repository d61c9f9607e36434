//! Provisioning seam (the external collaborator).
//!
//! A [`Provisioner`] takes a finished [`ResourceGraph`] and makes it real. The
//! plan/diff/apply machinery behind it is not modeled here; this module only
//! fixes the contract: what a realization yields, and which resources survive
//! a teardown.
//!
//! [`InMemoryProvisioner`] is a deterministic stand-in for tests and local
//! development.

use std::collections::BTreeMap;
use std::sync::Mutex;

use uuid::Uuid;

use projovo_core::{Entity, LogicalId, PhysicalId};

use crate::error::ProvisioningError;
use crate::graph::ResourceGraph;
use crate::resource::{RemovalPolicy, Resource, ResourceNode};

/// Result of a successful apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realization {
    stack_name: String,
    region: String,
    resources: BTreeMap<LogicalId, PhysicalId>,
}

impl Realization {
    pub fn new(
        stack_name: impl Into<String>,
        region: impl Into<String>,
        resources: BTreeMap<LogicalId, PhysicalId>,
    ) -> Self {
        Self {
            stack_name: stack_name.into(),
            region: region.into(),
            resources,
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn physical_id(&self, id: &LogicalId) -> Option<&PhysicalId> {
        self.resources.get(id)
    }

    pub fn resources(&self) -> &BTreeMap<LogicalId, PhysicalId> {
        &self.resources
    }
}

/// Result of a successful teardown, in deletion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Teardown {
    pub destroyed: Vec<LogicalId>,
    pub retained: Vec<LogicalId>,
}

/// The external collaborator that realizes and tears down graphs.
///
/// Implementations must serialize applies per stack; callers never run two
/// applies against the same stack concurrently through one provisioner.
pub trait Provisioner: Send + Sync {
    /// Create or update every node in `graph`. Re-applying an unchanged graph
    /// is a no-op that returns the same realization.
    fn apply(&self, graph: &ResourceGraph) -> Result<Realization, ProvisioningError>;

    /// Remove the stack, honoring each node's removal policy.
    fn destroy(&self, graph: &ResourceGraph) -> Result<Teardown, ProvisioningError>;
}

#[derive(Debug, Default)]
struct State {
    /// Deployed stacks: stack name → logical id → physical id.
    stacks: BTreeMap<String, BTreeMap<LogicalId, PhysicalId>>,
    /// Directory names in use: name → owning stack, or `None` once the stack
    /// is gone but the directory was retained.
    directory_names: BTreeMap<String, Option<String>>,
}

/// Deterministic in-memory provisioner.
///
/// - No IO
/// - Physical ids derive from (region, stack, logical id), so they are stable
///   across runs
/// - Directory names are unique per provisioner (one region); retained
///   directories keep their name reserved after teardown
#[derive(Debug)]
pub struct InMemoryProvisioner {
    region: String,
    state: Mutex<State>,
}

impl InMemoryProvisioner {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Names of directories that outlived their stack.
    pub fn retained_directories(&self) -> Result<Vec<String>, ProvisioningError> {
        let state = self.state.lock().map_err(|_| ProvisioningError::Poisoned)?;
        Ok(state
            .directory_names
            .iter()
            .filter(|(_, owner)| owner.is_none())
            .map(|(name, _)| name.clone())
            .collect())
    }

    pub fn is_deployed(&self, stack_name: &str) -> Result<bool, ProvisioningError> {
        let state = self.state.lock().map_err(|_| ProvisioningError::Poisoned)?;
        Ok(state.stacks.contains_key(stack_name))
    }

    fn physical_id(
        &self,
        stack_name: &str,
        node: &ResourceNode,
    ) -> Result<PhysicalId, ProvisioningError> {
        let seed = format!("{}/{}/{}", self.region, stack_name, node.id());
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes());
        let simple = uuid.simple().to_string();

        let value = match node.resource() {
            Resource::Directory(_) => format!("{}_{}", self.region, &simple[..9]),
            Resource::Client(_) => simple[..26].to_string(),
            Resource::Group(g) => g.name().to_string(),
            Resource::Exchange(_) => format!("{}:{}", self.region, uuid.hyphenated()),
        };
        PhysicalId::new(value).map_err(|e| ProvisioningError::Provider(e.to_string()))
    }
}

impl Provisioner for InMemoryProvisioner {
    fn apply(&self, graph: &ResourceGraph) -> Result<Realization, ProvisioningError> {
        let mut state = self.state.lock().map_err(|_| ProvisioningError::Poisoned)?;
        let stack_name = graph.stack_name().to_string();

        if let Some(directory) = graph.directory() {
            match state.directory_names.get(&directory.name) {
                Some(Some(owner)) if owner == &stack_name => {}
                Some(_) => {
                    return Err(ProvisioningError::NameConflict {
                        name: directory.name.clone(),
                        region: self.region.clone(),
                    });
                }
                None => {}
            }
        }

        let order = graph
            .topological_order()
            .map_err(|e| ProvisioningError::Provider(e.to_string()))?;

        let previous = state.stacks.get(&stack_name);
        let mut resources = BTreeMap::new();
        for id in order {
            let node = graph
                .node(id)
                .ok_or_else(|| ProvisioningError::NotRealized(id.clone()))?;
            let physical = match previous.and_then(|p| p.get(id)) {
                Some(existing) => existing.clone(),
                None => {
                    let created = self.physical_id(&stack_name, node)?;
                    tracing::debug!(
                        stack = %stack_name,
                        logical_id = %id,
                        physical_id = %created,
                        "resource created"
                    );
                    created
                }
            };
            resources.insert(id.clone(), physical);
        }

        // A renamed directory frees its old name.
        state
            .directory_names
            .retain(|_, owner| owner.as_deref() != Some(stack_name.as_str()));
        if let Some(directory) = graph.directory() {
            state
                .directory_names
                .insert(directory.name.clone(), Some(stack_name.clone()));
        }
        state.stacks.insert(stack_name.clone(), resources.clone());

        tracing::info!(
            stack = %stack_name,
            region = %self.region,
            resources = resources.len(),
            "stack applied"
        );
        Ok(Realization::new(stack_name, self.region.clone(), resources))
    }

    fn destroy(&self, graph: &ResourceGraph) -> Result<Teardown, ProvisioningError> {
        let mut state = self.state.lock().map_err(|_| ProvisioningError::Poisoned)?;
        let stack_name = graph.stack_name();

        if !state.stacks.contains_key(stack_name) {
            return Err(ProvisioningError::UnknownStack(stack_name.to_string()));
        }

        let mut order = graph
            .topological_order()
            .map_err(|e| ProvisioningError::Provider(e.to_string()))?;
        order.reverse();

        let mut teardown = Teardown::default();
        for id in order {
            let Some(node) = graph.node(id) else { continue };
            match node.removal_policy() {
                RemovalPolicy::Destroy => teardown.destroyed.push(id.clone()),
                RemovalPolicy::Retain => teardown.retained.push(id.clone()),
            }
        }

        let retained_directory = graph
            .directory_node()
            .filter(|n| n.removal_policy() == RemovalPolicy::Retain)
            .and(graph.directory())
            .map(|d| d.name.clone());

        state
            .directory_names
            .retain(|_, owner| owner.as_deref() != Some(stack_name));
        if let Some(name) = retained_directory {
            state.directory_names.insert(name, None);
        }
        state.stacks.remove(stack_name);

        tracing::info!(
            stack = %stack_name,
            destroyed = teardown.destroyed.len(),
            retained = teardown.retained.len(),
            "stack destroyed"
        );
        Ok(teardown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, DIRECTORY_LOGICAL_ID};
    use crate::config::StackConfig;

    #[test]
    fn physical_ids_have_provider_shapes() {
        let provisioner = InMemoryProvisioner::new("eu-west-1");
        let graph = build(&StackConfig::default()).unwrap();
        let realization = provisioner.apply(&graph).unwrap();

        let pool = realization
            .physical_id(&LogicalId::new(DIRECTORY_LOGICAL_ID).unwrap())
            .unwrap();
        assert!(pool.as_str().starts_with("eu-west-1_"));
        assert_eq!(pool.as_str().len(), "eu-west-1_".len() + 9);

        let group = realization
            .physical_id(&LogicalId::new("Group-admin").unwrap())
            .unwrap();
        assert_eq!(group.as_str(), "admin");
        assert_eq!(realization.resources().len(), graph.nodes().len());
    }

    #[test]
    fn reapply_is_idempotent() {
        let provisioner = InMemoryProvisioner::new("eu-west-1");
        let graph = build(&StackConfig::default()).unwrap();
        let first = provisioner.apply(&graph).unwrap();
        let second = provisioner.apply(&build(&StackConfig::default()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn directory_name_is_unique_across_stacks() {
        let provisioner = InMemoryProvisioner::new("eu-west-1");
        provisioner.apply(&build(&StackConfig::default()).unwrap()).unwrap();

        let other = StackConfig {
            stack_name: "OtherAuthStack".to_string(),
            ..StackConfig::default()
        };
        let err = provisioner.apply(&build(&other).unwrap()).unwrap_err();
        assert!(matches!(err, ProvisioningError::NameConflict { .. }));
    }

    #[test]
    fn destroy_unknown_stack_fails() {
        let provisioner = InMemoryProvisioner::new("eu-west-1");
        let graph = build(&StackConfig::default()).unwrap();
        assert_eq!(
            provisioner.destroy(&graph).unwrap_err(),
            ProvisioningError::UnknownStack("ProjovoAuthStack".to_string())
        );
    }

    #[test]
    fn destroy_deletes_dependents_before_the_directory() {
        let provisioner = InMemoryProvisioner::new("eu-west-1");
        let graph = build(&StackConfig::default()).unwrap();
        provisioner.apply(&graph).unwrap();

        let teardown = provisioner.destroy(&graph).unwrap();
        assert!(teardown.retained.is_empty());
        assert_eq!(teardown.destroyed.len(), graph.nodes().len());
        assert_eq!(
            teardown.destroyed.last().map(LogicalId::as_str),
            Some(DIRECTORY_LOGICAL_ID)
        );
        assert!(!provisioner.is_deployed("ProjovoAuthStack").unwrap());
        assert!(provisioner.retained_directories().unwrap().is_empty());
    }
}
