//! Resource graph value and its incremental builder.
//!
//! Edges are explicit: every directory reference a node holds becomes an
//! `Edge { from: dependent, to: dependency }` at the moment the node is added,
//! and a node can only be added once all of its dependencies are present.

use std::collections::{BTreeSet, HashSet};

use projovo_core::{Entity, LogicalId};

use crate::error::GraphError;
use crate::outputs::OutputBinding;
use crate::resource::{
    Client, Directory, Exchange, Group, RemovalPolicy, Resource, ResourceKind, ResourceNode,
};

/// Dependency edge: `from` must be created after (and destroyed before) `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: LogicalId,
    pub to: LogicalId,
}

/// A complete, validated description of the identity stack.
///
/// Nodes are kept in insertion order, which is also a valid creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGraph {
    stack_name: String,
    nodes: Vec<ResourceNode>,
    edges: Vec<Edge>,
    outputs: Vec<OutputBinding>,
    warnings: Vec<String>,
}

impl ResourceGraph {
    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn outputs(&self) -> &[OutputBinding] {
        &self.outputs
    }

    /// Soft findings collected while building (never fatal).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn node(&self, id: &LogicalId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn nodes_of(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    pub fn directory_node(&self) -> Option<&ResourceNode> {
        self.nodes_of(ResourceKind::Directory).next()
    }

    pub fn directory(&self) -> Option<&Directory> {
        self.nodes.iter().find_map(|n| match n.resource() {
            Resource::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn client(&self) -> Option<&Client> {
        self.nodes.iter().find_map(|n| match n.resource() {
            Resource::Client(c) => Some(c),
            _ => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.nodes.iter().filter_map(|n| match n.resource() {
            Resource::Group(g) => Some(g),
            _ => None,
        })
    }

    pub fn exchange(&self) -> Option<&Exchange> {
        self.nodes.iter().find_map(|n| match n.resource() {
            Resource::Exchange(e) => Some(e),
            _ => None,
        })
    }

    /// Direct dependencies of `id` (targets of its outgoing edges).
    pub fn dependencies_of(&self, id: &LogicalId) -> Vec<&LogicalId> {
        self.edges
            .iter()
            .filter(|e| &e.from == id)
            .map(|e| &e.to)
            .collect()
    }

    /// Nodes that depend directly on `id`.
    pub fn dependents_of(&self, id: &LogicalId) -> Vec<&LogicalId> {
        self.edges
            .iter()
            .filter(|e| &e.to == id)
            .map(|e| &e.from)
            .collect()
    }

    /// Creation order: every node appears after all of its dependencies.
    ///
    /// Ties are broken by insertion order, so the result is deterministic.
    pub fn topological_order(&self) -> Result<Vec<&LogicalId>, GraphError> {
        let mut remaining: Vec<&ResourceNode> = self.nodes.iter().collect();
        let mut placed: HashSet<&LogicalId> = HashSet::new();
        let mut order = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let ready = remaining.iter().position(|n| {
                self.dependencies_of(n.id())
                    .iter()
                    .all(|dep| placed.contains(dep))
            });

            let Some(pos) = ready else {
                return Err(GraphError::Cycle(
                    remaining.iter().map(|n| n.id().clone()).collect(),
                ));
            };

            let node = remaining.remove(pos);
            placed.insert(node.id());
            order.push(node.id());
        }

        Ok(order)
    }

    /// Check every structural invariant of the identity stack.
    pub fn validate(&self) -> Result<(), GraphError> {
        let directories = self.nodes_of(ResourceKind::Directory).count();
        if directories != 1 {
            return Err(GraphError::Cardinality {
                kind: ResourceKind::Directory,
                expected: 1,
                found: directories,
            });
        }
        for kind in [ResourceKind::Client, ResourceKind::Exchange] {
            let found = self.nodes_of(kind).count();
            if found != 1 {
                return Err(GraphError::Cardinality {
                    kind,
                    expected: 1,
                    found,
                });
            }
        }

        let mut seen_ids = HashSet::new();
        for node in &self.nodes {
            if !seen_ids.insert(node.id()) {
                return Err(GraphError::DuplicateLogicalId(node.id().clone()));
            }
        }

        for node in &self.nodes {
            for dep in node.dependencies() {
                let target = self.node(dep).ok_or_else(|| GraphError::MissingDependency {
                    node: node.id().clone(),
                    dependency: dep.clone(),
                })?;
                if target.kind() != ResourceKind::Directory {
                    return Err(GraphError::WrongReferenceKind {
                        node: node.id().clone(),
                        target: dep.clone(),
                        expected: ResourceKind::Directory,
                        found: target.kind(),
                    });
                }
            }

            for client in node.resource().client_refs() {
                let target = self.node(client).ok_or_else(|| GraphError::MissingDependency {
                    node: node.id().clone(),
                    dependency: client.clone(),
                })?;
                if target.kind() != ResourceKind::Client {
                    return Err(GraphError::WrongReferenceKind {
                        node: node.id().clone(),
                        target: client.clone(),
                        expected: ResourceKind::Client,
                        found: target.kind(),
                    });
                }
            }

            let declared: BTreeSet<&LogicalId> = node.dependencies().into_iter().collect();
            let wired: BTreeSet<&LogicalId> = self.dependencies_of(node.id()).into_iter().collect();
            if declared != wired {
                return Err(GraphError::EdgeMismatch(node.id().clone()));
            }

            if node.kind() != ResourceKind::Directory
                && node.removal_policy() != RemovalPolicy::Destroy
            {
                return Err(GraphError::RetainedDependent(node.id().clone()));
            }
        }

        for edge in &self.edges {
            if self.node(&edge.from).is_none() || self.node(&edge.to).is_none() {
                return Err(GraphError::DanglingEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
        }

        let mut group_names = HashSet::new();
        for group in self.groups() {
            if !group_names.insert(group.name()) {
                return Err(GraphError::DuplicateGroupName(group.name().to_string()));
            }
        }

        // Only one directory exists at this point, so any provider that
        // resolved above references it.
        for node in self.nodes_of(ResourceKind::Exchange) {
            if node.dependencies().is_empty() {
                return Err(GraphError::NoDirectoryProvider(node.id().clone()));
            }
        }

        let mut output_names = HashSet::new();
        for binding in &self.outputs {
            if !output_names.insert(binding.name.as_str()) {
                return Err(GraphError::DuplicateOutput(binding.name.clone()));
            }
            if let Some(target) = binding.value.target() {
                if self.node(target).is_none() {
                    return Err(GraphError::UnknownOutputTarget {
                        output: binding.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        self.topological_order()?;
        Ok(())
    }
}

/// Incremental graph assembly that refuses out-of-order nodes.
#[derive(Debug)]
pub struct GraphBuilder {
    graph: ResourceGraph,
}

impl GraphBuilder {
    pub fn new(stack_name: impl Into<String>) -> Self {
        Self {
            graph: ResourceGraph {
                stack_name: stack_name.into(),
                nodes: Vec::new(),
                edges: Vec::new(),
                outputs: Vec::new(),
                warnings: Vec::new(),
            },
        }
    }

    /// Add a node whose dependencies are already present, wiring its edges.
    pub fn add_node(&mut self, node: ResourceNode) -> Result<LogicalId, GraphError> {
        if self.graph.node(node.id()).is_some() {
            return Err(GraphError::DuplicateLogicalId(node.id().clone()));
        }

        let mut edges = Vec::new();
        for dep in node.dependencies() {
            if self.graph.node(dep).is_none() {
                return Err(GraphError::MissingDependency {
                    node: node.id().clone(),
                    dependency: dep.clone(),
                });
            }
            edges.push(Edge {
                from: node.id().clone(),
                to: dep.clone(),
            });
        }
        // Client references carry no edge but still have to exist first.
        for client in node.resource().client_refs() {
            if self.graph.node(client).is_none() {
                return Err(GraphError::MissingDependency {
                    node: node.id().clone(),
                    dependency: client.clone(),
                });
            }
        }

        let id = node.id().clone();
        tracing::debug!(
            logical_id = %id,
            kind = ?node.kind(),
            removal_policy = ?node.removal_policy(),
            dependencies = edges.len(),
            "resource node added"
        );

        self.graph.nodes.push(node);
        self.graph.edges.extend(edges);
        Ok(id)
    }

    pub fn add_output(&mut self, binding: OutputBinding) -> Result<(), GraphError> {
        if self.graph.outputs.iter().any(|b| b.name == binding.name) {
            return Err(GraphError::DuplicateOutput(binding.name));
        }
        if let Some(target) = binding.value.target() {
            if self.graph.node(target).is_none() {
                return Err(GraphError::UnknownOutputTarget {
                    output: binding.name.clone(),
                    target: target.clone(),
                });
            }
        }
        self.graph.outputs.push(binding);
        Ok(())
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.graph.warnings.push(message.into());
    }

    /// Validate and hand out the finished graph.
    pub fn finish(self) -> Result<ResourceGraph, GraphError> {
        self.graph.validate()?;
        Ok(self.graph)
    }
}
