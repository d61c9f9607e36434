//! `projovo-stack`: the identity resource graph.
//!
//! [`build`] turns a [`StackConfig`] into a validated [`ResourceGraph`]:
//! one user directory, its client, its authorization groups and a federated
//! identity exchange, plus the output bindings other stacks consume.
//! Realizing the graph is the job of a [`Provisioner`].

pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod outputs;
pub mod provision;
pub mod resource;
pub mod template;

pub use builder::build;
pub use config::{StackConfig, TokenLifetimeSettings};
pub use error::{BuildError, GraphError, ProvisioningError};
pub use graph::{Edge, GraphBuilder, ResourceGraph};
pub use outputs::{Deferred, OutputBinding, resolve_outputs};
pub use provision::{InMemoryProvisioner, Provisioner, Realization, Teardown};
pub use resource::{
    AuthProvider, ClientRef, DirectoryRef, RemovalPolicy, Resource, ResourceKind, ResourceNode,
};
pub use template::render_template;
