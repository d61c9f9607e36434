//! Identity resource graph construction.

use std::collections::HashSet;

use projovo_core::LogicalId;

use crate::config::StackConfig;
use crate::error::BuildError;
use crate::graph::{GraphBuilder, ResourceGraph};
use crate::outputs::{
    Deferred, OutputBinding, IDENTITY_POOL_ID, USER_POOL_CLIENT_ID, USER_POOL_ID,
    USER_POOL_REGION,
};
use crate::resource::{
    AuthProvider, Client, ClientRef, Directory, DirectoryRef, Exchange, Group, Resource,
    ResourceNode,
};

pub const DIRECTORY_LOGICAL_ID: &str = "ProjovoUserPool";
pub const CLIENT_LOGICAL_ID: &str = "ProjovoUserPoolClient";
pub const EXCHANGE_LOGICAL_ID: &str = "ProjovoIdentityPool";

/// Logical id of the group created for `name`.
pub fn group_logical_id(name: &str) -> Result<LogicalId, BuildError> {
    Ok(LogicalId::new(format!("Group-{name}"))?)
}

/// Assemble the identity stack described by `config`.
///
/// Pure: no provider calls, no shared state. The same config always yields an
/// equal graph. Nodes are added directory → client → groups (config order) →
/// exchange, then the output bindings.
pub fn build(config: &StackConfig) -> Result<ResourceGraph, BuildError> {
    let validated = config.validate()?;
    let mut graph = GraphBuilder::new(config.stack_name.clone());

    let directory_id = graph.add_node(
        ResourceNode::new(
            LogicalId::new(DIRECTORY_LOGICAL_ID)?,
            Resource::Directory(Directory {
                name: config.directory_name.clone(),
                self_sign_up: config.self_sign_up,
                sign_in_aliases: config.sign_in_aliases.iter().copied().collect(),
                auto_verify: config.auto_verify.iter().copied().collect(),
                standard_attributes: config.standard_attributes.clone(),
                password_policy: config.password_policy.clone(),
            }),
        )
        .with_removal_policy(config.removal_policy),
    )?;

    for finding in validated.token_lifetimes.findings() {
        tracing::warn!(client = %config.client_name, %finding, "token lifetime finding");
        graph.warn(finding.to_string());
    }

    let client_id = graph.add_node(ResourceNode::new(
        LogicalId::new(CLIENT_LOGICAL_ID)?,
        Resource::Client(Client {
            name: config.client_name.clone(),
            directory: DirectoryRef::new(directory_id.clone()),
            auth_flows: config.auth_flows.iter().copied().collect(),
            token_lifetimes: validated.token_lifetimes,
        }),
    ))?;

    let mut seen = HashSet::new();
    for role in &validated.roles {
        if !seen.insert(*role) {
            return Err(BuildError::DuplicateGroup(role.to_string()));
        }
        graph.add_node(ResourceNode::new(
            group_logical_id(role.as_str())?,
            Resource::Group(Group {
                role: *role,
                directory: DirectoryRef::new(directory_id.clone()),
            }),
        ))?;
    }

    if config.allow_unauthenticated {
        tracing::warn!(
            exchange = %config.exchange_name,
            "identity exchange allows unauthenticated identities"
        );
    }
    let exchange_id = graph.add_node(ResourceNode::new(
        LogicalId::new(EXCHANGE_LOGICAL_ID)?,
        Resource::Exchange(Exchange {
            name: config.exchange_name.clone(),
            allow_unauthenticated: config.allow_unauthenticated,
            providers: vec![AuthProvider {
                directory: DirectoryRef::new(directory_id.clone()),
                client: ClientRef::new(client_id.clone()),
                server_side_token_check: config.server_side_token_check,
            }],
        }),
    ))?;

    graph.add_output(OutputBinding::new(
        USER_POOL_ID,
        Deferred::PhysicalId(directory_id),
    ))?;
    graph.add_output(OutputBinding::new(
        USER_POOL_CLIENT_ID,
        Deferred::PhysicalId(client_id),
    ))?;
    graph.add_output(OutputBinding::new(USER_POOL_REGION, Deferred::Region))?;
    if config.expose_exchange_output {
        graph.add_output(OutputBinding::new(
            IDENTITY_POOL_ID,
            Deferred::PhysicalId(exchange_id),
        ))?;
    }

    let graph = graph.finish()?;
    tracing::info!(
        stack = graph.stack_name(),
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        outputs = graph.outputs().len(),
        "identity resource graph built"
    );
    Ok(graph)
}
