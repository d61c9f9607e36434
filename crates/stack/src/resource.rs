//! Resource nodes: the directory, its client, its groups and the identity
//! exchange.
//!
//! Every non-root node holds a non-owning [`DirectoryRef`]; the graph turns
//! those references into explicit edges.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use projovo_auth::{
    AuthFlow, GroupRole, PasswordPolicy, SignInAlias, StandardAttribute,
    StandardAttributeSettings, TokenLifetimes,
};
use projovo_core::{Entity, LogicalId};

/// What happens to a realized resource when its stack is torn down.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    #[default]
    Destroy,
    Retain,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Directory,
    Client,
    Group,
    Exchange,
}

/// Non-owning reference to a directory node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryRef(LogicalId);

impl DirectoryRef {
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> &LogicalId {
        &self.0
    }
}

/// Non-owning reference to a client node.
///
/// Unlike [`DirectoryRef`] this never becomes an edge: the exchange is
/// ordered against the client by insertion alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientRef(LogicalId);

impl ClientRef {
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> &LogicalId {
        &self.0
    }
}

/// The user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    pub self_sign_up: bool,
    pub sign_in_aliases: BTreeSet<SignInAlias>,
    pub auto_verify: BTreeSet<StandardAttribute>,
    pub standard_attributes: Vec<StandardAttributeSettings>,
    pub password_policy: PasswordPolicy,
}

/// Application client registered against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub name: String,
    pub directory: DirectoryRef,
    pub auth_flows: BTreeSet<AuthFlow>,
    pub token_lifetimes: TokenLifetimes,
}

/// Authorization group inside the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub role: GroupRole,
    pub directory: DirectoryRef,
}

impl Group {
    pub fn name(&self) -> &'static str {
        self.role.as_str()
    }
}

/// A directory trusted by the identity exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthProvider {
    pub directory: DirectoryRef,
    /// Client whose tokens the exchange accepts.
    pub client: ClientRef,
    /// Have the directory confirm each token was not revoked before
    /// credentials are issued.
    pub server_side_token_check: bool,
}

/// Federated identity exchange (identity pool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub name: String,
    pub allow_unauthenticated: bool,
    /// Order is significant and preserved in rendering.
    pub providers: Vec<AuthProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Directory(Directory),
    Client(Client),
    Group(Group),
    Exchange(Exchange),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Directory(_) => ResourceKind::Directory,
            Resource::Client(_) => ResourceKind::Client,
            Resource::Group(_) => ResourceKind::Group,
            Resource::Exchange(_) => ResourceKind::Exchange,
        }
    }

    /// Directory references held by this resource, in declaration order,
    /// without repeats.
    pub fn directory_refs(&self) -> Vec<&LogicalId> {
        match self {
            Resource::Directory(_) => Vec::new(),
            Resource::Client(c) => vec![c.directory.id()],
            Resource::Group(g) => vec![g.directory.id()],
            Resource::Exchange(e) => {
                let mut refs: Vec<&LogicalId> = Vec::new();
                for provider in &e.providers {
                    if !refs.contains(&provider.directory.id()) {
                        refs.push(provider.directory.id());
                    }
                }
                refs
            }
        }
    }

    /// Client references held by exchange providers, without repeats.
    pub fn client_refs(&self) -> Vec<&LogicalId> {
        let Resource::Exchange(e) = self else {
            return Vec::new();
        };
        let mut refs: Vec<&LogicalId> = Vec::new();
        for provider in &e.providers {
            if !refs.contains(&provider.client.id()) {
                refs.push(provider.client.id());
            }
        }
        refs
    }
}

/// A resource plus its stack-level identity and lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    id: LogicalId,
    removal_policy: RemovalPolicy,
    resource: Resource,
}

impl ResourceNode {
    /// New node with the destroy removal policy.
    pub fn new(id: LogicalId, resource: Resource) -> Self {
        Self {
            id,
            removal_policy: RemovalPolicy::Destroy,
            resource,
        }
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.removal_policy
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    /// Logical ids this node must be created after.
    pub fn dependencies(&self) -> Vec<&LogicalId> {
        self.resource.directory_refs()
    }
}

impl Entity for ResourceNode {
    type Id = LogicalId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
