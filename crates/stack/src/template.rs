//! Render a resource graph as a CloudFormation-shaped JSON document.
//!
//! `serde_json::Map` keeps keys sorted, so equal graphs render to
//! byte-identical output.

use serde_json::{Map, Value, json};

use projovo_auth::SignInAlias;
use projovo_auth::flows::REFRESH_TOKEN_FLOW;
use projovo_core::{Entity, LogicalId};

use crate::graph::ResourceGraph;
use crate::outputs::Deferred;
use crate::resource::{Client, Directory, Exchange, Group, RemovalPolicy, Resource, ResourceNode};

pub const USER_POOL_TYPE: &str = "AWS::Cognito::UserPool";
pub const USER_POOL_CLIENT_TYPE: &str = "AWS::Cognito::UserPoolClient";
pub const USER_POOL_GROUP_TYPE: &str = "AWS::Cognito::UserPoolGroup";
pub const IDENTITY_POOL_TYPE: &str = "AWS::Cognito::IdentityPool";

pub fn render_template(graph: &ResourceGraph) -> Value {
    let mut resources = Map::new();
    for node in graph.nodes() {
        resources.insert(node.id().to_string(), render_node(graph, node));
    }

    let mut outputs = Map::new();
    for binding in graph.outputs() {
        outputs.insert(
            binding.name.clone(),
            json!({ "Value": render_deferred(&binding.value) }),
        );
    }

    json!({
        "Description": format!("Identity resources for {}", graph.stack_name()),
        "Resources": resources,
        "Outputs": outputs,
    })
}

/// Render to a pretty-printed string.
pub fn render_template_string(graph: &ResourceGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&render_template(graph))
}

fn render_node(graph: &ResourceGraph, node: &ResourceNode) -> Value {
    let (kind, properties) = match node.resource() {
        Resource::Directory(d) => (USER_POOL_TYPE, directory_properties(d)),
        Resource::Client(c) => (USER_POOL_CLIENT_TYPE, client_properties(c)),
        Resource::Group(g) => (USER_POOL_GROUP_TYPE, group_properties(g)),
        Resource::Exchange(e) => (IDENTITY_POOL_TYPE, exchange_properties(e)),
    };

    let policy = match node.removal_policy() {
        RemovalPolicy::Destroy => "Delete",
        RemovalPolicy::Retain => "Retain",
    };

    let mut rendered = Map::new();
    rendered.insert("Type".to_string(), json!(kind));
    rendered.insert("Properties".to_string(), properties);
    rendered.insert("DeletionPolicy".to_string(), json!(policy));
    rendered.insert("UpdateReplacePolicy".to_string(), json!(policy));

    let mut depends_on: Vec<&str> = graph
        .dependencies_of(node.id())
        .into_iter()
        .map(LogicalId::as_str)
        .collect();
    if !depends_on.is_empty() {
        depends_on.sort_unstable();
        rendered.insert("DependsOn".to_string(), json!(depends_on));
    }

    Value::Object(rendered)
}

fn reference(id: &LogicalId) -> Value {
    json!({ "Ref": id.as_str() })
}

fn directory_properties(d: &Directory) -> Value {
    let sign_in: Vec<&str> = d
        .sign_in_aliases
        .iter()
        .filter_map(|alias| match alias {
            SignInAlias::Username => None,
            SignInAlias::Email => Some("email"),
            SignInAlias::Phone => Some("phone_number"),
        })
        .collect();
    // With usernames enabled the other identifiers become aliases; without,
    // they replace the username entirely.
    let sign_in_key = if d.sign_in_aliases.contains(&SignInAlias::Username) {
        "AliasAttributes"
    } else {
        "UsernameAttributes"
    };

    let auto_verify: Vec<&str> = d.auto_verify.iter().map(|a| a.provider_name()).collect();
    let schema: Vec<Value> = d
        .standard_attributes
        .iter()
        .map(|s| {
            json!({
                "Name": s.attribute.provider_name(),
                "Required": s.required,
                "Mutable": s.mutable,
            })
        })
        .collect();

    let p = &d.password_policy;
    let mut properties = Map::new();
    properties.insert("UserPoolName".to_string(), json!(d.name));
    properties.insert(
        "AdminCreateUserConfig".to_string(),
        json!({ "AllowAdminCreateUserOnly": !d.self_sign_up }),
    );
    if !sign_in.is_empty() {
        properties.insert(sign_in_key.to_string(), json!(sign_in));
    }
    if !auto_verify.is_empty() {
        properties.insert("AutoVerifiedAttributes".to_string(), json!(auto_verify));
    }
    if !schema.is_empty() {
        properties.insert("Schema".to_string(), json!(schema));
    }
    properties.insert(
        "Policies".to_string(),
        json!({
            "PasswordPolicy": {
                "MinimumLength": p.min_length,
                "RequireLowercase": p.require_lowercase,
                "RequireUppercase": p.require_uppercase,
                "RequireNumbers": p.require_digits,
                "RequireSymbols": p.require_symbols,
            }
        }),
    );
    Value::Object(properties)
}

fn client_properties(c: &Client) -> Value {
    let mut flows: Vec<&str> = c.auth_flows.iter().map(|f| f.provider_name()).collect();
    flows.push(REFRESH_TOKEN_FLOW);

    let t = &c.token_lifetimes;
    json!({
        "ClientName": c.name,
        "UserPoolId": reference(c.directory.id()),
        "ExplicitAuthFlows": flows,
        "AccessTokenValidity": t.access().num_minutes(),
        "IdTokenValidity": t.id().num_minutes(),
        "RefreshTokenValidity": t.refresh().num_minutes(),
        "TokenValidityUnits": {
            "AccessToken": "minutes",
            "IdToken": "minutes",
            "RefreshToken": "minutes",
        },
    })
}

fn group_properties(g: &Group) -> Value {
    json!({
        "GroupName": g.name(),
        "UserPoolId": reference(g.directory.id()),
    })
}

fn exchange_properties(e: &Exchange) -> Value {
    let providers: Vec<Value> = e
        .providers
        .iter()
        .map(|p| {
            json!({
                "ClientId": reference(p.client.id()),
                "ProviderName": { "Fn::GetAtt": [p.directory.id().as_str(), "ProviderName"] },
                "ServerSideTokenCheck": p.server_side_token_check,
            })
        })
        .collect();

    json!({
        "IdentityPoolName": e.name,
        "AllowUnauthenticatedIdentities": e.allow_unauthenticated,
        "CognitoIdentityProviders": providers,
    })
}

fn render_deferred(value: &Deferred) -> Value {
    match value {
        Deferred::PhysicalId(id) => reference(id),
        Deferred::Region => json!({ "Ref": "AWS::Region" }),
    }
}
