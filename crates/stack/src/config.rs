//! Stack configuration.
//!
//! Defaults reproduce the dev identity stack. `StackConfig::load` layers an
//! optional config file and `PROJOVO__*` environment variables on top.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use projovo_auth::{
    AuthFlow, GroupRole, PasswordPolicy, SignInAlias, StandardAttribute,
    StandardAttributeSettings, TokenLifetimes,
};

use crate::error::BuildError;
use crate::resource::RemovalPolicy;

/// Token lifetimes in seconds. Each must be a whole number of minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenLifetimeSettings {
    pub access_secs: i64,
    pub id_secs: i64,
    pub refresh_secs: i64,
}

impl Default for TokenLifetimeSettings {
    fn default() -> Self {
        Self {
            access_secs: 60 * 60,
            id_secs: 60 * 60,
            refresh_secs: 30 * 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub stack_name: String,

    pub directory_name: String,
    pub self_sign_up: bool,
    pub sign_in_aliases: Vec<SignInAlias>,
    pub auto_verify: Vec<StandardAttribute>,
    pub standard_attributes: Vec<StandardAttributeSettings>,
    pub password_policy: PasswordPolicy,
    /// Teardown behavior of the directory only.
    pub removal_policy: RemovalPolicy,

    pub client_name: String,
    pub auth_flows: Vec<AuthFlow>,
    pub token_lifetimes: TokenLifetimeSettings,
    /// Reject (rather than warn about) refresh tokens that expire before
    /// access/id tokens.
    pub strict_token_lifetimes: bool,

    /// Created in this order.
    pub group_names: Vec<String>,

    pub exchange_name: String,
    pub allow_unauthenticated: bool,
    /// Have the directory re-check tokens when the exchange issues
    /// credentials.
    pub server_side_token_check: bool,
    pub expose_exchange_output: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_name: "ProjovoAuthStack".to_string(),
            directory_name: "terranexa-dev-projovo-user-pool".to_string(),
            self_sign_up: true,
            sign_in_aliases: vec![SignInAlias::Email],
            auto_verify: vec![StandardAttribute::Email],
            standard_attributes: vec![StandardAttributeSettings {
                attribute: StandardAttribute::Email,
                required: true,
                mutable: false,
            }],
            password_policy: PasswordPolicy::default(),
            removal_policy: RemovalPolicy::Destroy,
            client_name: "terranexa-dev-projovo-user-pool-client".to_string(),
            auth_flows: vec![AuthFlow::UserPassword, AuthFlow::UserSrp],
            token_lifetimes: TokenLifetimeSettings::default(),
            strict_token_lifetimes: false,
            group_names: GroupRole::ALL.iter().map(|r| r.to_string()).collect(),
            exchange_name: "terranexa-dev-projovo-user-pool-client-identity-pool".to_string(),
            allow_unauthenticated: false,
            server_side_token_check: true,
            expose_exchange_output: true,
        }
    }
}

/// Configuration after local validation, ready for graph construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedConfig {
    pub token_lifetimes: TokenLifetimes,
    /// Parsed group roles, same order as configured, repeats kept.
    pub roles: Vec<GroupRole>,
}

impl StackConfig {
    /// Load from `config/stack.{toml,yaml,json}` (optional) and the
    /// environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("config/stack")
    }

    /// Load with defaults → `file_stem` (optional, any supported format) →
    /// `PROJOVO__*` environment variables.
    pub fn load_from(file_stem: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&StackConfig::default())?)
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix("PROJOVO")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("group_names")
                    .with_list_parse_key("auth_flows")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, BuildError> {
        let t = &self.token_lifetimes;
        Ok(TokenLifetimes::from_secs(t.access_secs, t.id_secs, t.refresh_secs)?)
    }

    /// Local checks that need no graph. Duplicate group names are left for
    /// construction, which reports them as [`BuildError::DuplicateGroup`].
    pub(crate) fn validate(&self) -> Result<ValidatedConfig, BuildError> {
        for (field, value) in [
            ("stack_name", &self.stack_name),
            ("directory_name", &self.directory_name),
            ("client_name", &self.client_name),
            ("exchange_name", &self.exchange_name),
        ] {
            if value.trim().is_empty() {
                return Err(BuildError::InvalidConfig(format!("{field} must not be empty")));
            }
        }

        if self.group_names.is_empty() {
            return Err(BuildError::InvalidConfig(
                "group_names must not be empty".to_string(),
            ));
        }
        if self.auth_flows.is_empty() {
            return Err(BuildError::InvalidConfig(
                "auth_flows must not be empty".to_string(),
            ));
        }

        let mut attributes = HashSet::new();
        for settings in &self.standard_attributes {
            if !attributes.insert(settings.attribute) {
                return Err(BuildError::InvalidConfig(format!(
                    "standard attribute '{}' configured more than once",
                    settings.attribute.provider_name()
                )));
            }
        }

        self.password_policy.validate()?;
        let token_lifetimes = self.token_lifetimes()?;

        if self.strict_token_lifetimes {
            if let Some(finding) = token_lifetimes.findings().into_iter().next() {
                return Err(BuildError::InvalidConfig(finding.to_string()));
            }
        }

        let roles = self
            .group_names
            .iter()
            .map(|name| name.parse::<GroupRole>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedConfig {
            token_lifetimes,
            roles,
        })
    }
}
