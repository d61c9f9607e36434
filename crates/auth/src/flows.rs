use serde::{Deserialize, Serialize};

/// Authentication flow a client may use against the directory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthFlow {
    /// Plain username/password sent to the provider.
    UserPassword,
    /// Secure Remote Password exchange.
    UserSrp,
    AdminUserPassword,
    Custom,
}

impl AuthFlow {
    /// Provider-side flow name.
    pub fn provider_name(&self) -> &'static str {
        match self {
            AuthFlow::UserPassword => "ALLOW_USER_PASSWORD_AUTH",
            AuthFlow::UserSrp => "ALLOW_USER_SRP_AUTH",
            AuthFlow::AdminUserPassword => "ALLOW_ADMIN_USER_PASSWORD_AUTH",
            AuthFlow::Custom => "ALLOW_CUSTOM_AUTH",
        }
    }
}

/// Refresh is always allowed once any other flow is enabled.
pub const REFRESH_TOKEN_FLOW: &str = "ALLOW_REFRESH_TOKEN_AUTH";
