use serde::{Deserialize, Serialize};

use projovo_core::ValueObject;

/// Identifier a member may sign in with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInAlias {
    Username,
    Email,
    Phone,
}

/// Standard profile attribute known to the directory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardAttribute {
    Email,
    PhoneNumber,
}

impl StandardAttribute {
    /// Provider-side attribute name.
    pub fn provider_name(&self) -> &'static str {
        match self {
            StandardAttribute::Email => "email",
            StandardAttribute::PhoneNumber => "phone_number",
        }
    }
}

/// Required/mutable flags for one standard attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardAttributeSettings {
    pub attribute: StandardAttribute,
    pub required: bool,
    pub mutable: bool,
}

impl ValueObject for StandardAttributeSettings {}
