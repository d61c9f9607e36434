//! Strongly-typed identifiers used across the stack.
//!
//! A [`LogicalId`] names a resource inside a stack definition and is stable
//! across renders. A [`PhysicalId`] is what the provider assigns once the
//! resource is realized; it never exists before provisioning.

use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a resource node within a stack definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalId(Cow<'static, str>);

/// Identifier assigned by the provider to a realized resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhysicalId(Cow<'static, str>);

fn check_logical(s: &str) -> Result<(), DomainError> {
    if s.is_empty() {
        return Err(DomainError::invalid_id("LogicalId: must not be empty"));
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(DomainError::invalid_id(format!(
            "LogicalId: unexpected character {c:?} in {s:?}"
        )));
    }
    Ok(())
}

fn check_physical(s: &str) -> Result<(), DomainError> {
    if s.trim().is_empty() {
        return Err(DomainError::invalid_id("PhysicalId: must not be empty"));
    }
    Ok(())
}

macro_rules! impl_str_newtype {
    ($t:ty, $check:path) => {
        impl $t {
            /// Create a validated identifier.
            pub fn new(value: impl Into<Cow<'static, str>>) -> Result<Self, DomainError> {
                let value = value.into();
                $check(&value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0.into_owned()
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s.to_string())
            }
        }
    };
}

impl_str_newtype!(LogicalId, check_logical);
impl_str_newtype!(PhysicalId, check_physical);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_id_accepts_construct_style_names() {
        let id = LogicalId::new("Group-agency-member").unwrap();
        assert_eq!(id.as_str(), "Group-agency-member");
        assert_eq!(id.to_string(), "Group-agency-member");
    }

    #[test]
    fn logical_id_rejects_empty_and_bad_characters() {
        assert!(matches!(LogicalId::new(""), Err(DomainError::InvalidId(_))));
        assert!(matches!(
            LogicalId::new("User Pool"),
            Err(DomainError::InvalidId(msg)) if msg.contains("' '")
        ));
    }

    #[test]
    fn physical_id_rejects_blank() {
        assert!(PhysicalId::new("  ").is_err());
        assert_eq!(
            PhysicalId::new("eu-west-1_Ab12").unwrap().as_str(),
            "eu-west-1_Ab12"
        );
    }

    #[test]
    fn ids_serialize_as_plain_strings_and_validate_on_the_way_in() {
        let id = LogicalId::new("ProjovoUserPool").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ProjovoUserPool\"");

        let back: LogicalId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<LogicalId>("\"a b\"").is_err());
    }
}
