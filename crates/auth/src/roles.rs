use core::str::FromStr;

use serde::{Deserialize, Serialize};

use projovo_core::DomainError;

/// Authorization group a directory member can belong to.
///
/// The set is closed: a group name outside of it is a configuration error,
/// not a new role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupRole {
    Admin,
    AgencyMember,
    ClientMember,
}

impl GroupRole {
    /// Every role, in the order the shipped stack declares them.
    pub const ALL: [GroupRole; 3] = [
        GroupRole::Admin,
        GroupRole::AgencyMember,
        GroupRole::ClientMember,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Admin => "admin",
            GroupRole::AgencyMember => "agency-member",
            GroupRole::ClientMember => "client-member",
        }
    }
}

impl core::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown group '{s}' (expected one of: admin, agency-member, client-member)"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_declared_role() {
        for role in GroupRole::ALL {
            assert_eq!(role.as_str().parse::<GroupRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_group_is_a_validation_error() {
        let err = "superuser".parse::<GroupRole>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("superuser")));
    }

    #[test]
    fn serde_uses_the_group_name() {
        let json = serde_json::to_string(&GroupRole::AgencyMember).unwrap();
        assert_eq!(json, "\"agency-member\"");
    }
}
