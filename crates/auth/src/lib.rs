//! `projovo-auth`: identity-policy value objects for the user directory.
//!
//! Everything here is a pure value: no provider calls, no storage.

pub mod attributes;
pub mod flows;
pub mod lifetimes;
pub mod password;
pub mod roles;

pub use attributes::{SignInAlias, StandardAttribute, StandardAttributeSettings};
pub use flows::AuthFlow;
pub use lifetimes::{LifetimeFinding, TokenLifetimes};
pub use password::PasswordPolicy;
pub use roles::GroupRole;
