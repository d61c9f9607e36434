//! Value object trait: equality by value, not identity.
//!
//! Policies and settings attached to resources (password policy, token
//! lifetimes, auth flows) have **no identity**: two policies with the same
//! values are the same policy.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (`PasswordPolicy { min_length: 8, .. }`)
/// - **Entity**: has identity (a user pool node keyed by its logical id)
///
/// Value objects are immutable; to "modify" one, build a new one. Equality by
/// value is what makes a rebuilt resource graph compare equal to the previous
/// one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct PasswordPolicy {
///     min_length: u8,
///     require_symbols: bool,
/// }
///
/// impl ValueObject for PasswordPolicy {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
