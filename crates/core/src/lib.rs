//! `projovo-core`: foundation building blocks shared by the identity stack.
//!
//! This crate contains **pure** primitives (no provisioning or IO concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{LogicalId, PhysicalId};
pub use value_object::ValueObject;
