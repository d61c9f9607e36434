//! Entity trait: identity + continuity across re-renders.

/// Entity marker + minimal interface.
///
/// Resource nodes are entities: two nodes with the same logical id describe the
/// same deployed resource, even if their attributes differ between renders.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
