//! Resolver tunables

/// Recursion ceiling for recipe expansion (root = depth 0).
///
/// A safety valve against malformed or cyclic catalog data, not a
/// business rule: well-formed recipes are far shallower.
pub const MAX_DEPTH: usize = 10;

/// Distinct goals that must need an item before it is flagged high priority
pub const HIGH_PRIORITY_GOALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub max_depth: usize,
    pub high_priority_goals: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            high_priority_goals: HIGH_PRIORITY_GOALS,
        }
    }
}
