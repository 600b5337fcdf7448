//! Engine configuration.

use crate::types::RelationshipKind;

/// Configuration for the interaction engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Refresh the affected object's derived count after every successful
    /// toggle. A failed refresh is logged, never surfaced as a toggle
    /// failure.
    pub refresh_counts_after_toggle: bool,
    /// Relationship kinds hydrated by [`hydrate`](crate::engine::InteractionEngine::hydrate)
    /// at session start.
    pub hydrate_kinds: Vec<RelationshipKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_counts_after_toggle: true,
            hydrate_kinds: RelationshipKind::ALL.to_vec(),
        }
    }
}
