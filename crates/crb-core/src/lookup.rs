//! Primary → fallback player lookup.

use std::sync::Arc;

use crate::{model::PlayerProfile, outcome::ApiOutcome, ports::PlayerSource};

/// Ordered player sources: the primary API, then at most one fallback.
#[derive(Clone)]
pub struct PlayerLookup {
    primary: Arc<dyn PlayerSource>,
    fallback: Option<Arc<dyn PlayerSource>>,
}

impl PlayerLookup {
    pub fn new(primary: Arc<dyn PlayerSource>, fallback: Option<Arc<dyn PlayerSource>>) -> Self {
        Self { primary, fallback }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// First `Success` wins.
    ///
    /// With a fallback configured, "every source failed" collapses to `NotFound`. Without one,
    /// the primary outcome is returned as-is.
    pub async fn find_player(&self, tag: &str) -> ApiOutcome<PlayerProfile> {
        let primary = self.primary.lookup_player(tag).await;
        if primary.is_success() {
            return primary;
        }

        let Some(fallback) = &self.fallback else {
            return primary;
        };

        tracing::info!(
            tag,
            primary = self.primary.source_name(),
            outcome = primary.label(),
            fallback = fallback.source_name(),
            "primary player lookup failed, trying fallback"
        );

        match fallback.lookup_player(tag).await {
            ApiOutcome::Success(profile) => ApiOutcome::Success(profile),
            other => {
                tracing::warn!(
                    tag,
                    outcome = other.label(),
                    "fallback player lookup failed"
                );
                ApiOutcome::NotFound
            }
        }
    }
}
