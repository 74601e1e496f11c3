use async_trait::async_trait;

use crate::{
    model::{BattleRecord, ClanMember, ClanSummary, PlayerProfile, WarSnapshot},
    outcome::ApiOutcome,
};

/// Hexagonal port for the statistics service.
///
/// Every operation takes a raw tag string (with or without `#`, any case) and resolves to an
/// [`ApiOutcome`]; implementations never panic or return errors.
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn fetch_clan_summary(&self, tag: &str) -> ApiOutcome<ClanSummary>;

    /// Members in the order the service returns them.
    async fn fetch_clan_members(&self, tag: &str) -> ApiOutcome<Vec<ClanMember>>;

    async fn fetch_player_profile(&self, tag: &str) -> ApiOutcome<PlayerProfile>;

    async fn fetch_current_war(&self, tag: &str) -> ApiOutcome<WarSnapshot>;

    /// Most recent battle first.
    async fn fetch_battle_log(&self, tag: &str) -> ApiOutcome<Vec<BattleRecord>>;
}

/// Anything that can resolve a player tag into a [`PlayerProfile`].
///
/// Implemented by the primary API client and by the fallback source.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    /// Short name for logs.
    fn source_name(&self) -> &'static str;

    async fn lookup_player(&self, tag: &str) -> ApiOutcome<PlayerProfile>;
}
