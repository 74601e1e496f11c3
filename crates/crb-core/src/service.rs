//! Command-level reports: fetch, classify, format.
//!
//! Every method returns finished display text. API failures become user-facing messages here;
//! nothing is propagated to the chat adapter.

use std::sync::Arc;

use crate::{
    formatting::{
        failure_text, format_battle_log, format_clan_members, format_clan_summary,
        format_current_war, format_player_profile, Subject,
    },
    lookup::PlayerLookup,
    outcome::ApiOutcome,
    ports::StatsApi,
    tag::Tag,
};

pub const CLAN_TAG_MISSING: &str =
    "❌ The clan tag is not configured. Contact the bot administrator.";

pub struct StatsService {
    api: Arc<dyn StatsApi>,
    players: PlayerLookup,
    clan_tag: Option<Tag>,
}

impl StatsService {
    pub fn new(api: Arc<dyn StatsApi>, players: PlayerLookup, clan_tag: Option<Tag>) -> Self {
        Self {
            api,
            players,
            clan_tag,
        }
    }

    pub fn clan_tag(&self) -> Option<&Tag> {
        self.clan_tag.as_ref()
    }

    pub async fn clan_report(&self) -> String {
        let Some(tag) = &self.clan_tag else {
            return CLAN_TAG_MISSING.to_string();
        };
        render(
            Subject::Clan,
            self.api.fetch_clan_summary(tag.as_str()).await,
            |clan| format_clan_summary(&clan),
        )
    }

    pub async fn members_report(&self) -> String {
        let Some(tag) = &self.clan_tag else {
            return CLAN_TAG_MISSING.to_string();
        };
        render(
            Subject::ClanMembers,
            self.api.fetch_clan_members(tag.as_str()).await,
            |members| format_clan_members(&members),
        )
    }

    pub async fn war_report(&self) -> String {
        let Some(tag) = &self.clan_tag else {
            return CLAN_TAG_MISSING.to_string();
        };
        render(
            Subject::CurrentWar,
            self.api.fetch_current_war(tag.as_str()).await,
            |war| format_current_war(&war),
        )
    }

    /// Player profile via the primary source, then the fallback.
    pub async fn player_report(&self, tag: &Tag) -> String {
        render(
            Subject::Player,
            self.players.find_player(tag.as_str()).await,
            |player| format_player_profile(&player),
        )
    }

    pub async fn battles_report(&self, tag: &Tag) -> String {
        render(
            Subject::BattleLog,
            self.api.fetch_battle_log(tag.as_str()).await,
            |battles| format_battle_log(&battles),
        )
    }
}

fn render<T>(subject: Subject, outcome: ApiOutcome<T>, format: impl FnOnce(T) -> String) -> String {
    match outcome.into_result() {
        Ok(value) => format(value),
        Err(failure) => {
            tracing::debug!(?subject, %failure, "reporting api failure to user");
            failure_text(subject, &failure)
        }
    }
}
