//! Secondary player source.
//!
//! Serves `GET {base}/player/{TAG}` with the bare tag and a nested payload of its own.
//! Only player profiles are available here; the response is mapped into [`PlayerProfile`].

use std::time::Duration;

use async_trait::async_trait;
use crb_core::{
    config::Config,
    model::{CardSummary, PlayerProfile},
    outcome::ApiOutcome,
    ports::PlayerSource,
    tag::Tag,
    Result,
};
use serde::Deserialize;

use crate::http;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    player: Option<FallbackPlayer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FallbackPlayer {
    tag: Option<String>,
    name: Option<String>,
    level: u32,
    trophies: Trophies,
    battles: Battles,
    donations: Donations,
    war: War,
    cards: Vec<FallbackCard>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Trophies {
    current: u64,
    best: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Battles {
    wins: u64,
    losses: u64,
    draws: u64,
    three_crowns: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Donations {
    total: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct War {
    day_wins: u64,
    cards_collected: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FallbackCard {
    name: Option<String>,
    level: u32,
    max_level: u32,
}

impl FallbackPlayer {
    fn into_profile(self, requested: &Tag) -> PlayerProfile {
        let tag = self
            .tag
            .map(|t| Tag::new(&t))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| requested.clone());

        PlayerProfile {
            tag: Some(tag.to_string()),
            name: self.name,
            exp_level: self.level,
            trophies: self.trophies.current,
            best_trophies: self.trophies.best,
            wins: self.battles.wins,
            losses: self.battles.losses,
            draws: self.battles.draws,
            three_crown_wins: self.battles.three_crowns,
            cards: self
                .cards
                .into_iter()
                .map(|c| CardSummary {
                    name: c.name,
                    level: c.level,
                    max_level: c.max_level,
                })
                .collect(),
            total_donations: self.donations.total,
            war_day_wins: self.war.day_wins,
            clan_cards_collected: self.war.cards_collected,
            clan: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FallbackClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl FallbackClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http: http::build_http(timeout)?,
        })
    }

    /// `None` when no fallback base URL is configured.
    pub fn from_config(cfg: &Config) -> Result<Option<Self>> {
        cfg.fallback_api_base_url
            .as_ref()
            .map(|base| Self::new(base.clone(), cfg.fallback_api_token.clone(), cfg.api_timeout))
            .transpose()
    }
}

#[async_trait]
impl PlayerSource for FallbackClient {
    fn source_name(&self) -> &'static str {
        "fallback"
    }

    async fn lookup_player(&self, tag: &str) -> ApiOutcome<PlayerProfile> {
        let tag = Tag::new(tag);
        let url = format!("{}/player/{}", self.base_url, tag.as_str());
        tracing::debug!(%url, "fallback request");

        match http::get_json::<Envelope>(&self.http, &url, self.token.as_deref()).await {
            ApiOutcome::Success(Envelope {
                player: Some(player),
            }) => ApiOutcome::Success(player.into_profile(&tag)),
            ApiOutcome::Success(Envelope { player: None }) => {
                tracing::warn!(%url, "fallback response has no player object");
                ApiOutcome::NotFound
            }
            other => other.map(|_| PlayerProfile::default()),
        }
    }
}
