//! Clash Royale statistics adapters.
//!
//! [`RoyaleClient`] talks to the official API (or any proxy with the same shape).
//! [`FallbackClient`] is the secondary player source used when the primary lookup fails.

mod fallback;
mod http;

use std::time::Duration;

use async_trait::async_trait;
use crb_core::{
    config::Config,
    model::{BattleRecord, ClanMember, ClanSummary, Page, PlayerProfile, WarSnapshot},
    outcome::ApiOutcome,
    ports::{PlayerSource, StatsApi},
    tag::Tag,
    Result,
};

pub use fallback::FallbackClient;

#[derive(Clone, Debug)]
pub struct RoyaleClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl RoyaleClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let token = token.into();
        if token.trim().is_empty() {
            tracing::warn!(
                %base_url,
                "CR_API_TOKEN is empty; requests will be sent without authorization"
            );
        }
        Ok(Self {
            base_url,
            token,
            http: http::build_http(timeout)?,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.royale_api_base_url.clone(),
            cfg.royale_api_token.clone(),
            cfg.api_timeout,
        )
    }

    fn clan_url(&self, tag: &str, suffix: &str) -> String {
        format!("{}/clans/{}{suffix}", self.base_url, Tag::new(tag).url_segment())
    }

    fn player_url(&self, tag: &str, suffix: &str) -> String {
        format!("{}/players/{}{suffix}", self.base_url, Tag::new(tag).url_segment())
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: String) -> ApiOutcome<T> {
        tracing::debug!(%url, "api request");
        http::get_json(&self.http, &url, Some(self.token.trim())).await
    }
}

#[async_trait]
impl StatsApi for RoyaleClient {
    async fn fetch_clan_summary(&self, tag: &str) -> ApiOutcome<ClanSummary> {
        self.get(self.clan_url(tag, "")).await
    }

    async fn fetch_clan_members(&self, tag: &str) -> ApiOutcome<Vec<ClanMember>> {
        self.get::<Page<ClanMember>>(self.clan_url(tag, "/members"))
            .await
            .map(|page| page.items)
    }

    async fn fetch_player_profile(&self, tag: &str) -> ApiOutcome<PlayerProfile> {
        self.get(self.player_url(tag, "")).await
    }

    async fn fetch_current_war(&self, tag: &str) -> ApiOutcome<WarSnapshot> {
        self.get(self.clan_url(tag, "/currentwar")).await
    }

    async fn fetch_battle_log(&self, tag: &str) -> ApiOutcome<Vec<BattleRecord>> {
        self.get(self.player_url(tag, "/battlelog")).await
    }
}

#[async_trait]
impl PlayerSource for RoyaleClient {
    fn source_name(&self) -> &'static str {
        "clashroyale"
    }

    async fn lookup_player(&self, tag: &str) -> ApiOutcome<PlayerProfile> {
        self.fetch_player_profile(tag).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: &str) -> RoyaleClient {
        RoyaleClient::new(server.uri(), token, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn clan_summary_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clans/%239YJ0UR"))
            .and(header("authorization", "Bearer secret"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tag": "#9YJ0UR",
                "name": "Royal Guard",
                "members": 42,
                "clanScore": 51000,
                "type": "inviteOnly",
                "location": { "name": "Europe" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server, "secret").fetch_clan_summary("#9yj0ur").await;
        let ApiOutcome::Success(clan) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(clan.name.as_deref(), Some("Royal Guard"));
        assert_eq!(clan.member_count(), 42);
    }

    #[tokio::test]
    async fn members_unwrap_items_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clans/%239YJ0UR/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "name": "A", "trophies": 100 },
                    { "name": "B", "trophies": 200 }
                ]
            })))
            .mount(&server)
            .await;

        let members = client(&server, "t")
            .fetch_clan_members("9YJ0UR")
            .await
            .into_result()
            .unwrap();
        let names: Vec<_> = members.iter().filter_map(|m| m.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn war_and_battle_log_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clans/%239YJ0UR/currentwar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "warDay" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/players/%232PP/battlelog"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, "t");
        assert!(c.fetch_current_war("#9YJ0UR").await.is_success());
        assert_eq!(
            c.fetch_battle_log("2pp").await.map(|battles| battles.len()),
            ApiOutcome::Success(0)
        );
    }

    #[tokio::test]
    async fn status_classification() {
        let server = MockServer::start().await;
        for (tag, status) in [("AAA", 401), ("BBB", 403), ("CCC", 404), ("DDD", 429), ("EEE", 503)] {
            Mock::given(method("GET"))
                .and(path(format!("/players/%23{tag}")))
                .respond_with(ResponseTemplate::new(status).set_body_string("reason"))
                .mount(&server)
                .await;
        }

        let c = client(&server, "t");
        assert_eq!(c.fetch_player_profile("AAA").await, ApiOutcome::Unauthorized);
        assert_eq!(c.fetch_player_profile("BBB").await, ApiOutcome::Unauthorized);
        assert_eq!(c.fetch_player_profile("CCC").await, ApiOutcome::NotFound);
        assert_eq!(c.fetch_player_profile("DDD").await, ApiOutcome::RateLimited);
        assert_eq!(
            c.fetch_player_profile("EEE").await,
            ApiOutcome::Unexpected("HTTP 503: reason".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_body_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/players/%232PP"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let outcome = client(&server, "t").fetch_player_profile("2PP").await;
        assert!(matches!(outcome, ApiOutcome::Unexpected(_)), "{outcome:?}");
    }

    /// Serves one response that promises more body bytes than it sends, then hangs up.
    async fn truncated_body_server(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial"
                );
                let _ = socket.write_all(resp.as_bytes()).await;
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn status_wins_over_broken_error_body() {
        let base = truncated_body_server("404 Not Found").await;
        let c = RoyaleClient::new(base, "t", Duration::from_secs(5)).unwrap();
        assert_eq!(c.fetch_player_profile("2PP").await, ApiOutcome::NotFound);
    }

    #[tokio::test]
    async fn broken_success_body_is_network_error() {
        let base = truncated_body_server("200 OK").await;
        let c = RoyaleClient::new(base, "t", Duration::from_secs(5)).unwrap();
        let outcome = c.fetch_player_profile("2PP").await;
        assert!(matches!(outcome, ApiOutcome::NetworkError(_)), "{outcome:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let c = RoyaleClient::new("http://127.0.0.1:1", "t", Duration::from_secs(2)).unwrap();
        let outcome = c.fetch_clan_summary("9YJ0UR").await;
        assert!(matches!(outcome, ApiOutcome::NetworkError(_)), "{outcome:?}");
    }

    #[tokio::test]
    async fn empty_token_sends_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/players/%232PP"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Alice" })))
            .mount(&server)
            .await;

        let outcome = client(&server, "").fetch_player_profile("2PP").await;
        assert!(outcome.is_success());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }
}
