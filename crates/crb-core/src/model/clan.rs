use serde::Deserialize;

/// Upper bound on clan size enforced by the game.
pub const MAX_CLAN_MEMBERS: u32 = 50;

/// `GET /clans/%23{TAG}`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClanSummary {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Member count as reported by the API.
    pub members: u32,
    pub clan_score: u64,
    pub clan_war_trophies: u64,
    pub donations_per_week: u64,
    pub location: Option<Location>,
    #[serde(rename = "type")]
    pub clan_type: ClanType,
    pub required_trophies: u64,
    pub member_list: Vec<ClanMember>,
}

impl ClanSummary {
    /// Member count clamped to what a clan can actually hold.
    pub fn member_count(&self) -> u32 {
        self.members.min(MAX_CLAN_MEMBERS)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub name: Option<String>,
    pub is_country: bool,
    pub country_code: Option<String>,
}

/// Membership policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClanType {
    #[default]
    Open,
    InviteOnly,
    Closed,
    #[serde(other)]
    Unknown,
}

impl ClanType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InviteOnly => "invite only",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

/// One entry of `GET /clans/%23{TAG}/members`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClanMember {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub exp_level: u32,
    pub trophies: u64,
    pub donations: u64,
    pub donations_received: u64,
}

/// Clan role, most privileged first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Leader,
    #[serde(alias = "co-leader", alias = "coleader")]
    CoLeader,
    Elder,
    #[default]
    Member,
    #[serde(other)]
    Unknown,
}
