use serde::Deserialize;

/// `GET /clans/%23{TAG}/currentwar`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarSnapshot {
    pub state: WarState,
    pub clan: Option<WarClan>,
    pub participants: Vec<WarParticipant>,
    pub collection_end_time: Option<String>,
    pub war_end_time: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarState {
    #[default]
    NotInWar,
    CollectionDay,
    WarDay,
    #[serde(other)]
    Unknown,
}

impl WarState {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotInWar => "not in war",
            Self::CollectionDay => "collection day",
            Self::WarDay => "war day",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarClan {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub participants: u32,
    pub battles_played: u32,
    pub wins: u32,
    pub crowns: u32,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarParticipant {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub cards_earned: u64,
    pub battles_played: u32,
    pub wins: u32,
}
