use serde::Deserialize;

/// `GET /players/%23{TAG}`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerProfile {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub exp_level: u32,
    pub trophies: u64,
    pub best_trophies: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub three_crown_wins: u64,
    pub cards: Vec<CardSummary>,
    pub total_donations: u64,
    pub war_day_wins: u64,
    pub clan_cards_collected: u64,
    pub clan: Option<PlayerClan>,
}

impl PlayerProfile {
    /// Saturates at `u64::MAX` rather than overflowing on absurd payloads.
    pub fn total_battles(&self) -> u64 {
        self.wins.saturating_add(self.losses).saturating_add(self.draws)
    }

    /// Wins as a percentage of all battles; `0.0` with no battles.
    pub fn win_rate(&self) -> f64 {
        let total = self.total_battles();
        if total == 0 {
            return 0.0;
        }
        (self.wins as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Cards the player has unlocked (`maxLevel > 0`).
    pub fn cards_found(&self) -> usize {
        self.cards.iter().filter(|c| c.max_level > 0).count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardSummary {
    pub name: Option<String>,
    pub level: u32,
    pub max_level: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerClan {
    pub tag: Option<String>,
    pub name: Option<String>,
}
