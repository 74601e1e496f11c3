use serde::Deserialize;

/// One entry of `GET /players/%23{TAG}/battlelog` (the body is a bare JSON array).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleRecord {
    /// `PvP`, `clanWarWarDay`, `challenge`, ...
    #[serde(rename = "type")]
    pub battle_type: Option<String>,
    /// Compact UTC timestamp, e.g. `20240101T120000.000Z`.
    pub battle_time: Option<String>,
    pub game_mode: Option<GameMode>,
    pub team: Vec<BattleSide>,
    pub opponent: Vec<BattleSide>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameMode {
    pub name: Option<String>,
}

/// A player on one side of a battle.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleSide {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub crowns: u32,
    pub starting_trophies: Option<i64>,
    pub trophy_change: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleResult {
    Victory,
    Defeat,
    Draw,
}

impl BattleRecord {
    /// Crowns of our side. In 2v2 every teammate reports the side's total.
    pub fn team_crowns(&self) -> u32 {
        self.team.iter().map(|s| s.crowns).max().unwrap_or(0)
    }

    pub fn opponent_crowns(&self) -> u32 {
        self.opponent.iter().map(|s| s.crowns).max().unwrap_or(0)
    }

    pub fn result(&self) -> BattleResult {
        use std::cmp::Ordering;

        match self.team_crowns().cmp(&self.opponent_crowns()) {
            Ordering::Greater => BattleResult::Victory,
            Ordering::Less => BattleResult::Defeat,
            Ordering::Equal => BattleResult::Draw,
        }
    }

    /// Trophy change of the first player on our side, if the mode awards trophies.
    pub fn trophy_change(&self) -> Option<i64> {
        self.team.first().and_then(|s| s.trophy_change)
    }
}
