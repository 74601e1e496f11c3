//! Decoded statistics API payloads.
//!
//! Every field defaults when absent so a partially-shaped payload still decodes and
//! formats. A field with the wrong JSON type is still a decode error.

pub mod battle;
pub mod clan;
pub mod player;
pub mod war;

use serde::Deserialize;

pub use battle::{BattleRecord, BattleResult, BattleSide, GameMode};
pub use clan::{ClanMember, ClanSummary, ClanType, Location, Role};
pub use player::{CardSummary, PlayerClan, PlayerProfile};
pub use war::{WarClan, WarParticipant, WarSnapshot, WarState};

/// List envelope used by the API (`{"items": [...]}`).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}
