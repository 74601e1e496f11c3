//! Formatting of decoded API payloads into Telegram HTML display text.
//!
//! Everything here is pure: no I/O, no failure paths. Missing fields render as sentinels.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::model::{
    clan::MAX_CLAN_MEMBERS, BattleRecord, BattleResult, ClanMember, ClanSummary, PlayerProfile,
    Role, WarParticipant, WarSnapshot, WarState,
};
use crate::outcome::ApiFailure;

/// Members shown by `format_clan_members`.
pub const MEMBER_LIST_LIMIT: usize = 20;
/// Participants shown by `format_current_war`.
pub const WAR_PARTICIPANT_LIMIT: usize = 10;
/// Battles shown by `format_battle_log`.
pub const BATTLE_LOG_LIMIT: usize = 10;

pub const NA: &str = "N/A";
pub const NO_DESCRIPTION: &str = "no description";
pub const NOT_SPECIFIED: &str = "not specified";

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `1234567` → `1,234,567`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Display glyph for a clan role.
pub fn role_glyph(role: Role) -> &'static str {
    match role {
        Role::Leader => "👑",
        Role::CoLeader => "⭐",
        Role::Elder => "🌟",
        Role::Member | Role::Unknown => "👤",
    }
}

/// Members ordered by trophies, highest first. Ties keep their API order.
pub fn sort_members_by_trophies(members: &[ClanMember]) -> Vec<&ClanMember> {
    let mut sorted: Vec<&ClanMember> = members.iter().collect();
    // `sort_by` is stable.
    sorted.sort_by(|a, b| b.trophies.cmp(&a.trophies));
    sorted
}

/// API timestamps look like `20240101T120000.000Z`.
pub fn format_api_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S%.3fZ")
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| escape_html(raw))
}

pub fn format_clan_summary(clan: &ClanSummary) -> String {
    let name = text_or(clan.name.as_deref(), NA);
    let tag = text_or(clan.tag.as_deref(), NA);
    let description = text_or(clan.description.as_deref(), NO_DESCRIPTION);
    let location = text_or(
        clan.location.as_ref().and_then(|l| l.name.as_deref()),
        NOT_SPECIFIED,
    );

    format!(
        "🏰 <b>{name}</b> {tag}\n\n\
         📝 <b>Description:</b> {description}\n\
         👥 <b>Members:</b> {}/{MAX_CLAN_MEMBERS}\n\
         🏆 <b>Clan score:</b> {}\n\
         🎁 <b>Donations per week:</b> {}\n\
         📍 <b>Location:</b> {location}\n\
         🔓 <b>Type:</b> {}\n\
         ⚡ <b>Required trophies:</b> {}",
        clan.member_count(),
        format_thousands(clan.clan_score),
        format_thousands(clan.donations_per_week),
        clan.clan_type.label(),
        format_thousands(clan.required_trophies),
    )
}

pub fn format_player_profile(player: &PlayerProfile) -> String {
    let name = text_or(player.name.as_deref(), NA);
    let tag = text_or(player.tag.as_deref(), NA);

    let mut text = String::new();
    let _ = writeln!(text, "👤 <b>{name}</b> {tag}\n");
    let _ = writeln!(text, "⭐ <b>Level:</b> {}", player.exp_level);
    let _ = writeln!(
        text,
        "🏆 <b>Trophies:</b> {} (best: {})",
        format_thousands(player.trophies),
        format_thousands(player.best_trophies)
    );
    if let Some(clan) = &player.clan {
        let _ = writeln!(
            text,
            "🏰 <b>Clan:</b> {} {}",
            text_or(clan.name.as_deref(), NA),
            text_or(clan.tag.as_deref(), NA)
        );
    }
    text.push('\n');

    let _ = writeln!(text, "⚔️ <b>Battles:</b>");
    let _ = writeln!(text, "   Wins: {}", format_thousands(player.wins));
    let _ = writeln!(text, "   Losses: {}", format_thousands(player.losses));
    let _ = writeln!(text, "   Draws: {}", format_thousands(player.draws));
    let _ = writeln!(text, "   Total: {}", format_thousands(player.total_battles()));
    let _ = writeln!(text, "   Win rate: {:.1}%", player.win_rate());
    let _ = writeln!(
        text,
        "   Three-crown wins: {}\n",
        format_thousands(player.three_crown_wins)
    );

    let _ = writeln!(
        text,
        "🃏 <b>Cards:</b> {}/{}",
        player.cards_found(),
        player.cards.len()
    );
    let _ = writeln!(
        text,
        "🎁 <b>Total donations:</b> {}",
        format_thousands(player.total_donations)
    );
    let _ = writeln!(
        text,
        "⚔️ <b>War day wins:</b> {}",
        format_thousands(player.war_day_wins)
    );
    let _ = write!(
        text,
        "📦 <b>War cards collected:</b> {}",
        format_thousands(player.clan_cards_collected)
    );

    text
}

pub fn format_clan_members(members: &[ClanMember]) -> String {
    let mut text = format!("👥 <b>Clan members ({}):</b>\n\n", members.len());
    if members.is_empty() {
        text.push_str("No members to show.");
        return text;
    }

    for (i, member) in sort_members_by_trophies(members)
        .into_iter()
        .take(MEMBER_LIST_LIMIT)
        .enumerate()
    {
        let _ = writeln!(
            text,
            "{}. {} <b>{}</b>",
            i + 1,
            role_glyph(member.role),
            text_or(member.name.as_deref(), NA)
        );
        let _ = writeln!(
            text,
            "   🏆 {} | 🎁 {}/{}",
            format_thousands(member.trophies),
            format_thousands(member.donations),
            format_thousands(member.donations_received)
        );
    }

    if members.len() > MEMBER_LIST_LIMIT {
        let _ = write!(
            text,
            "\n... and {} more members",
            members.len() - MEMBER_LIST_LIMIT
        );
    }

    text.trim_end().to_string()
}

pub fn format_current_war(war: &WarSnapshot) -> String {
    if war.state == WarState::NotInWar {
        return "⚔️ <b>Clan war</b>\n\nThe clan is not in a war right now.".to_string();
    }

    let mut text = format!("⚔️ <b>Clan war: {}</b>\n", war.state.label());

    if let Some(clan) = &war.clan {
        let _ = writeln!(
            text,
            "🏰 <b>{}</b> {}",
            text_or(clan.name.as_deref(), NA),
            text_or(clan.tag.as_deref(), NA)
        );
        let _ = writeln!(
            text,
            "👥 Participants: {} | ⚔️ Battles: {} | 🏆 Wins: {} | 👑 Crowns: {}",
            format_thousands(u64::from(clan.participants)),
            format_thousands(u64::from(clan.battles_played)),
            format_thousands(u64::from(clan.wins)),
            format_thousands(u64::from(clan.crowns))
        );
    }

    let ends = match war.state {
        WarState::CollectionDay => war.collection_end_time.as_deref(),
        WarState::WarDay => war.war_end_time.as_deref(),
        _ => None,
    };
    if let Some(ends) = ends {
        let _ = writeln!(text, "⏰ Ends: {}", format_api_time(ends));
    }

    if war.participants.is_empty() {
        text.push_str("\nNo participants yet.");
        return text;
    }

    text.push('\n');
    let mut ranked: Vec<&WarParticipant> = war.participants.iter().collect();
    ranked.sort_by(|a, b| b.cards_earned.cmp(&a.cards_earned));
    for (i, p) in ranked.into_iter().take(WAR_PARTICIPANT_LIMIT).enumerate() {
        let _ = writeln!(
            text,
            "{}. <b>{}</b>: 🃏 {} | ⚔️ {}/{}",
            i + 1,
            text_or(p.name.as_deref(), NA),
            format_thousands(p.cards_earned),
            format_thousands(u64::from(p.wins)),
            format_thousands(u64::from(p.battles_played))
        );
    }

    if war.participants.len() > WAR_PARTICIPANT_LIMIT {
        let _ = write!(
            text,
            "\n... and {} more participants",
            war.participants.len() - WAR_PARTICIPANT_LIMIT
        );
    }

    text.trim_end().to_string()
}

pub fn format_battle_log(battles: &[BattleRecord]) -> String {
    let shown = battles.len().min(BATTLE_LOG_LIMIT);
    let mut text = format!("📜 <b>Recent battles ({shown}):</b>\n\n");
    if battles.is_empty() {
        text.push_str("No battles recorded yet.");
        return text;
    }

    for battle in battles.iter().take(BATTLE_LOG_LIMIT) {
        let glyph = match battle.result() {
            BattleResult::Victory => "🏆",
            BattleResult::Defeat => "💀",
            BattleResult::Draw => "🤝",
        };
        let mode = text_or(
            battle
                .game_mode
                .as_ref()
                .and_then(|m| m.name.as_deref())
                .or(battle.battle_type.as_deref()),
            NA,
        );
        let opponents = battle
            .opponent
            .iter()
            .map(|s| text_or(s.name.as_deref(), NA))
            .collect::<Vec<_>>();
        let opponents = if opponents.is_empty() {
            NA.to_string()
        } else {
            opponents.join(" &amp; ")
        };
        let change = match battle.trophy_change() {
            Some(d) if d > 0 => format!(" (+{d})"),
            Some(d) if d < 0 => format!(" ({d})"),
            _ => String::new(),
        };

        let _ = writeln!(
            text,
            "{glyph} {mode} {}-{} vs <b>{opponents}</b>{change}",
            battle.team_crowns(),
            battle.opponent_crowns()
        );
    }

    text.trim_end().to_string()
}

/// What a command was trying to load, for failure messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subject {
    Clan,
    ClanMembers,
    CurrentWar,
    Player,
    BattleLog,
}

impl Subject {
    fn noun(self) -> &'static str {
        match self {
            Self::Clan => "clan information",
            Self::ClanMembers => "the clan member list",
            Self::CurrentWar => "current war information",
            Self::Player => "player statistics",
            Self::BattleLog => "the battle log",
        }
    }
}

/// User-facing message for a failed API call.
pub fn failure_text(subject: Subject, failure: &ApiFailure) -> String {
    match failure {
        ApiFailure::NotFound => match subject {
            Subject::Player | Subject::BattleLog => {
                "❌ Player not found. Check the player tag.".to_string()
            }
            _ => "❌ Clan not found. Check the clan tag.".to_string(),
        },
        ApiFailure::Unauthorized => {
            "❌ The statistics API rejected the bot's API token. Contact the bot administrator."
                .to_string()
        }
        ApiFailure::RateLimited => {
            "⏳ Too many requests to the statistics API. Try again in a minute.".to_string()
        }
        ApiFailure::NetworkError(_) => {
            "❌ Could not reach the statistics API. Try again later.".to_string()
        }
        ApiFailure::Unexpected(_) => {
            format!("❌ Could not load {}. Try again later.", subject.noun())
        }
    }
}

fn text_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BattleSide;
    use serde_json::json;

    fn member(name: &str, trophies: u64) -> ClanMember {
        ClanMember {
            name: Some(name.to_string()),
            trophies,
            ..Default::default()
        }
    }

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn role_glyphs() {
        assert_eq!(role_glyph(Role::Leader), "👑");
        assert_eq!(role_glyph(Role::CoLeader), "⭐");
        assert_eq!(role_glyph(Role::Elder), "🌟");
        assert_eq!(role_glyph(Role::Member), "👤");
        assert_eq!(role_glyph(Role::Unknown), "👤");
    }

    #[test]
    fn member_sort_is_stable() {
        let members = vec![member("A", 100), member("B", 200), member("C", 100)];
        let names: Vec<&str> = sort_members_by_trophies(&members)
            .into_iter()
            .filter_map(|m| m.name.as_deref())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn member_listing_truncates_to_twenty() {
        let members: Vec<ClanMember> = (0..25).map(|i| member(&format!("m{i}"), i)).collect();
        let text = format_clan_members(&members);
        assert!(text.starts_with("👥 <b>Clan members (25):</b>"));
        assert!(text.contains("20. 👤 <b>m5</b>"));
        assert!(!text.contains("21. "));
        assert!(!text.contains("<b>m4</b>"));
        assert!(text.ends_with("\n\n... and 5 more members"));

        let twenty: Vec<ClanMember> = (0..20).map(|i| member(&format!("m{i}"), i)).collect();
        let text = format_clan_members(&twenty);
        assert!(text.contains("20. "));
        assert!(!text.contains("more members"));
    }

    #[test]
    fn member_entry_layout() {
        let mut leader = member("Boss", 6543);
        leader.role = Role::Leader;
        leader.donations = 1200;
        leader.donations_received = 40;
        let text = format_clan_members(&[leader]);
        assert_eq!(
            text,
            "👥 <b>Clan members (1):</b>\n\n1. 👑 <b>Boss</b>\n   🏆 6,543 | 🎁 1,200/40"
        );
    }

    #[test]
    fn empty_member_listing() {
        assert_eq!(
            format_clan_members(&[]),
            "👥 <b>Clan members (0):</b>\n\nNo members to show."
        );
    }

    #[test]
    fn clan_summary_from_empty_payload_uses_sentinels() {
        let clan: ClanSummary = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            format_clan_summary(&clan),
            "🏰 <b>N/A</b> N/A\n\n\
             📝 <b>Description:</b> no description\n\
             👥 <b>Members:</b> 0/50\n\
             🏆 <b>Clan score:</b> 0\n\
             🎁 <b>Donations per week:</b> 0\n\
             📍 <b>Location:</b> not specified\n\
             🔓 <b>Type:</b> open\n\
             ⚡ <b>Required trophies:</b> 0"
        );
    }

    #[test]
    fn clan_summary_full() {
        let clan: ClanSummary = serde_json::from_value(json!({
            "tag": "#9YJ0UR",
            "name": "Knights & <Dragons>",
            "description": "Daily war",
            "members": 48,
            "clanScore": 61234,
            "donationsPerWeek": 12000,
            "location": { "name": "Europe" },
            "type": "inviteOnly",
            "requiredTrophies": 5000
        }))
        .unwrap();
        let text = format_clan_summary(&clan);
        assert!(text.starts_with("🏰 <b>Knights &amp; &lt;Dragons&gt;</b> #9YJ0UR\n\n"));
        assert!(text.contains("👥 <b>Members:</b> 48/50\n"));
        assert!(text.contains("🏆 <b>Clan score:</b> 61,234\n"));
        assert!(text.contains("🎁 <b>Donations per week:</b> 12,000\n"));
        assert!(text.contains("📍 <b>Location:</b> Europe\n"));
        assert!(text.contains("🔓 <b>Type:</b> invite only\n"));
        assert!(text.ends_with("⚡ <b>Required trophies:</b> 5,000"));
    }

    #[test]
    fn player_profile_from_empty_payload() {
        let player: PlayerProfile = serde_json::from_value(json!({})).unwrap();
        let text = format_player_profile(&player);
        assert!(text.starts_with("👤 <b>N/A</b> N/A\n\n"));
        assert!(text.contains("   Total: 0\n"));
        assert!(text.contains("   Win rate: 0.0%\n"));
        assert!(text.contains("🃏 <b>Cards:</b> 0/0\n"));
        assert!(!text.contains("<b>Clan:</b>"));
    }

    #[test]
    fn player_profile_numbers() {
        let player: PlayerProfile = serde_json::from_value(json!({
            "tag": "#2PP",
            "name": "Chief",
            "expLevel": 14,
            "trophies": 7012,
            "bestTrophies": 7500,
            "wins": 7,
            "losses": 3,
            "threeCrownWins": 2,
            "cards": [ { "maxLevel": 14 }, { "maxLevel": 0 } ],
            "totalDonations": 123456,
            "warDayWins": 12,
            "clanCardsCollected": 45000,
            "clan": { "tag": "#9YJ0UR", "name": "Royal Guard" }
        }))
        .unwrap();
        let text = format_player_profile(&player);
        assert!(text.contains("🏆 <b>Trophies:</b> 7,012 (best: 7,500)\n"));
        assert!(text.contains("🏰 <b>Clan:</b> Royal Guard #9YJ0UR\n"));
        assert!(text.contains("   Total: 10\n"));
        assert!(text.contains("   Win rate: 70.0%\n"));
        assert!(text.contains("🃏 <b>Cards:</b> 1/2\n"));
        assert!(text.contains("🎁 <b>Total donations:</b> 123,456\n"));
        assert!(text.ends_with("📦 <b>War cards collected:</b> 45,000"));
    }

    #[test]
    fn war_not_in_war() {
        let war: WarSnapshot = serde_json::from_value(json!({ "state": "notInWar" })).unwrap();
        assert!(format_current_war(&war).contains("not in a war"));
    }

    #[test]
    fn war_day_listing() {
        let participants: Vec<serde_json::Value> = (0..12)
            .map(|i| json!({ "name": format!("p{i}"), "cardsEarned": i * 100, "battlesPlayed": 1, "wins": i % 2 }))
            .collect();
        let war: WarSnapshot = serde_json::from_value(json!({
            "state": "warDay",
            "warEndTime": "20240102T093000.000Z",
            "clan": { "tag": "#9YJ0UR", "name": "Royal Guard", "participants": 12, "battlesPlayed": 10, "wins": 6, "crowns": 11 },
            "participants": participants
        }))
        .unwrap();
        let text = format_current_war(&war);
        assert!(text.starts_with("⚔️ <b>Clan war: war day</b>\n🏰 <b>Royal Guard</b> #9YJ0UR\n"));
        assert!(text.contains("👥 Participants: 12 | ⚔️ Battles: 10 | 🏆 Wins: 6 | 👑 Crowns: 11\n"));
        assert!(text.contains("⏰ Ends: 2024-01-02 09:30 UTC\n"));
        assert!(text.contains("1. <b>p11</b>: 🃏 1,100 | ⚔️ 1/1\n"));
        assert!(!text.contains("<b>p1</b>"));
        assert!(text.ends_with("... and 2 more participants"));
    }

    #[test]
    fn war_counts_use_separators() {
        let war: WarSnapshot = serde_json::from_value(json!({
            "state": "collectionDay",
            "clan": { "name": "Royal Guard", "participants": 50, "battlesPlayed": 1200, "wins": 1001, "crowns": 25000 },
            "participants": [ { "name": "a", "cardsEarned": 5000, "battlesPlayed": 1500, "wins": 1000 } ]
        }))
        .unwrap();
        let text = format_current_war(&war);
        assert!(text.contains("👥 Participants: 50 | ⚔️ Battles: 1,200 | 🏆 Wins: 1,001 | 👑 Crowns: 25,000\n"));
        assert!(text.contains("1. <b>a</b>: 🃏 5,000 | ⚔️ 1,000/1,500"));
    }

    #[test]
    fn battle_log_lines() {
        let battles = vec![
            BattleRecord {
                game_mode: Some(crate::model::GameMode {
                    name: Some("Ladder".into()),
                }),
                team: vec![BattleSide {
                    crowns: 3,
                    trophy_change: Some(30),
                    ..Default::default()
                }],
                opponent: vec![BattleSide {
                    name: Some("Bob".into()),
                    crowns: 1,
                    ..Default::default()
                }],
                ..Default::default()
            },
            BattleRecord {
                battle_type: Some("PvP".into()),
                team: vec![BattleSide {
                    trophy_change: Some(-28),
                    ..Default::default()
                }],
                opponent: vec![BattleSide {
                    crowns: 2,
                    ..Default::default()
                }],
                ..Default::default()
            },
        ];
        assert_eq!(
            format_battle_log(&battles),
            "📜 <b>Recent battles (2):</b>\n\n\
             🏆 Ladder 3-1 vs <b>Bob</b> (+30)\n\
             💀 PvP 0-2 vs <b>N/A</b> (-28)"
        );
        assert_eq!(
            format_battle_log(&[]),
            "📜 <b>Recent battles (0):</b>\n\nNo battles recorded yet."
        );
    }

    #[test]
    fn battle_log_caps_at_ten() {
        let battles = vec![BattleRecord::default(); 15];
        let text = format_battle_log(&battles);
        assert!(text.starts_with("📜 <b>Recent battles (10):</b>"));
        assert_eq!(text.matches("🤝").count(), 10);
    }

    #[test]
    fn api_time_falls_back_to_raw() {
        assert_eq!(format_api_time("20240101T120000.000Z"), "2024-01-01 12:00 UTC");
        assert_eq!(format_api_time("soon"), "soon");
    }

    #[test]
    fn failure_messages() {
        assert!(failure_text(Subject::Player, &ApiFailure::NotFound).contains("Player not found"));
        assert!(failure_text(Subject::ClanMembers, &ApiFailure::NotFound).contains("Clan not found"));
        assert!(failure_text(Subject::Clan, &ApiFailure::RateLimited).contains("Too many requests"));
        assert_eq!(
            failure_text(Subject::BattleLog, &ApiFailure::Unexpected("x".into())),
            "❌ Could not load the battle log. Try again later."
        );
    }
}
