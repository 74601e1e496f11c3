use teloxide::{prelude::*, types::Message};

use crb_core::{
    domain::{ChatId, UserId},
    formatting::escape_html,
    tag::Tag,
    users::UserRecord,
};

use crate::router::AppState;

use super::{members, reply_html};

const START_TEXT: &str = "👋 <b>Clash Royale stats bot</b>\n\n\
I show statistics for our clan and its players.\n\n\
<b>📋 Commands:</b>\n\
/clan - Clan summary\n\
/members - Clan members by trophies\n\
/war - Current clan war\n\
/player [tag] - Player profile\n\
/battles [tag] - Recent battles\n\
/setnick - Link your Clash Royale account\n\
/me - Show your linked account\n\
/help - Command reference";

const HELP_TEXT: &str = "📖 <b>Commands</b>\n\n\
/clan - Clan summary\n\
/members - Top clan members by trophies\n\
/war - Current clan war status\n\
/player [tag] - Player profile\n\
/battles [tag] - Last battles of a player\n\
/setnick - Link your nickname and player tag\n\
/cancel - Abort linking\n\
/me - Show your linked account\n\n\
<b>💡 Tips:</b>\n\
• Tags work with or without <code>#</code>, in any case: <code>#2PP</code>, <code>2pp</code>\n\
• Without a tag, /player and /battles use your linked account";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Tag from the command argument, else the caller's linked tag.
fn resolve_tag(arg: &str, linked: Option<&UserRecord>) -> Option<Tag> {
    if !arg.trim().is_empty() {
        return Some(Tag::new(arg)).filter(|t| !t.is_empty());
    }
    linked.and_then(UserRecord::tag).filter(|t| !t.is_empty())
}

fn usage_hint(cmd: &str) -> String {
    format!(
        "ℹ️ Usage: <code>/{cmd} #TAG</code>\nOr link your account with /setnick to skip the tag."
    )
}

fn format_me(record: Option<&UserRecord>) -> String {
    let Some(record) = record else {
        return "You have not linked an account yet. Use /setnick.".to_string();
    };
    match (record.royale_nickname.as_deref(), record.tag()) {
        (Some(nickname), Some(tag)) => format!(
            "👤 <b>Your account</b>\n\nNickname: <b>{}</b>\nTag: <code>{}</code>",
            escape_html(nickname),
            escape_html(&tag.to_string())
        ),
        _ => "You have not linked an account yet. Use /setnick.".to_string(),
    }
}

async fn loading(state: &AppState, chat_id: ChatId, what: &str) {
    reply_html(state, chat_id, &format!("⏳ Loading {what}...")).await;
}

pub async fn handle_command(msg: &Message, text: &str, state: &AppState) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from().map(|u| UserId(u.id.0 as i64));

    let (cmd, arg) = parse_command(text);
    tracing::info!(command = %cmd, chat_id = chat_id.0, user_id = user_id.map(|u| u.0), "command");

    match cmd.as_str() {
        "start" => reply_html(state, chat_id, START_TEXT).await,
        "help" => reply_html(state, chat_id, HELP_TEXT).await,

        "clan" => {
            loading(state, chat_id, "clan information").await;
            let text = state.stats.clan_report().await;
            reply_html(state, chat_id, &text).await;
        }

        "members" => {
            loading(state, chat_id, "clan members").await;
            let text = state.stats.members_report().await;
            reply_html(state, chat_id, &text).await;
        }

        "war" => {
            loading(state, chat_id, "war information").await;
            let text = state.stats.war_report().await;
            reply_html(state, chat_id, &text).await;
        }

        "player" | "battles" => {
            let linked = match user_id {
                Some(id) => state.users.get(id).await,
                None => None,
            };
            let Some(tag) = resolve_tag(&arg, linked.as_ref()) else {
                reply_html(state, chat_id, &usage_hint(&cmd)).await;
                return Ok(());
            };

            if cmd == "player" {
                loading(state, chat_id, "player statistics").await;
                let text = state.stats.player_report(&tag).await;
                reply_html(state, chat_id, &text).await;
            } else {
                loading(state, chat_id, "battle log").await;
                let text = state.stats.battles_report(&tag).await;
                reply_html(state, chat_id, &text).await;
            }
        }

        "setnick" => {
            if let Some(user_id) = user_id {
                members::start_registration(state, chat_id, user_id).await;
            }
        }

        "cancel" => {
            let cancelled = match user_id {
                Some(id) => state.registrations.cancel(chat_id, id).await,
                None => false,
            };
            let text = if cancelled {
                "Linking cancelled."
            } else {
                "Nothing to cancel."
            };
            reply_html(state, chat_id, text).await;
        }

        "me" => {
            let record = match user_id {
                Some(id) => state.users.get(id).await,
                None => None,
            };
            reply_html(state, chat_id, &format_me(record.as_ref())).await;
        }

        _ => {
            tracing::debug!(command = %cmd, "unknown command");
        }
    }

    Ok(())
}
