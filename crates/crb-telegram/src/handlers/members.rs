//! New chat members and the `/setnick` account-linking dialog.

use teloxide::types::{ChatMemberKind, User};

use crb_core::{
    domain::{ChatId, UserId},
    formatting::escape_html,
    registration::{RegistrationReply, MIN_NICKNAME_LEN, MIN_TAG_LEN},
};

use crate::router::AppState;

use super::reply_html;

fn welcome_text(first_name: &str) -> String {
    format!(
        "👋 Welcome, <b>{}</b>!\n\nLink your Clash Royale account with /setnick \
so /player and /battles work without a tag.",
        escape_html(first_name)
    )
}

fn reply_text(reply: &RegistrationReply) -> Option<String> {
    let text = match reply {
        RegistrationReply::NotPending => return None,
        RegistrationReply::NicknameTooShort => format!(
            "❌ The nickname must be at least {MIN_NICKNAME_LEN} characters. Try again or /cancel."
        ),
        RegistrationReply::AskTag { nickname } => format!(
            "Nickname <b>{}</b> saved.\n\nNow send your player tag, for example <code>#2PP</code>.",
            escape_html(nickname)
        ),
        RegistrationReply::TagTooShort => format!(
            "❌ The tag must be at least {MIN_TAG_LEN} characters. Try again or /cancel."
        ),
        RegistrationReply::Completed { nickname, tag } => format!(
            "✅ Account linked: <b>{}</b> <code>{}</code>",
            escape_html(nickname),
            escape_html(&tag.to_string())
        ),
    };
    Some(text)
}

/// A member update counts as a join when the user was absent (left, banned) and now is not.
pub(super) fn joined(old: &ChatMemberKind, new: &ChatMemberKind) -> bool {
    !old.is_present() && new.is_present()
}

pub(super) async fn welcome_new_members(state: &AppState, chat_id: ChatId, users: &[User]) {
    for user in users.iter().filter(|u| !u.is_bot) {
        let user_id = UserId(user.id.0 as i64);
        if let Err(e) = state.users.add_user(user_id, user.username.clone()).await {
            tracing::error!(user_id = user_id.0, error = %e, "failed to store new member");
        }
        reply_html(state, chat_id, &welcome_text(&user.first_name)).await;
    }
}

pub(super) async fn start_registration(state: &AppState, chat_id: ChatId, user_id: UserId) {
    state.registrations.begin(chat_id, user_id).await;
    reply_html(
        state,
        chat_id,
        "✏️ Send your Clash Royale nickname.\n\nUse /cancel to stop.",
    )
    .await;
}

pub(super) async fn continue_registration(
    state: &AppState,
    chat_id: ChatId,
    user_id: UserId,
    text: &str,
) {
    let reply = state.registrations.handle_input(chat_id, user_id, text).await;

    if let RegistrationReply::Completed { nickname, tag } = &reply {
        if let Err(e) = state.users.update_royale_info(user_id, nickname, tag).await {
            tracing::error!(user_id = user_id.0, error = %e, "failed to save linked account");
            reply_html(state, chat_id, "❌ Could not save your account. Try again later.").await;
            return;
        }
        tracing::info!(user_id = user_id.0, tag = %tag, "account linked");
    }

    if let Some(text) = reply_text(&reply) {
        reply_html(state, chat_id, &text).await;
    }
}
