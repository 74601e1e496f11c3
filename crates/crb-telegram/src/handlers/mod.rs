//! Telegram update handlers.
//!
//! Routing order for a message:
//! - new chat members are greeted and stored
//! - `/commands` go to [`commands::handle_command`]
//! - other text continues a pending registration, if any
//!
//! `chat_member` updates greet users whose status moves from absent to present.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatMemberUpdated, Message},
};

use crb_core::domain::{ChatId, UserId};

use crate::router::AppState;

mod commands;
mod members;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);

    if let Some(new_members) = msg.new_chat_members() {
        members::welcome_new_members(&state, chat_id, new_members).await;
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with('/') {
        return commands::handle_command(&msg, text, &state).await;
    }

    if let Some(user) = msg.from() {
        let user_id = UserId(user.id.0 as i64);
        if state.registrations.is_pending(chat_id, user_id).await {
            members::continue_registration(&state, chat_id, user_id, text).await;
        }
    }

    Ok(())
}

pub async fn handle_chat_member(
    upd: ChatMemberUpdated,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    if members::joined(&upd.old_chat_member.kind, &upd.new_chat_member.kind) {
        let chat_id = ChatId(upd.chat.id.0);
        let user = std::slice::from_ref(&upd.new_chat_member.user);
        members::welcome_new_members(&state, chat_id, user).await;
    }
    Ok(())
}

/// Send HTML, logging (not propagating) delivery failures.
pub(crate) async fn reply_html(state: &AppState, chat_id: ChatId, html: &str) {
    if let Err(e) = state.messenger.send_html(chat_id, html).await {
        tracing::warn!(chat_id = chat_id.0, error = %e, "failed to send reply");
    }
}
