//! `/setnick` conversation: nickname first, then player tag.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::{
    domain::{ChatId, UserId},
    tag::Tag,
};

pub const MIN_NICKNAME_LEN: usize = 2;
pub const MIN_TAG_LEN: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    AwaitingNickname,
    AwaitingTag { nickname: String },
}

/// What the handler should do with a message from a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationReply {
    /// The user has no registration in progress; handle the message normally.
    NotPending,
    NicknameTooShort,
    /// Nickname accepted, ask for the tag next.
    AskTag { nickname: String },
    TagTooShort,
    Completed { nickname: String, tag: Tag },
}

/// A dialog belongs to one user in one chat.
type DialogKey = (ChatId, UserId);

/// In-memory registration state, keyed by chat and user.
#[derive(Default)]
pub struct Registrations {
    pending: Mutex<HashMap<DialogKey, Step>>,
}

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) registration for `user` in `chat`.
    pub async fn begin(&self, chat: ChatId, user: UserId) {
        self.pending
            .lock()
            .await
            .insert((chat, user), Step::AwaitingNickname);
    }

    /// Returns `true` if a registration was in progress.
    pub async fn cancel(&self, chat: ChatId, user: UserId) -> bool {
        self.pending.lock().await.remove(&(chat, user)).is_some()
    }

    pub async fn is_pending(&self, chat: ChatId, user: UserId) -> bool {
        self.pending.lock().await.contains_key(&(chat, user))
    }

    /// Feed one message from `user` in `chat` into their registration.
    ///
    /// Invalid input keeps the current step so the user can try again. Messages from other
    /// chats do not touch the dialog.
    pub async fn handle_input(&self, chat: ChatId, user: UserId, text: &str) -> RegistrationReply {
        let key = (chat, user);
        let mut pending = self.pending.lock().await;
        let Some(step) = pending.get(&key).cloned() else {
            return RegistrationReply::NotPending;
        };

        match step {
            Step::AwaitingNickname => {
                let nickname = text.trim();
                if nickname.chars().count() < MIN_NICKNAME_LEN {
                    return RegistrationReply::NicknameTooShort;
                }
                pending.insert(
                    key,
                    Step::AwaitingTag {
                        nickname: nickname.to_string(),
                    },
                );
                RegistrationReply::AskTag {
                    nickname: nickname.to_string(),
                }
            }
            Step::AwaitingTag { nickname } => {
                let tag = Tag::new(text);
                if tag.len() < MIN_TAG_LEN {
                    return RegistrationReply::TagTooShort;
                }
                pending.remove(&key);
                RegistrationReply::Completed { nickname, tag }
            }
        }
    }
}
