//! Registered chat users and their Clash Royale identity, persisted as a JSON file.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{domain::UserId, errors::Error, tag::Tag, utils::iso_timestamp_utc, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub royale_nickname: Option<String>,
    /// Normalized player tag, without `#`.
    pub royale_tag: Option<String>,
    pub joined_at: String,
    pub updated_at: String,
}

impl UserRecord {
    fn new(user_id: UserId, username: Option<String>) -> Self {
        let now = iso_timestamp_utc();
        Self {
            user_id: user_id.0,
            username,
            royale_nickname: None,
            royale_tag: None,
            joined_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.royale_tag.as_deref().map(Tag::new)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    users: BTreeMap<i64, UserRecord>,
}

/// File-backed user store. Every mutation rewrites the whole file.
pub struct UserStore {
    path: PathBuf,
    inner: Mutex<StoreFile>,
}

impl UserStore {
    /// Open the store at `path`; a missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = load_store_file(&path)?;
        Ok(Self {
            path,
            inner: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a user seen in chat, or refresh the username of a known one.
    pub async fn add_user(&self, user_id: UserId, username: Option<String>) -> Result<UserRecord> {
        self.mutate(|data| {
            data.users
                .entry(user_id.0)
                .and_modify(|r| {
                    if username.is_some() && r.username != username {
                        r.username = username.clone();
                        r.updated_at = iso_timestamp_utc();
                    }
                })
                .or_insert_with(|| UserRecord::new(user_id, username.clone()))
                .clone()
        })
        .await
    }

    /// Store the user's in-game nickname and player tag (normalized).
    pub async fn update_royale_info(
        &self,
        user_id: UserId,
        nickname: &str,
        tag: &Tag,
    ) -> Result<UserRecord> {
        self.mutate(|data| {
            let record = data
                .users
                .entry(user_id.0)
                .or_insert_with(|| UserRecord::new(user_id, None));
            record.royale_nickname = Some(nickname.trim().to_string());
            record.royale_tag = Some(tag.as_str().to_string());
            record.updated_at = iso_timestamp_utc();
            record.clone()
        })
        .await
    }

    /// Apply `change` to a copy, write it, and only then replace the in-memory state.
    async fn mutate(
        &self,
        change: impl FnOnce(&mut StoreFile) -> UserRecord,
    ) -> Result<UserRecord> {
        let mut data = self.inner.lock().await;
        let mut next = data.clone();
        let record = change(&mut next);
        save_store_file(&self.path, &next)?;
        *data = next;
        Ok(record)
    }

    pub async fn get(&self, user_id: UserId) -> Option<UserRecord> {
        self.inner.lock().await.users.get(&user_id.0).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}

fn load_store_file(path: &Path) -> Result<StoreFile> {
    if !path.exists() {
        return Ok(StoreFile::default());
    }
    let txt = std::fs::read_to_string(path)?;
    if txt.trim().is_empty() {
        return Ok(StoreFile::default());
    }
    serde_json::from_str(&txt).map_err(|e| Error::Store {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn save_store_file(path: &Path, data: &StoreFile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let txt = serde_json::to_string_pretty(data)?;
    std::fs::write(path, txt)?;
    Ok(())
}
