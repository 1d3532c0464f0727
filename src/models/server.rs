// src/models/server.rs
use serde::{Deserialize, Serialize};

/// Full directory record. The server URL is the identity: upserting the
/// same URL twice replaces the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameServer {
    pub serverurl: String,
    pub game: String,
    pub platform: String,
    pub appkey: i32,
    pub status: String,
    pub curplayers: i32,
    pub maxplayers: i32,
    /// Unix seconds of the last upsert, stamped by storage.
    pub last_seen: u64,
}

impl Default for GameServer {
    fn default() -> Self {
        Self {
            serverurl: String::new(),
            game: String::new(),
            platform: String::new(),
            appkey: -1,
            status: String::new(),
            curplayers: 0,
            maxplayers: 0,
            last_seen: 0,
        }
    }
}

impl GameServer {
    /// Collects every problem with an uploaded record; an empty vec
    /// means the record is acceptable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.serverurl.is_empty() {
            errors.push("serverurl: must be at least 1 char".to_string());
        }
        if self.serverurl.len() > 128 {
            errors.push("serverurl: too long (max 128 chars)".to_string());
        }
        if self.game.is_empty() {
            errors.push("game: must be at least 1 char".to_string());
        }
        if self.game.len() > 64 {
            errors.push("game: too long (max 64 chars)".to_string());
        }
        if self.platform.is_empty() {
            errors.push("platform: must be at least 1 char".to_string());
        }
        if self.platform.len() > 32
            || !self
                .platform
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            errors.push("platform: must be <= 32 chars, only a-z and 0-9".to_string());
        }
        if self.status.is_empty() {
            errors.push("status: must be at least 1 char".to_string());
        }
        if self.status.len() > 16 {
            errors.push("status: too long (max 16 chars)".to_string());
        }
        if self.appkey < -1 {
            errors.push("appkey: must be -1 (unset) or a non-negative value".to_string());
        }
        if self.curplayers < 0 {
            errors.push("curplayers: must not be negative".to_string());
        }
        if self.maxplayers <= 0 {
            errors.push("maxplayers: must be greater than 0".to_string());
        }

        errors
    }

    /// Projects the record down to what a client needs to pick a server.
    /// Total and read-only: never fails, never touches the record.
    pub fn minimize(&self) -> GameServerMin {
        GameServerMin {
            serverurl: self.serverurl.clone(),
            curplayers: self.curplayers,
            maxplayers: self.maxplayers,
            online: self.status == "online",
        }
    }
}

/// Discovery projection of a [`GameServer`]: just enough to list and
/// join. Lives only for the duration of one listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameServerMin {
    pub serverurl: String,
    pub curplayers: i32,
    pub maxplayers: i32,
    pub online: bool,
}

/// Delete request body: the record identity is the URL alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameServerDelete {
    pub serverurl: String,
}

impl GameServerDelete {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.serverurl.is_empty() {
            errors.push("serverurl: must be at least 1 char".to_string());
        }
        if self.serverurl.len() > 128 {
            errors.push("serverurl: too long (max 128 chars)".to_string());
        }

        errors
    }
}
