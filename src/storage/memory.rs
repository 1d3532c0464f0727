// src/storage/memory.rs
use dashmap::DashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use crate::models::server::GameServer;
use crate::config::Config;

/// In-memory record store keyed by server URL.
///
/// Reads come back ordered by (game, serverurl) so pagination and the
/// game-grouped lobby view stay stable across calls. Operations return
/// `Result` to keep the handler error paths honest even though this
/// backend's reads cannot fail.
pub struct ServerStorage {
    servers: DashMap<String, GameServer>,
    config: Config,
}

impl ServerStorage {
    pub fn new(config: Config) -> Self {
        Self {
            servers: DashMap::new(),
            config,
        }
    }

    /// Inserts or replaces the record for `server.serverurl`, stamping
    /// `last_seen`. New records are refused once the directory holds
    /// `max_servers` entries; updates of known URLs always go through.
    /// Returns the record as stored.
    pub fn upsert(&self, mut server: GameServer) -> Result<GameServer, String> {
        if !self.servers.contains_key(&server.serverurl)
            && self.servers.len() >= self.config.max_servers
        {
            return Err(format!(
                "server directory is full ({} entries)",
                self.config.max_servers
            ));
        }

        server.last_seen = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        self.servers.insert(server.serverurl.clone(), server.clone());

        Ok(server)
    }

    /// Removes the record if present. Deleting an unknown URL is not an
    /// error.
    pub fn delete(&self, serverurl: &str) -> Result<(), String> {
        self.servers.remove(serverurl);
        Ok(())
    }

    /// One page of records for a platform. An `appkey` of -1 matches
    /// every app key; negative `pagesize`/`offset` values behave as
    /// zero.
    pub fn get_by(
        &self,
        platform: &str,
        appkey: i32,
        pagesize: i32,
        offset: i32,
    ) -> Result<Vec<GameServer>, String> {
        let mut matching: Vec<GameServer> = self
            .servers
            .iter()
            .filter(|r| r.value().platform == platform)
            .filter(|r| appkey == -1 || r.value().appkey == appkey)
            .map(|r| r.value().clone())
            .collect();
        sort_records(&mut matching);

        let offset = usize::try_from(offset).unwrap_or(0);
        let pagesize = usize::try_from(pagesize).unwrap_or(0);

        Ok(matching.into_iter().skip(offset).take(pagesize).collect())
    }

    /// Every stored record, in the same ordering as `get_by`.
    pub fn get_all(&self) -> Result<Vec<GameServer>, String> {
        let mut records: Vec<GameServer> =
            self.servers.iter().map(|r| r.value().clone()).collect();
        sort_records(&mut records);

        Ok(records)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

fn sort_records(records: &mut [GameServer]) {
    records.sort_by(|a, b| {
        a.game
            .cmp(&b.game)
            .then_with(|| a.serverurl.cmp(&b.serverurl))
    });
}
