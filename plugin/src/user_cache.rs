//! Persistent pairing between TeamSpeak users and game players.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::UserCacheError;

type ReadErrorHandler = Box<dyn FnMut(&str) + Send>;

/// On-disk layout. Player ids are keys, so they are stored as strings.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    chat_users: BTreeMap<String, String>,
    #[serde(default)]
    players: BTreeMap<String, String>,
    #[serde(default)]
    pairings: BTreeMap<String, BTreeSet<u64>>,
}

/// Everything the cache knows, in memory form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Entries {
    chat_users: BTreeMap<String, String>,
    players: BTreeMap<u64, String>,
    pairings: BTreeMap<String, BTreeSet<u64>>,
}

impl Entries {
    /// Entries present here but not in `base`, including renamed users.
    fn added_since(&self, base: &Entries) -> Entries {
        let chat_users = self
            .chat_users
            .iter()
            .filter(|(id, nick)| base.chat_users.get(*id) != Some(*nick))
            .map(|(id, nick)| (id.clone(), nick.clone()))
            .collect();
        let players = self
            .players
            .iter()
            .filter(|(id, name)| base.players.get(*id) != Some(*name))
            .map(|(id, name)| (*id, name.clone()))
            .collect();
        let pairings = self
            .pairings
            .iter()
            .filter_map(|(user, ids)| {
                let new_ids: BTreeSet<u64> = match base.pairings.get(user) {
                    Some(known) => ids.difference(known).copied().collect(),
                    None => ids.clone(),
                };
                (!new_ids.is_empty()).then(|| (user.clone(), new_ids))
            })
            .collect();
        Entries { chat_users, players, pairings }
    }

    fn extend(&mut self, other: Entries) {
        self.chat_users.extend(other.chat_users);
        self.players.extend(other.players);
        for (user, ids) in other.pairings {
            self.pairings.entry(user).or_default().extend(ids);
        }
    }
}

impl From<CacheFile> for Entries {
    fn from(file: CacheFile) -> Self {
        let mut players = BTreeMap::new();
        for (id, name) in file.players {
            match id.parse::<u64>() {
                Ok(id) => {
                    players.insert(id, name);
                }
                Err(_) => warn!("Ignoring player with invalid id {:?} in user cache", id),
            }
        }
        Self {
            chat_users: file.chat_users,
            players,
            pairings: file.pairings,
        }
    }
}

impl From<&Entries> for CacheFile {
    fn from(entries: &Entries) -> Self {
        Self {
            chat_users: entries.chat_users.clone(),
            players: entries
                .players
                .iter()
                .map(|(id, name)| (id.to_string(), name.clone()))
                .collect(),
            pairings: entries.pairings.clone(),
        }
    }
}

/// TeamSpeak users, game players and their pairings, backed by a user-editable file.
pub struct UserCache {
    path: PathBuf,
    write_enabled: bool,
    /// File contents as of the last load or save.
    synced_contents: Option<String>,
    /// What the file held at `synced_contents`; anything beyond it is pending.
    synced: Entries,
    entries: Entries,
    on_read_error: Option<ReadErrorHandler>,
}

impl UserCache {
    /// Creates an empty cache backed by `path`. Nothing is read until [`UserCache::init`].
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_enabled: true,
            synced_contents: None,
            synced: Entries::default(),
            entries: Entries::default(),
            on_read_error: None,
        }
    }

    /// Registers a callback invoked with the error text whenever reading the file fails.
    pub fn on_read_error(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.on_read_error = Some(Box::new(handler));
    }

    /// Loads the cache file. A missing file leaves the cache empty.
    ///
    /// # Errors
    /// Returns [`UserCacheError::Read`] if the file cannot be parsed.
    pub fn init(&mut self) -> Result<(), UserCacheError> {
        if let Some(contents) = self.read_file()? {
            let loaded = self.parse(&contents)?;
            self.entries = loaded.clone();
            self.synced = loaded;
            self.synced_contents = Some(contents);
            info!("Loaded user cache from {:?}", self.path);
        }
        Ok(())
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_write_enabled(&self) -> bool {
        self.write_enabled
    }

    pub fn set_write_enabled(&mut self, enabled: bool) {
        self.write_enabled = enabled;
    }

    /// Whether in-memory changes have not reached the file yet.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.entries != self.synced
    }

    pub fn add_chat_user(&mut self, unique_id: &str, nick: &str) {
        self.entries
            .chat_users
            .insert(unique_id.to_owned(), nick.to_owned());
    }

    pub fn add_player(&mut self, id: u64, name: &str) {
        self.entries.players.insert(id, name.to_owned());
    }

    /// Pairs a game player with a TeamSpeak user. Both must have been added before.
    ///
    /// # Errors
    /// Returns [`UserCacheError::UnknownPlayer`] or [`UserCacheError::UnknownChatUser`].
    pub fn pair(&mut self, player_id: u64, user_unique_id: &str) -> Result<(), UserCacheError> {
        if !self.entries.players.contains_key(&player_id) {
            return Err(UserCacheError::UnknownPlayer(player_id));
        }
        if !self.entries.chat_users.contains_key(user_unique_id) {
            return Err(UserCacheError::UnknownChatUser(user_unique_id.to_owned()));
        }
        if self
            .entries
            .pairings
            .entry(user_unique_id.to_owned())
            .or_default()
            .insert(player_id)
        {
            debug!("Paired player {} with chat user {}", player_id, user_unique_id);
        }
        Ok(())
    }

    /// Player ids paired with the given TeamSpeak user, in ascending order.
    #[must_use]
    pub fn paired_player_ids(&self, user_unique_id: &str) -> Vec<u64> {
        self.entries
            .pairings
            .get(user_unique_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn chat_user_nick(&self, unique_id: &str) -> Option<&str> {
        self.entries.chat_users.get(unique_id).map(String::as_str)
    }

    #[must_use]
    pub fn player_name(&self, id: u64) -> Option<&str> {
        self.entries.players.get(&id).map(String::as_str)
    }

    /// Picks up external edits of the file and writes pending changes back.
    ///
    /// An edited file replaces the in-memory cache, so entries removed by hand
    /// stay removed. Entries added in memory since the last sync are kept on top.
    ///
    /// # Errors
    /// Returns [`UserCacheError::Read`] if the changed file cannot be parsed; the
    /// in-memory cache and the file are then left as they are.
    pub fn sync(&mut self) -> Result<(), UserCacheError> {
        if let Some(contents) = self.read_file()? {
            if self.synced_contents.as_deref() != Some(contents.as_str()) {
                let loaded = self.parse(&contents)?;
                let pending = self.entries.added_since(&self.synced);

                self.entries = loaded.clone();
                self.entries.extend(pending);
                self.synced = loaded;
                self.synced_contents = Some(contents);
                info!("Reloaded user cache from {:?}", self.path);
            }
        }

        if self.has_pending_changes() && self.write_enabled {
            self.save()?;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), UserCacheError> {
        let contents = toml::to_string_pretty(&CacheFile::from(&self.entries))?;
        fs::write(&self.path, &contents)?;
        self.synced = self.entries.clone();
        self.synced_contents = Some(contents);
        debug!("Saved user cache to {:?}", self.path);
        Ok(())
    }

    fn read_file(&self) -> Result<Option<String>, UserCacheError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn parse(&mut self, contents: &str) -> Result<Entries, UserCacheError> {
        toml::from_str::<CacheFile>(contents)
            .map(Entries::from)
            .map_err(|e| {
                let message = e.to_string();
                error!("Failed to parse user cache {:?}: {}", self.path, message);
                if let Some(handler) = self.on_read_error.as_mut() {
                    handler(&message);
                }
                UserCacheError::Read { path: self.path.clone(), message }
            })
    }
}

/// Runs [`UserCache::sync`] every `interval` until the returned task is aborted.
pub fn spawn_sync(cache: Arc<Mutex<UserCache>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = cache.lock().await.sync() {
                warn!("User cache sync failed: {}", e);
            }
        }
    })
}
