//! Timestamped on-disk copy of the last fetched player list.
//!
//! The file holds `{"timestamp": <RFC 3339>, "players": [...]}` and is
//! served until `timestamp + ttl`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tradegrader_core::error::DomainError;
use tradegrader_core::model::Player;

#[derive(Debug, Deserialize)]
struct CacheFile {
    timestamp: DateTime<Utc>,
    players: Vec<Player>,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    timestamp: DateTime<Utc>,
    players: &'a [Player],
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::Infrastructure(format!("cannot write {}: {e}", path.display()))
}

/// Player list cache kept next to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCache {
    path: PathBuf,
    ttl: TimeDelta,
}

impl CatalogCache {
    /// Creates a cache at `path` whose entries live for `ttl`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: TimeDelta) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached players if the file exists, lists players and was
    /// written less than `ttl` before `now`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file exists but cannot
    /// be read or parsed.
    pub fn read_fresh(&self, now: DateTime<Utc>) -> Result<Option<Vec<Player>>, DomainError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no player cache");
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::Infrastructure(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let cache: CacheFile = serde_json::from_slice(&raw).map_err(|e| {
            DomainError::Infrastructure(format!("cannot parse {}: {e}", self.path.display()))
        })?;

        let fresh = cache
            .timestamp
            .checked_add_signed(self.ttl)
            .is_some_and(|expires| expires > now);
        if !fresh {
            info!(cached_at = %cache.timestamp, "player cache expired");
            return Ok(None);
        }
        if cache.players.is_empty() {
            return Ok(None);
        }
        Ok(Some(cache.players))
    }

    /// Writes `players` stamped with `now`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file cannot be written.
    pub fn store(&self, players: &[Player], now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(&self.path, e))?;
        }
        let body = serde_json::to_vec(&CacheFileRef {
            timestamp: now,
            players,
        })
        .map_err(|e| write_error(&self.path, e))?;
        std::fs::write(&self.path, body).map_err(|e| write_error(&self.path, e))?;

        info!(path = %self.path.display(), players = players.len(), "player cache written");
        Ok(())
    }
}
