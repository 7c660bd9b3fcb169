//! Startup assembly of the player catalog.

use std::path::Path;

use tracing::{info, warn};
use tradegrader_core::clock::Clock;

use super::catalog_cache::CatalogCache;
use super::player_feed::RankingsFeed;
use crate::domain::catalog::PlayerCatalog;

/// Builds the catalog from the first source that yields players:
///
/// 1. the override file at `override_path`, when set;
/// 2. the cache, when written less than its TTL ago;
/// 3. the live feed, whose result is written back to the cache;
/// 4. the built-in list.
///
/// Failures at each step are logged and never abort startup. The built-in
/// list is never cached, so the next start tries the feed again.
pub async fn load_catalog(
    override_path: Option<&Path>,
    cache: &CatalogCache,
    feed: &RankingsFeed,
    clock: &dyn Clock,
) -> PlayerCatalog {
    if let Some(path) = override_path {
        match PlayerCatalog::from_json_file(path) {
            Ok(catalog) => {
                info!(path = %path.display(), players = catalog.len(), "player catalog loaded");
                return catalog;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "ignoring player catalog file"),
        }
    }

    let now = clock.now();
    match cache.read_fresh(now) {
        Ok(Some(players)) => {
            info!(players = players.len(), "player catalog served from cache");
            return PlayerCatalog::new(players);
        }
        Ok(None) => {}
        Err(e) => warn!(path = %cache.path().display(), error = %e, "unusable player cache"),
    }

    match feed.fetch().await {
        Ok(players) => {
            if let Err(e) = cache.store(&players, now) {
                warn!(error = %e, "player cache not written");
            }
            PlayerCatalog::new(players)
        }
        Err(e) => {
            warn!(url = feed.url(), error = %e, "player feed unavailable, using built-in list");
            PlayerCatalog::fallback()
        }
    }
}
