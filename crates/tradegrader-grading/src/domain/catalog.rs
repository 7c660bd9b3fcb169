//! Searchable list of players.

use std::path::Path;

use serde::Deserialize;
use tradegrader_core::error::DomainError;
use tradegrader_core::model::Player;

const FALLBACK_PLAYERS: [(&str, &str, &str); 20] = [
    ("Christian McCaffrey", "SF", "RB"),
    ("Tyreek Hill", "MIA", "WR"),
    ("Justin Jefferson", "MIN", "WR"),
    ("Ja'Marr Chase", "CIN", "WR"),
    ("Travis Kelce", "KC", "TE"),
    ("Bijan Robinson", "ATL", "RB"),
    ("Stefon Diggs", "BUF", "WR"),
    ("Saquon Barkley", "NYG", "RB"),
    ("Josh Allen", "BUF", "QB"),
    ("Patrick Mahomes", "KC", "QB"),
    ("Jalen Hurts", "PHI", "QB"),
    ("CeeDee Lamb", "DAL", "WR"),
    ("Davante Adams", "LV", "WR"),
    ("Austin Ekeler", "LAC", "RB"),
    ("Tony Pollard", "DAL", "RB"),
    ("Derrick Henry", "TEN", "RB"),
    ("Amon-Ra St. Brown", "DET", "WR"),
    ("Mark Andrews", "BAL", "TE"),
    ("DeVonta Smith", "PHI", "WR"),
    ("Kenneth Walker III", "SEA", "RB"),
];

/// One entry of a catalog file. `display` is derived when absent.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    team: String,
    position: String,
    display: Option<String>,
}

impl From<CatalogEntry> for Player {
    fn from(entry: CatalogEntry) -> Self {
        let mut player = Player::new(&entry.name, &entry.team, &entry.position);
        if let Some(display) = entry.display.filter(|d| !d.trim().is_empty()) {
            player.display = display;
        }
        player
    }
}

/// The players the search endpoint can suggest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCatalog {
    players: Vec<Player>,
}

impl PlayerCatalog {
    /// Creates a catalog from an explicit list.
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// The built-in list of twenty well-known players.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(
            FALLBACK_PLAYERS
                .iter()
                .map(|(name, team, position)| Player::new(name, team, position))
                .collect(),
        )
    }

    /// Reads a JSON array of `{name, team, position, display?}` objects.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file cannot be read or
    /// parsed, and `DomainError::Validation` if it lists no players.
    pub fn from_json_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read(path).map_err(|e| {
            DomainError::Infrastructure(format!("cannot read {}: {e}", path.display()))
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_slice(&raw).map_err(|e| {
            DomainError::Infrastructure(format!("cannot parse {}: {e}", path.display()))
        })?;
        if entries.is_empty() {
            return Err(DomainError::Validation(format!(
                "{} lists no players",
                path.display()
            )));
        }
        Ok(Self::new(entries.into_iter().map(Player::from).collect()))
    }

    /// Every player, in catalog order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if the catalog holds no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players whose name, team or position contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Player> {
        let needle = query.to_lowercase();
        self.players
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.team.to_lowercase().contains(&needle)
                    || p.position.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}
