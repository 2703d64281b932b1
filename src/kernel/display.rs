//! Vote tally behind the planet display.
//!
//! The roster is the catalog's distinct extensions. Backend counts are merged
//! in by extension id, and live rocket launches bump them between refreshes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::distinct_extensions;

/// One entry of `GET /extensions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteExtension {
    pub id: String,
    #[serde(default)]
    pub rockets: Option<u64>,
    #[serde(default)]
    pub votes: Option<u64>,
}

impl RemoteExtension {
    /// `rockets` is what the backend stores per vote. A zero or missing
    /// count falls through to `votes`.
    pub fn vote_count(&self) -> u64 {
        self.rockets
            .filter(|&r| r > 0)
            .or(self.votes)
            .unwrap_or(0)
    }
}

/// Body of `GET /stats`. Only the totals are typed, the rest is kept as sent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendStats {
    pub total_votes: Option<u64>,
    pub total_extensions: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub id: String,
    pub name: &'static str,
    pub icon: &'static str,
    pub votes: u64,
}

#[derive(Debug, Clone)]
pub struct Roster {
    standings: Vec<Standing>,
}

impl Roster {
    /// Every distinct catalog extension at zero votes, in catalog order.
    pub fn from_catalog() -> Self {
        let standings = distinct_extensions()
            .into_iter()
            .map(|extension| Standing {
                id: extension.id(),
                name: extension.name,
                icon: extension.icon,
                votes: 0,
            })
            .collect();
        Self { standings }
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn get(&self, id: &str) -> Option<&Standing> {
        self.standings.iter().find(|s| s.id == id)
    }

    /// Overwrites counts with the backend's for every id both sides know.
    /// Entries the backend omits keep their count; unknown backend ids are
    /// ignored. Returns how many counts changed.
    pub fn merge(&mut self, remote: &[RemoteExtension]) -> usize {
        let mut changed = 0;
        for standing in &mut self.standings {
            let Some(entry) = remote.iter().find(|r| r.id == standing.id) else {
                continue;
            };
            let votes = entry.vote_count();
            if votes != standing.votes {
                standing.votes = votes;
                changed += 1;
            }
        }
        changed
    }

    /// Counts one live launch. `None` when the id is not on the roster.
    pub fn record_launch(&mut self, extension_id: &str) -> Option<u64> {
        let standing = self.standings.iter_mut().find(|s| s.id == extension_id)?;
        standing.votes += 1;
        Some(standing.votes)
    }

    pub fn total_votes(&self) -> u64 {
        self.standings.iter().map(|s| s.votes).sum()
    }

    /// Most votes first; equal counts keep catalog order.
    pub fn ranking(&self) -> Vec<&Standing> {
        let mut ranked: Vec<&Standing> = self.standings.iter().collect();
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));
        ranked
    }
}
