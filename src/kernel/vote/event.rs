use rand::Rng;
use serde::{Deserialize, Serialize};

/// One vote waiting for backend submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEvent {
    pub extension_id: String,
    pub voter_name: String,
    /// Empty when the voter did not give one.
    pub job_position: String,
    pub combo_count: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterInfo {
    pub name: String,
    pub job_position: String,
}

const FALLBACK_VOTERS: &[&str] = &[
    "Frontend Engineer Min",
    "Backend Developer Hua",
    "DevOps Chiang",
    "Fullstack Engineer Mei",
    "Senior Developer Nobita",
    "UI Designer Shizuka",
    "Project Manager Chih-ming",
    "Test Engineer Chun-chiao",
    "Architect Jay",
    "Product Manager Chi",
    "Sysadmin Hao",
    "Data Scientist Ya-ting",
    "Mobile Developer Kuo",
    "QA Engineer Shu-fen",
    "Tech Lead Wei",
    "Frontend Architect Mei-ling",
    "Cloud Engineer Chun-hung",
    "AI Engineer Yi-chun",
    "Security Expert Shih-chieh",
    "Blockchain Developer Pei",
];

impl VoterInfo {
    pub fn new(name: impl Into<String>, job_position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job_position: job_position.into(),
        }
    }

    /// Stand-in voter for sessions where nobody entered their details.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let name = FALLBACK_VOTERS[rng.gen_range(0..FALLBACK_VOTERS.len())];
        Self::new(name, "")
    }

    pub fn is_set(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// `name (job)` or just `name`.
    pub fn display_name(&self) -> String {
        if self.job_position.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.job_position)
        }
    }
}

/// Live notification for the planet display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RocketLaunch {
    pub extension_id: String,
    pub voter_name: String,
    pub job_position: String,
    pub timestamp: i64,
}

impl From<&VoteEvent> for RocketLaunch {
    fn from(event: &VoteEvent) -> Self {
        Self {
            extension_id: event.extension_id.clone(),
            voter_name: event.voter_name.clone(),
            job_position: event.job_position.clone(),
            timestamp: event.timestamp,
        }
    }
}

/// What the caller gets back immediately after casting a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    pub extension_id: String,
    pub combo_count: u32,
    pub label: Option<String>,
    pub display_name: String,
}

/// Non-blocking delivery problems, surfaced as soft warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteNotice {
    /// The batch endpoint failed; votes are being retried one by one.
    DeliveryDegraded { batch_size: usize, reason: String },
    /// A vote failed on the single-vote endpoint as well.
    VoteLost { event: VoteEvent, reason: String },
}
