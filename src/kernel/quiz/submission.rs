use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::answers::QuizAnswers;
use super::engine::best_bundle;
use crate::kernel::vote::event::VoterInfo;

/// Payload for `POST /quiz/submit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub answers: BTreeMap<String, String>,
    pub user_info: VoterInfo,
    /// RFC 3339 with millisecond precision.
    pub completed_at: String,
    /// Seconds from quiz start to completion, when the start was observed.
    pub time_taken: Option<u64>,
    pub recommended_package: u8,
}

impl QuizSubmission {
    pub fn new(
        answers: &QuizAnswers,
        user_info: VoterInfo,
        started_at: Option<DateTime<Utc>>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let time_taken = started_at.map(|start| {
            let millis = (completed_at - start).num_milliseconds().max(0) as u64;
            (millis + 500) / 1000
        });

        Self {
            answers: answers.to_raw(),
            user_info,
            completed_at: completed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            time_taken,
            recommended_package: best_bundle(answers).get(),
        }
    }
}
