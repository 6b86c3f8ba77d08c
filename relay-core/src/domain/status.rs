//! Stage status, job status snapshots and their classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported by a single stage (release environment or build result)
///
/// Covers the union of the build `status`/`result` and release environment
/// vocabularies. Values the service introduces later land in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageStatus {
    NotStarted,
    Queued,
    Scheduled,
    InProgress,
    Succeeded,
    PartiallySucceeded,
    Failed,
    Canceled,
    Rejected,
    Undefined,
    None,
    #[serde(other)]
    Unknown,
}

impl StageStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::NotStarted => "notStarted",
            StageStatus::Queued => "queued",
            StageStatus::Scheduled => "scheduled",
            StageStatus::InProgress => "inProgress",
            StageStatus::Succeeded => "succeeded",
            StageStatus::PartiallySucceeded => "partiallySucceeded",
            StageStatus::Failed => "failed",
            StageStatus::Canceled => "canceled",
            StageStatus::Rejected => "rejected",
            StageStatus::Undefined => "undefined",
            StageStatus::None => "none",
            StageStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independently tracked phase of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: Option<String>,
    pub status: StageStatus,
}

impl Stage {
    pub fn new(status: StageStatus) -> Self {
        Self { name: None, status }
    }

    pub fn named(name: impl Into<String>, status: StageStatus) -> Self {
        Self {
            name: Some(name.into()),
            status,
        }
    }
}

/// Terminal and failure status sets for one kind of job
///
/// The failure set is always a subset of the terminal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusVocabulary {
    pub terminal: &'static [StageStatus],
    pub failure: &'static [StageStatus],
}

impl StatusVocabulary {
    /// Build results: https://learn.microsoft.com/rest/api/azure/devops/build/builds/get#buildresult
    pub const BUILD: StatusVocabulary = StatusVocabulary {
        terminal: &[
            StageStatus::Succeeded,
            StageStatus::Canceled,
            StageStatus::PartiallySucceeded,
            StageStatus::Failed,
        ],
        failure: &[
            StageStatus::Canceled,
            StageStatus::PartiallySucceeded,
            StageStatus::Failed,
        ],
    };

    /// Release environment statuses
    pub const RELEASE: StatusVocabulary = StatusVocabulary {
        terminal: &[
            StageStatus::Succeeded,
            StageStatus::Canceled,
            StageStatus::PartiallySucceeded,
            StageStatus::Rejected,
        ],
        failure: &[
            StageStatus::Canceled,
            StageStatus::PartiallySucceeded,
            StageStatus::Rejected,
        ],
    };

    pub fn is_terminal(&self, status: StageStatus) -> bool {
        self.terminal.contains(&status)
    }

    pub fn is_failure(&self, status: StageStatus) -> bool {
        self.failure.contains(&status)
    }
}

/// Snapshot of a job's stages at one polling instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub environments: Vec<Stage>,
}

impl JobStatus {
    pub fn new(environments: Vec<Stage>) -> Self {
        Self { environments }
    }

    /// Build a snapshot from bare statuses, one unnamed stage each
    pub fn from_statuses(statuses: impl IntoIterator<Item = StageStatus>) -> Self {
        Self {
            environments: statuses.into_iter().map(Stage::new).collect(),
        }
    }

    /// True when every stage reports a terminal status
    ///
    /// A snapshot without stages is vacuously complete.
    pub fn is_complete(&self, vocabulary: &StatusVocabulary) -> bool {
        self.environments
            .iter()
            .all(|stage| vocabulary.is_terminal(stage.status))
    }

    /// Derived summary of the stage statuses
    pub fn overall_result(&self, vocabulary: &StatusVocabulary) -> OverallResult {
        let Some(first) = self.environments.first() else {
            return OverallResult::Unknown;
        };

        if !self.is_complete(vocabulary) {
            return OverallResult::Pending;
        }

        if self
            .environments
            .iter()
            .all(|stage| stage.status == first.status)
        {
            return OverallResult::from(first.status);
        }

        OverallResult::PartiallySucceeded
    }
}

/// Summary classification of a whole job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverallResult {
    Pending,
    Succeeded,
    Failed,
    Canceled,
    PartiallySucceeded,
    Rejected,
    Unknown,
}

impl From<StageStatus> for OverallResult {
    fn from(status: StageStatus) -> Self {
        match status {
            StageStatus::NotStarted
            | StageStatus::Queued
            | StageStatus::Scheduled
            | StageStatus::InProgress => OverallResult::Pending,
            StageStatus::Succeeded => OverallResult::Succeeded,
            StageStatus::PartiallySucceeded => OverallResult::PartiallySucceeded,
            StageStatus::Failed => OverallResult::Failed,
            StageStatus::Canceled => OverallResult::Canceled,
            StageStatus::Rejected => OverallResult::Rejected,
            StageStatus::Undefined | StageStatus::None | StageStatus::Unknown => {
                OverallResult::Unknown
            }
        }
    }
}

impl fmt::Display for OverallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverallResult::Pending => "pending",
            OverallResult::Succeeded => "succeeded",
            OverallResult::Failed => "failed",
            OverallResult::Canceled => "canceled",
            OverallResult::PartiallySucceeded => "partially succeeded",
            OverallResult::Rejected => "rejected",
            OverallResult::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Final success/failure verdict for a resolved job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Classify a snapshot as succeeded or failed
///
/// Failed only when *every* stage is in the failure set. A job where some
/// stages failed and others succeeded is reported as `Succeeded`.
pub fn classify_outcome(status: &JobStatus, vocabulary: &StatusVocabulary) -> Outcome {
    if status
        .environments
        .iter()
        .all(|stage| vocabulary.is_failure(stage.status))
    {
        Outcome::Failed
    } else {
        Outcome::Succeeded
    }
}
