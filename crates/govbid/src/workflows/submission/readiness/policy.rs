use serde::{Deserialize, Serialize};

/// Banding of the readiness score, evaluated from the highest threshold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    AlmostReady,
    InProgress,
    NotReady,
}

impl ReadinessStatus {
    pub const fn from_score(score: u8) -> Self {
        if score >= 90 {
            ReadinessStatus::Ready
        } else if score >= 70 {
            ReadinessStatus::AlmostReady
        } else if score >= 40 {
            ReadinessStatus::InProgress
        } else {
            ReadinessStatus::NotReady
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReadinessStatus::Ready => "ready",
            ReadinessStatus::AlmostReady => "almost_ready",
            ReadinessStatus::InProgress => "in_progress",
            ReadinessStatus::NotReady => "not_ready",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            ReadinessStatus::Ready => "Proposal is ready for submission.",
            ReadinessStatus::AlmostReady => {
                "Proposal needs minor items completed before submission."
            }
            ReadinessStatus::InProgress => "Significant work remains before submission.",
            ReadinessStatus::NotReady => {
                "Proposal is in early stages. Complete core sections first."
            }
        }
    }
}
