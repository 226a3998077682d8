mod policy;
pub(crate) mod rules;

pub use policy::ReadinessStatus;
pub(crate) use rules::percent_of;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{ChecklistItem, ComplianceRequirement, Proposal, ProposalId, ProposalSection};
use super::repository::{RepositoryError, SubmissionStore};

pub const SECTIONS_WEIGHT: u8 = 25;
pub const COMPLIANCE_WEIGHT: u8 = 30;
pub const CHECKLIST_WEIGHT: u8 = 25;
pub const METADATA_WEIGHT: u8 = 20;
pub const MAX_READINESS_SCORE: u8 =
    SECTIONS_WEIGHT + COMPLIANCE_WEIGHT + CHECKLIST_WEIGHT + METADATA_WEIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBreakdown {
    pub score: u8,
    pub max: u8,
    pub total: usize,
    pub with_content: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceBreakdown {
    pub score: u8,
    pub max: u8,
    pub total: usize,
    pub addressed: usize,
    pub partial: usize,
    pub not_addressed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistBreakdown {
    pub score: u8,
    pub max: u8,
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBreakdown {
    pub score: u8,
    pub max: u8,
    pub checks_passed: usize,
    pub total_checks: usize,
}

/// Per-component contributions so callers can show what is still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub sections: SectionBreakdown,
    pub compliance: ComplianceBreakdown,
    pub checklist: ChecklistBreakdown,
    pub metadata: MetadataBreakdown,
}

impl ReadinessBreakdown {
    pub fn total(&self) -> u8 {
        self.sections.score + self.compliance.score + self.checklist.score + self.metadata.score
    }
}

/// Readiness score computed fresh on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResult {
    pub score: u8,
    pub max_score: u8,
    pub status: ReadinessStatus,
    pub recommendation: String,
    pub breakdown: ReadinessBreakdown,
}

/// Point-in-time reads feeding the scorer. The four collections are not read transactionally.
#[derive(Debug, Clone)]
pub struct ReadinessInputs {
    pub proposal: Proposal,
    pub sections: Vec<ProposalSection>,
    pub requirements: Vec<ComplianceRequirement>,
    pub checklist: Vec<ChecklistItem>,
}

/// Applies the fixed weighting to a snapshot of proposal data.
pub fn evaluate(inputs: &ReadinessInputs) -> ReadinessResult {
    let breakdown = ReadinessBreakdown {
        sections: rules::score_sections(&inputs.sections),
        compliance: rules::score_compliance(&inputs.requirements),
        checklist: rules::score_checklist(&inputs.checklist),
        metadata: rules::score_metadata(&inputs.proposal, inputs.sections.len()),
    };

    let score = breakdown.total();
    let status = ReadinessStatus::from_score(score);

    ReadinessResult {
        score,
        max_score: MAX_READINESS_SCORE,
        status,
        recommendation: status.recommendation().to_string(),
        breakdown,
    }
}

/// Loads proposal data from the store and scores it.
pub struct ReadinessScorer<S> {
    store: Arc<S>,
}

impl<S> ReadinessScorer<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn score(&self, proposal_id: &ProposalId) -> Result<ReadinessResult, ReadinessError> {
        let proposal = self
            .store
            .proposal(proposal_id)?
            .ok_or_else(|| ReadinessError::ProposalNotFound(proposal_id.clone()))?;

        let inputs = ReadinessInputs {
            proposal,
            sections: self.store.sections(proposal_id)?,
            requirements: self.store.requirements(proposal_id)?,
            checklist: self.store.checklist(proposal_id)?,
        };

        let result = evaluate(&inputs);
        debug!(
            proposal_id = %proposal_id,
            score = result.score,
            status = result.status.label(),
            "readiness scored"
        );
        Ok(result)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
