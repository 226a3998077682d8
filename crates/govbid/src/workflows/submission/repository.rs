use super::domain::{
    ChecklistItem, ChecklistItemDraft, ChecklistItemId, ComplianceRequirement, Proposal,
    ProposalId, ProposalSection,
};

/// Read access to proposal data owned by the drafting workflow.
///
/// Collection reads return an empty `Vec` when nothing matches, including for unknown proposals.
pub trait ProposalRepository: Send + Sync {
    fn proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError>;
    /// Sections ordered by their `order` field.
    fn sections(&self, id: &ProposalId) -> Result<Vec<ProposalSection>, RepositoryError>;
    /// Requirements in extraction order.
    fn requirements(&self, id: &ProposalId)
        -> Result<Vec<ComplianceRequirement>, RepositoryError>;
}

/// Storage abstraction for per-proposal submission checklists.
pub trait ChecklistRepository: Send + Sync {
    /// Items for the proposal in creation order.
    fn checklist(&self, proposal_id: &ProposalId) -> Result<Vec<ChecklistItem>, RepositoryError>;

    /// Inserts `drafts` only when the proposal has no checklist rows yet.
    ///
    /// Implementations perform the emptiness check and the insert atomically so concurrent
    /// callers cannot both seed the same proposal.
    fn seed_if_empty(
        &self,
        proposal_id: &ProposalId,
        drafts: Vec<ChecklistItemDraft>,
    ) -> Result<SeedOutcome, RepositoryError>;

    /// Returns `None` when no item has the given id.
    fn set_completed(
        &self,
        item_id: &ChecklistItemId,
        completed: bool,
    ) -> Result<Option<ChecklistItem>, RepositoryError>;
}

/// Everything the submission workflow reads from or writes to.
pub trait SubmissionStore: ProposalRepository + ChecklistRepository {}

impl<T> SubmissionStore for T where T: ProposalRepository + ChecklistRepository {}

/// Result of a seeding attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    /// `true` when this call inserted the rows, `false` when a checklist already existed.
    pub inserted: bool,
    pub items: Vec<ChecklistItem>,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
