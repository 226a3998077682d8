use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{
    ChecklistCategory, ChecklistItem, ChecklistItemDraft, ChecklistItemId, ChecklistItemTemplate,
    ProposalId,
};
use super::readiness::percent_of;
use super::repository::{RepositoryError, SubmissionStore};

const fn template(text: &'static str, category: ChecklistCategory) -> ChecklistItemTemplate {
    ChecklistItemTemplate { text, category }
}

/// Pre-submission checklist seeded for every proposal, in display order.
pub const CHECKLIST_CATALOG: [ChecklistItemTemplate; 18] = [
    template(
        "All SHALL/MUST requirements addressed",
        ChecklistCategory::Compliance,
    ),
    template(
        "All proposal sections generated and reviewed",
        ChecklistCategory::Content,
    ),
    template(
        "Technical approach clearly articulated",
        ChecklistCategory::Content,
    ),
    template(
        "Past performance references included",
        ChecklistCategory::Content,
    ),
    template("Pricing/cost volume completed", ChecklistCategory::Pricing),
    template(
        "Compliance matrix exported and verified",
        ChecklistCategory::Compliance,
    ),
    template(
        "Document formatting meets solicitation requirements",
        ChecklistCategory::Formatting,
    ),
    template(
        "Page limits verified for each volume",
        ChecklistCategory::Formatting,
    ),
    template(
        "Font size and margins meet requirements",
        ChecklistCategory::Formatting,
    ),
    template(
        "All required attachments included",
        ChecklistCategory::Attachments,
    ),
    template(
        "Certifications and representations current",
        ChecklistCategory::Attachments,
    ),
    template(
        "SAM.gov registration active and current",
        ChecklistCategory::Eligibility,
    ),
    template(
        "NAICS code eligibility confirmed",
        ChecklistCategory::Eligibility,
    ),
    template(
        "Set-aside eligibility verified",
        ChecklistCategory::Eligibility,
    ),
    template(
        "Submission method confirmed (SAM/email/portal)",
        ChecklistCategory::Submission,
    ),
    template(
        "Submission deadline verified with time zone",
        ChecklistCategory::Submission,
    ),
    template(
        "Point of contact information included",
        ChecklistCategory::Submission,
    ),
    template(
        "Final review by authorized representative",
        ChecklistCategory::Review,
    ),
];

fn catalog_drafts() -> Vec<ChecklistItemDraft> {
    CHECKLIST_CATALOG
        .iter()
        .zip(0u32..)
        .map(|(entry, position)| ChecklistItemDraft {
            position,
            text: entry.text.to_string(),
            category: entry.category,
        })
        .collect()
}

/// Completion summary returned with checklist reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    pub total: usize,
    pub completed: usize,
    pub progress: u8,
}

impl ChecklistProgress {
    pub fn from_items(items: &[ChecklistItem]) -> Self {
        let total = items.len();
        let completed = items.iter().filter(|item| item.completed).count();
        Self {
            total,
            completed,
            progress: percent_of(completed as f64, total, 100),
        }
    }
}

/// Seeded checklist along with whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededChecklist {
    pub seeded: bool,
    pub items: Vec<ChecklistItem>,
}

/// Seeds, lists, and toggles per-proposal checklist items.
pub struct ChecklistStore<S> {
    store: Arc<S>,
}

impl<S> ChecklistStore<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Seeds the catalog for a proposal once; later calls return the existing rows untouched.
    pub fn seed(&self, proposal_id: &ProposalId) -> Result<SeededChecklist, ChecklistError> {
        self.require_proposal(proposal_id)?;

        let outcome = self.store.seed_if_empty(proposal_id, catalog_drafts())?;
        if outcome.inserted {
            info!(proposal_id = %proposal_id, count = outcome.items.len(), "seeded submission checklist");
        } else {
            debug!(proposal_id = %proposal_id, "checklist already seeded");
        }

        Ok(SeededChecklist {
            seeded: outcome.inserted,
            items: outcome.items,
        })
    }

    pub fn get(&self, proposal_id: &ProposalId) -> Result<Vec<ChecklistItem>, ChecklistError> {
        self.require_proposal(proposal_id)?;
        Ok(self.store.checklist(proposal_id)?)
    }

    pub fn update_item(
        &self,
        item_id: &ChecklistItemId,
        completed: bool,
    ) -> Result<ChecklistItem, ChecklistError> {
        let item = self
            .store
            .set_completed(item_id, completed)?
            .ok_or_else(|| ChecklistError::ItemNotFound(item_id.clone()))?;
        debug!(item_id = %item_id, completed, "checklist item updated");
        Ok(item)
    }

    fn require_proposal(&self, proposal_id: &ProposalId) -> Result<(), ChecklistError> {
        match self.store.proposal(proposal_id)? {
            Some(_) => Ok(()),
            None => Err(ChecklistError::ProposalNotFound(proposal_id.clone())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),
    #[error("checklist item {0} not found")]
    ItemNotFound(ChecklistItemId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
