//! Word document renderers for the proposal narrative and its compliance matrix.

mod compliance;
pub(crate) mod docx;
mod proposal;

pub use compliance::render_compliance_matrix;
pub use docx::RenderError;
pub use proposal::render_proposal;

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::domain::{Proposal, ProposalId};
use super::repository::{RepositoryError, SubmissionStore};

pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Rendered file ready to be streamed or archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Producer of the two submission documents.
pub trait DocumentProducer: Send + Sync {
    fn proposal_document(&self, proposal_id: &ProposalId) -> Result<ExportedDocument, ExportError>;
    fn compliance_document(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ExportedDocument, ExportError>;
}

/// Renders DOCX files straight from the submission store.
pub struct DocxExporter<S> {
    store: Arc<S>,
}

impl<S> DocxExporter<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn load_proposal(&self, proposal_id: &ProposalId) -> Result<Proposal, ExportError> {
        self.store
            .proposal(proposal_id)?
            .ok_or_else(|| ExportError::ProposalNotFound(proposal_id.clone()))
    }
}

impl<S> DocumentProducer for DocxExporter<S>
where
    S: SubmissionStore + 'static,
{
    fn proposal_document(&self, proposal_id: &ProposalId) -> Result<ExportedDocument, ExportError> {
        let proposal = self.load_proposal(proposal_id)?;
        let sections = self.store.sections(proposal_id)?;
        if sections.is_empty() {
            return Err(ExportError::NoSections(proposal_id.clone()));
        }

        let bytes = render_proposal(&proposal, &sections, Utc::now())?;
        debug!(proposal_id = %proposal_id, size_bytes = bytes.len(), "rendered proposal document");
        Ok(ExportedDocument {
            file_name: format!("proposal_{}.docx", proposal_id.short()),
            media_type: DOCX_MEDIA_TYPE.to_string(),
            bytes,
        })
    }

    fn compliance_document(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ExportedDocument, ExportError> {
        let proposal = self.load_proposal(proposal_id)?;
        let requirements = self.store.requirements(proposal_id)?;

        let bytes = render_compliance_matrix(&proposal, &requirements, Utc::now())?;
        debug!(
            proposal_id = %proposal_id,
            requirements = requirements.len(),
            "rendered compliance matrix"
        );
        Ok(ExportedDocument {
            file_name: format!("compliance_matrix_{}.docx", proposal_id.short()),
            media_type: DOCX_MEDIA_TYPE.to_string(),
            bytes,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),
    #[error("proposal {0} has no sections to export")]
    NoSections(ProposalId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
