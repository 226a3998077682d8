use std::sync::Arc;

use serde::Serialize;

use super::brief::{BriefGenerator, FactSheetBriefGenerator, GenerationError, LlmBriefGenerator};
use super::checklist::{ChecklistError, ChecklistProgress, ChecklistStore, SeededChecklist};
use super::domain::{ChecklistItem, ChecklistItemId, ProposalId};
use super::export::{DocumentProducer, DocxExporter, ExportError, ExportedDocument};
use super::package::{PackageAssembler, PackageError, PackageOutcome};
use super::readiness::{ReadinessError, ReadinessResult, ReadinessScorer};
use super::repository::SubmissionStore;
use crate::llm::TextGenerator;

/// Checklist rows with their completion summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistOverview {
    pub items: Vec<ChecklistItem>,
    #[serde(flatten)]
    pub progress: ChecklistProgress,
}

/// Service composing the checklist store, readiness scorer, exporters and package assembler.
pub struct SubmissionService<S> {
    checklists: ChecklistStore<S>,
    scorer: ReadinessScorer<S>,
    documents: Arc<dyn DocumentProducer>,
    briefs: Arc<dyn BriefGenerator>,
    assembler: PackageAssembler<S>,
}

impl<S> SubmissionService<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        documents: Arc<dyn DocumentProducer>,
        briefs: Arc<dyn BriefGenerator>,
    ) -> Self {
        Self {
            checklists: ChecklistStore::new(Arc::clone(&store)),
            scorer: ReadinessScorer::new(Arc::clone(&store)),
            assembler: PackageAssembler::new(store, Arc::clone(&documents), Arc::clone(&briefs)),
            documents,
            briefs,
        }
    }

    /// DOCX exports plus an LLM brief when a generator is supplied, or the offline fact sheet.
    pub fn with_defaults(store: Arc<S>, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let documents: Arc<dyn DocumentProducer> = Arc::new(DocxExporter::new(Arc::clone(&store)));
        let briefs: Arc<dyn BriefGenerator> = match generator {
            Some(generator) => Arc::new(LlmBriefGenerator::new(Arc::clone(&store), generator)),
            None => Arc::new(FactSheetBriefGenerator::new(Arc::clone(&store))),
        };
        Self::new(store, documents, briefs)
    }

    pub fn seed_checklist(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<SeededChecklist, SubmissionServiceError> {
        Ok(self.checklists.seed(proposal_id)?)
    }

    pub fn checklist(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ChecklistOverview, SubmissionServiceError> {
        let items = self.checklists.get(proposal_id)?;
        let progress = ChecklistProgress::from_items(&items);
        Ok(ChecklistOverview { items, progress })
    }

    pub fn update_checklist_item(
        &self,
        item_id: &ChecklistItemId,
        completed: bool,
    ) -> Result<ChecklistItem, SubmissionServiceError> {
        Ok(self.checklists.update_item(item_id, completed)?)
    }

    pub fn readiness(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ReadinessResult, SubmissionServiceError> {
        Ok(self.scorer.score(proposal_id)?)
    }

    pub async fn brief(&self, proposal_id: &ProposalId) -> Result<String, SubmissionServiceError> {
        Ok(self.briefs.generate_brief(proposal_id).await?)
    }

    pub fn export_proposal(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ExportedDocument, SubmissionServiceError> {
        Ok(self.documents.proposal_document(proposal_id)?)
    }

    pub fn export_compliance(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ExportedDocument, SubmissionServiceError> {
        Ok(self.documents.compliance_document(proposal_id)?)
    }

    pub async fn package(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<PackageOutcome, SubmissionServiceError> {
        Ok(self.assembler.assemble(proposal_id).await?)
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
    #[error(transparent)]
    Readiness(#[from] ReadinessError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Package(#[from] PackageError),
}

impl SubmissionServiceError {
    /// Missing proposal or checklist item, wherever in the pipeline it surfaced.
    pub fn is_not_found(&self) -> bool {
        match self {
            SubmissionServiceError::Checklist(error) => matches!(
                error,
                ChecklistError::ProposalNotFound(_) | ChecklistError::ItemNotFound(_)
            ),
            SubmissionServiceError::Readiness(error) => readiness_not_found(error),
            SubmissionServiceError::Export(error) => export_not_found(error),
            SubmissionServiceError::Generation(error) => generation_not_found(error),
            SubmissionServiceError::Package(error) => match error {
                PackageError::Readiness(error) => readiness_not_found(error),
                PackageError::Export(error) => export_not_found(error),
                PackageError::Generation(error) => generation_not_found(error),
                PackageError::Manifest(_) | PackageError::Archive(_) => false,
            },
        }
    }

    /// Export or package refused because the proposal has nothing to render.
    pub fn is_unprocessable(&self) -> bool {
        matches!(
            self,
            SubmissionServiceError::Export(ExportError::NoSections(_))
                | SubmissionServiceError::Package(PackageError::Export(ExportError::NoSections(_)))
        )
    }

    /// The language model was unreachable or rejected the request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SubmissionServiceError::Generation(GenerationError::Llm(_))
                | SubmissionServiceError::Package(PackageError::Generation(GenerationError::Llm(
                    _
                )))
        )
    }
}

fn readiness_not_found(error: &ReadinessError) -> bool {
    matches!(error, ReadinessError::ProposalNotFound(_))
}

fn export_not_found(error: &ExportError) -> bool {
    matches!(error, ExportError::ProposalNotFound(_))
}

fn generation_not_found(error: &GenerationError) -> bool {
    matches!(error, GenerationError::ProposalNotFound(_))
}
