//! Submission readiness scoring and package assembly.
//!
//! A proposal moves toward submission by drafting sections, addressing compliance requirements
//! and working a fixed pre-submission checklist. This module scores that progress on a 0-100
//! scale and, once the score clears the packaging gate, bundles the proposal document, the
//! compliance matrix and a handoff brief into a single ZIP.

pub mod archive;
pub mod brief;
pub mod checklist;
pub mod domain;
pub mod export;
pub mod package;
pub mod readiness;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use brief::{
    BriefFacts, BriefGenerator, FactSheetBriefGenerator, GenerationError, LlmBriefGenerator,
    BRIEF_SYSTEM_PROMPT,
};
pub use checklist::{
    ChecklistError, ChecklistProgress, ChecklistStore, SeededChecklist, CHECKLIST_CATALOG,
};
pub use domain::{
    ChecklistCategory, ChecklistItem, ChecklistItemDraft, ChecklistItemId, ChecklistItemTemplate,
    ComplianceRequirement, OpportunitySummary, Proposal, ProposalId, ProposalSection,
    ProposalStatus, RequirementStatus,
};
pub use export::{DocumentProducer, DocxExporter, ExportError, ExportedDocument, DOCX_MEDIA_TYPE};
pub use package::{
    GateRejection, ManifestEntry, PackageAssembler, PackageError, PackageManifest,
    PackageOutcome, SubmissionArchive, PACKAGE_READINESS_GATE,
};
pub use readiness::{
    evaluate, ReadinessBreakdown, ReadinessError, ReadinessInputs, ReadinessResult,
    ReadinessScorer, ReadinessStatus,
};
pub use repository::{
    ChecklistRepository, ProposalRepository, RepositoryError, SeedOutcome, SubmissionStore,
};
pub use router::submission_router;
pub use service::{ChecklistOverview, SubmissionService, SubmissionServiceError};
