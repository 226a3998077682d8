use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::archive::{write_zip, ArchiveEntry, ArchiveError};
use super::brief::{BriefGenerator, GenerationError};
use super::domain::ProposalId;
use super::export::{DocumentProducer, ExportError, ExportedDocument};
use super::readiness::{ReadinessError, ReadinessResult, ReadinessScorer, MAX_READINESS_SCORE};
use super::repository::SubmissionStore;

/// Proposals scoring below this are refused a package.
pub const PACKAGE_READINESS_GATE: u8 = 50;
pub const ZIP_MEDIA_TYPE: &str = "application/zip";
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub media_type: String,
    pub size_bytes: usize,
}

impl From<&ExportedDocument> for ManifestEntry {
    fn from(document: &ExportedDocument) -> Self {
        Self {
            name: document.file_name.clone(),
            media_type: document.media_type.clone(),
            size_bytes: document.bytes.len(),
        }
    }
}

/// Inventory written to `manifest.json` inside every package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub proposal_id: ProposalId,
    pub generated_at: DateTime<Utc>,
    pub readiness_score: u8,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub manifest: PackageManifest,
}

/// Readiness was below the gate; nothing was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateRejection {
    pub reason: String,
    pub score: u8,
    pub readiness: ReadinessResult,
}

impl GateRejection {
    fn new(readiness: ReadinessResult) -> Self {
        Self {
            reason: "readiness too low".to_string(),
            score: readiness.score,
            readiness,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Proposal readiness too low ({}/{}). Complete more items first.",
            self.score, MAX_READINESS_SCORE
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    Archive(SubmissionArchive),
    Rejected(GateRejection),
}

/// Gates on readiness, then bundles both documents, the brief and a manifest into one ZIP.
pub struct PackageAssembler<S> {
    scorer: ReadinessScorer<S>,
    documents: Arc<dyn DocumentProducer>,
    briefs: Arc<dyn BriefGenerator>,
}

impl<S> PackageAssembler<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        documents: Arc<dyn DocumentProducer>,
        briefs: Arc<dyn BriefGenerator>,
    ) -> Self {
        Self {
            scorer: ReadinessScorer::new(store),
            documents,
            briefs,
        }
    }

    pub async fn assemble(&self, proposal_id: &ProposalId) -> Result<PackageOutcome, PackageError> {
        let readiness = self.scorer.score(proposal_id)?;
        if readiness.score < PACKAGE_READINESS_GATE {
            info!(
                proposal_id = %proposal_id,
                score = readiness.score,
                gate = PACKAGE_READINESS_GATE,
                "package refused below readiness gate"
            );
            return Ok(PackageOutcome::Rejected(GateRejection::new(readiness)));
        }

        let proposal_document = self.documents.proposal_document(proposal_id)?;
        let compliance_document = self.documents.compliance_document(proposal_id)?;
        let brief = self.briefs.generate_brief(proposal_id).await?;
        let brief_document = ExportedDocument {
            file_name: format!("submission_brief_{}.txt", proposal_id.short()),
            media_type: mime::TEXT_PLAIN_UTF_8.to_string(),
            bytes: brief.into_bytes(),
        };

        let artifacts = [proposal_document, compliance_document, brief_document];
        let manifest = PackageManifest {
            proposal_id: proposal_id.clone(),
            generated_at: Utc::now(),
            readiness_score: readiness.score,
            files: artifacts.iter().map(ManifestEntry::from).collect(),
        };
        let manifest_json = serde_json::to_vec_pretty(&manifest)?;

        let mut entries: Vec<ArchiveEntry> = artifacts
            .into_iter()
            .map(|document| ArchiveEntry::new(document.file_name, document.bytes))
            .collect();
        entries.push(ArchiveEntry::new(MANIFEST_FILE_NAME, manifest_json));
        let bytes = write_zip(&entries)?;

        info!(
            proposal_id = %proposal_id,
            score = readiness.score,
            size_bytes = bytes.len(),
            "submission package assembled"
        );
        Ok(PackageOutcome::Archive(SubmissionArchive {
            file_name: format!("SubmissionPackage_{}.zip", proposal_id.short()),
            bytes,
            manifest,
        }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error(transparent)]
    Readiness(#[from] ReadinessError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to encode package manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("failed to write package archive: {0}")]
    Archive(#[from] ArchiveError),
}
