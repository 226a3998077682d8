//! Submission brief: a handoff summary assembled from proposal, compliance and checklist facts.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{ProposalId, RequirementStatus};
use super::repository::{RepositoryError, SubmissionStore};
use crate::llm::{LlmError, TextGenerator};

pub const BRIEF_SYSTEM_PROMPT: &str = "You are an expert government contracting proposal manager.
Generate a concise, professional Submission Brief that a team lead can use
as a final handoff document before proposal submission. Include:

1. **Opportunity Summary** - Title, agency, solicitation number, deadline, NAICS
2. **Win Themes** - Key discriminators and competitive advantages
3. **Risk Assessment** - Identified risks and mitigation strategies
4. **Compliance Status** - Requirements addressed vs outstanding
5. **Checklist Summary** - Items completed vs pending
6. **Submission Instructions** - Method, deadline, point of contact
7. **Recommendation** - Go/No-Go with rationale

Format with clear headings and bullet points. Be specific and actionable.";

const SUMMARY_SECTION_LIMIT: usize = 8;
const SUMMARY_CHAR_LIMIT: usize = 150;

/// Produces the brief text included in every submission package.
#[async_trait]
pub trait BriefGenerator: Send + Sync {
    async fn generate_brief(&self, proposal_id: &ProposalId) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpportunityFacts {
    pub title: String,
    pub agency: String,
    pub notice_id: String,
    pub naics_code: String,
    pub set_aside: String,
    pub response_deadline: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplianceFacts {
    pub total_requirements: usize,
    pub addressed: usize,
    pub partial: usize,
    pub not_addressed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistFacts {
    pub total_items: usize,
    pub completed: usize,
    pub pending_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub name: String,
    pub excerpt: String,
}

/// Snapshot of everything a brief talks about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BriefFacts {
    pub proposal_title: String,
    pub proposal_status: String,
    pub opportunity: OpportunityFacts,
    pub sections_count: usize,
    pub section_names: Vec<String>,
    pub compliance: ComplianceFacts,
    pub checklist: ChecklistFacts,
    #[serde(skip)]
    pub section_summaries: Vec<SectionSummary>,
}

impl BriefFacts {
    pub fn collect<S>(store: &S, proposal_id: &ProposalId) -> Result<Self, GenerationError>
    where
        S: SubmissionStore + ?Sized,
    {
        let proposal = store
            .proposal(proposal_id)?
            .ok_or_else(|| GenerationError::ProposalNotFound(proposal_id.clone()))?;
        let sections = store.sections(proposal_id)?;
        let requirements = store.requirements(proposal_id)?;
        let checklist = store.checklist(proposal_id)?;

        let opportunity = proposal.opportunity.clone().unwrap_or_default();
        let or_default = |value: Option<String>, fallback: &str| {
            value
                .filter(|raw| !raw.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        let count = |status: RequirementStatus| {
            requirements
                .iter()
                .filter(|requirement| requirement.status == status)
                .count()
        };

        Ok(Self {
            proposal_title: if proposal.title.trim().is_empty() {
                "Unknown".to_string()
            } else {
                proposal.title.clone()
            },
            proposal_status: proposal.status.label().to_string(),
            opportunity: OpportunityFacts {
                title: or_default(Some(opportunity.title), "Unknown"),
                agency: or_default(opportunity.agency, "Unknown"),
                notice_id: or_default(opportunity.notice_id, "N/A"),
                naics_code: or_default(opportunity.naics_code, "N/A"),
                set_aside: or_default(opportunity.set_aside, "None"),
                response_deadline: or_default(opportunity.response_deadline, "Unknown"),
            },
            sections_count: sections.len(),
            section_names: sections.iter().map(|section| section.name.clone()).collect(),
            compliance: ComplianceFacts {
                total_requirements: requirements.len(),
                addressed: count(RequirementStatus::Addressed),
                partial: count(RequirementStatus::Partial),
                not_addressed: count(RequirementStatus::NotAddressed),
            },
            checklist: ChecklistFacts {
                total_items: checklist.len(),
                completed: checklist.iter().filter(|item| item.completed).count(),
                pending_items: checklist
                    .iter()
                    .filter(|item| !item.completed)
                    .map(|item| item.text.clone())
                    .collect(),
            },
            section_summaries: sections
                .iter()
                .take(SUMMARY_SECTION_LIMIT)
                .map(|section| SectionSummary {
                    name: section.name.clone(),
                    excerpt: section.content.chars().take(SUMMARY_CHAR_LIMIT).collect(),
                })
                .collect(),
        })
    }

    /// User prompt embedding the facts as pretty JSON followed by section excerpts.
    pub fn prompt(&self) -> Result<String, GenerationError> {
        let facts = serde_json::to_string_pretty(self)?;
        let summaries = self
            .section_summaries
            .iter()
            .map(|summary| format!("- {}: {}...", summary.name, summary.excerpt))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "Generate a Submission Brief for this government contract proposal.\n\n\
             PROPOSAL DATA:\n{facts}\n\n\
             SECTION SUMMARIES:\n{summaries}\n\n\
             Generate the brief now."
        ))
    }

    /// Plain-text fact sheet used when no language model is configured.
    pub fn render_fact_sheet(&self) -> String {
        FactSheet(self).to_string()
    }
}

struct FactSheet<'a>(&'a BriefFacts);

impl fmt::Display for FactSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let facts = self.0;
        writeln!(f, "SUBMISSION BRIEF: {}", facts.proposal_title)?;
        writeln!(f, "Proposal status: {}", facts.proposal_status)?;

        let opportunity = &facts.opportunity;
        writeln!(f, "\n1. Opportunity Summary")?;
        writeln!(f, "- Title: {}", opportunity.title)?;
        writeln!(f, "- Agency: {}", opportunity.agency)?;
        writeln!(f, "- Solicitation: {}", opportunity.notice_id)?;
        writeln!(f, "- NAICS: {}", opportunity.naics_code)?;
        writeln!(f, "- Set-aside: {}", opportunity.set_aside)?;
        writeln!(f, "- Response deadline: {}", opportunity.response_deadline)?;

        writeln!(f, "\n2. Proposal Sections ({})", facts.sections_count)?;
        if facts.section_summaries.is_empty() {
            writeln!(f, "- No sections drafted yet.")?;
        }
        for summary in &facts.section_summaries {
            writeln!(f, "- {}: {}", summary.name, summary.excerpt.trim())?;
        }

        let compliance = &facts.compliance;
        writeln!(f, "\n3. Compliance Status")?;
        writeln!(
            f,
            "- {} requirements: {} addressed, {} partial, {} not addressed",
            compliance.total_requirements,
            compliance.addressed,
            compliance.partial,
            compliance.not_addressed
        )?;

        let checklist = &facts.checklist;
        writeln!(f, "\n4. Checklist Summary")?;
        writeln!(
            f,
            "- {} of {} items completed",
            checklist.completed, checklist.total_items
        )?;
        for pending in &checklist.pending_items {
            writeln!(f, "- Pending: {pending}")?;
        }
        Ok(())
    }
}

/// Delegates brief writing to a language model.
pub struct LlmBriefGenerator<S> {
    store: Arc<S>,
    generator: Arc<dyn TextGenerator>,
}

impl<S> LlmBriefGenerator<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }
}

#[async_trait]
impl<S> BriefGenerator for LlmBriefGenerator<S>
where
    S: SubmissionStore + 'static,
{
    async fn generate_brief(&self, proposal_id: &ProposalId) -> Result<String, GenerationError> {
        let facts = BriefFacts::collect(self.store.as_ref(), proposal_id)?;
        let prompt = facts.prompt()?;
        let brief = self.generator.complete(BRIEF_SYSTEM_PROMPT, &prompt).await?;
        info!(proposal_id = %proposal_id, chars = brief.len(), "generated submission brief");
        Ok(brief)
    }
}

/// Offline brief built only from stored facts.
pub struct FactSheetBriefGenerator<S> {
    store: Arc<S>,
}

impl<S> FactSheetBriefGenerator<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> BriefGenerator for FactSheetBriefGenerator<S>
where
    S: SubmissionStore + 'static,
{
    async fn generate_brief(&self, proposal_id: &ProposalId) -> Result<String, GenerationError> {
        let facts = BriefFacts::collect(self.store.as_ref(), proposal_id)?;
        debug!(proposal_id = %proposal_id, "rendered fact sheet brief");
        Ok(facts.render_fact_sheet())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("brief generation failed: {0}")]
    Llm(#[from] LlmError),
    #[error("failed to encode brief facts: {0}")]
    Facts(#[from] serde_json::Error),
}
