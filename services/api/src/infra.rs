use chrono::Utc;
use govbid::config::LlmConfig;
use govbid::error::AppError;
use govbid::llm::{ChatCompletionClient, TextGenerator};
use govbid::storage::SqliteSubmissionStore;
use govbid::workflows::submission::{
    ChecklistItem, ChecklistItemDraft, ChecklistItemId, ChecklistRepository,
    ComplianceRequirement, Proposal, ProposalId, ProposalRepository, ProposalSection,
    RepositoryError, SeedOutcome, SubmissionService, SubmissionStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

const DEMO_FIXTURE: &str = include_str!("../fixtures/demo_proposals.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreState {
    proposals: HashMap<ProposalId, Proposal>,
    sections: HashMap<ProposalId, Vec<ProposalSection>>,
    requirements: HashMap<ProposalId, Vec<ComplianceRequirement>>,
    checklists: HashMap<ProposalId, Vec<ChecklistItem>>,
}

/// Process-local store used by `demo` and by `serve` when no database is configured.
#[derive(Default)]
pub(crate) struct InMemorySubmissionStore {
    state: Mutex<StoreState>,
}

impl InMemorySubmissionStore {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    pub(crate) fn insert(
        &self,
        proposal: Proposal,
        mut sections: Vec<ProposalSection>,
        requirements: Vec<ComplianceRequirement>,
    ) -> Result<(), RepositoryError> {
        sections.sort_by_key(|section| section.order);
        let mut state = self.lock()?;
        state.sections.insert(proposal.id.clone(), sections);
        state.requirements.insert(proposal.id.clone(), requirements);
        state.proposals.insert(proposal.id.clone(), proposal);
        Ok(())
    }
}

impl ProposalRepository for InMemorySubmissionStore {
    fn proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        Ok(self.lock()?.proposals.get(id).cloned())
    }

    fn sections(&self, id: &ProposalId) -> Result<Vec<ProposalSection>, RepositoryError> {
        Ok(self.lock()?.sections.get(id).cloned().unwrap_or_default())
    }

    fn requirements(
        &self,
        id: &ProposalId,
    ) -> Result<Vec<ComplianceRequirement>, RepositoryError> {
        Ok(self.lock()?.requirements.get(id).cloned().unwrap_or_default())
    }
}

impl ChecklistRepository for InMemorySubmissionStore {
    fn checklist(&self, proposal_id: &ProposalId) -> Result<Vec<ChecklistItem>, RepositoryError> {
        Ok(self
            .lock()?
            .checklists
            .get(proposal_id)
            .cloned()
            .unwrap_or_default())
    }

    fn seed_if_empty(
        &self,
        proposal_id: &ProposalId,
        drafts: Vec<ChecklistItemDraft>,
    ) -> Result<SeedOutcome, RepositoryError> {
        let mut state = self.lock()?;
        if let Some(existing) = state.checklists.get(proposal_id) {
            if !existing.is_empty() {
                return Ok(SeedOutcome {
                    inserted: false,
                    items: existing.clone(),
                });
            }
        }

        let created_at = Utc::now();
        let items: Vec<ChecklistItem> = drafts
            .into_iter()
            .map(|draft| ChecklistItem {
                id: ChecklistItemId(Uuid::new_v4().to_string()),
                proposal_id: proposal_id.clone(),
                text: draft.text,
                category: draft.category,
                completed: false,
                created_at,
            })
            .collect();
        state.checklists.insert(proposal_id.clone(), items.clone());

        Ok(SeedOutcome {
            inserted: true,
            items,
        })
    }

    fn set_completed(
        &self,
        item_id: &ChecklistItemId,
        completed: bool,
    ) -> Result<Option<ChecklistItem>, RepositoryError> {
        let mut state = self.lock()?;
        let item = state
            .checklists
            .values_mut()
            .flat_map(|items| items.iter_mut())
            .find(|item| &item.id == item_id);

        Ok(item.map(|item| {
            item.completed = completed;
            item.clone()
        }))
    }
}

/// Proposal plus the sections and requirements drafted for it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProposalFixture {
    #[serde(flatten)]
    pub(crate) proposal: Proposal,
    #[serde(default)]
    pub(crate) sections: Vec<ProposalSection>,
    #[serde(default)]
    pub(crate) requirements: Vec<ComplianceRequirement>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FixtureFile {
    pub(crate) proposals: Vec<ProposalFixture>,
}

impl FixtureFile {
    pub(crate) fn parse(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn read(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub(crate) fn demo() -> Result<Self, AppError> {
        Self::parse(DEMO_FIXTURE)
    }

    pub(crate) fn load_into_memory(&self, store: &InMemorySubmissionStore) -> Result<(), AppError> {
        for fixture in &self.proposals {
            store.insert(
                fixture.proposal.clone(),
                fixture.sections.clone(),
                fixture.requirements.clone(),
            )?;
        }
        Ok(())
    }

    pub(crate) fn import_into(&self, store: &SqliteSubmissionStore) -> Result<usize, AppError> {
        for fixture in &self.proposals {
            store.upsert_proposal(&fixture.proposal)?;
            store.replace_sections(&fixture.proposal.id, &fixture.sections)?;
            store.replace_requirements(&fixture.proposal.id, &fixture.requirements)?;
            info!(proposal_id = %fixture.proposal.id, sections = fixture.sections.len(), "imported proposal");
        }
        Ok(self.proposals.len())
    }
}

/// Wires the submission service, using the chat-completion brief generator when an API key is set.
pub(crate) fn build_service<S>(
    store: Arc<S>,
    llm: &LlmConfig,
) -> Result<SubmissionService<S>, AppError>
where
    S: SubmissionStore + 'static,
{
    let generator: Option<Arc<dyn TextGenerator>> = if llm.is_configured() {
        let client = ChatCompletionClient::from_config(llm)?;
        info!(model = client.model(), "LLM brief generation enabled");
        Some(Arc::new(client))
    } else {
        info!("no LLM API key configured; briefs use the offline fact sheet");
        None
    };

    Ok(SubmissionService::with_defaults(store, generator))
}
