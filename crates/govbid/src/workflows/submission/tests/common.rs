use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use serde_json::Value;

use crate::llm::{LlmError, TextGenerator};
use crate::workflows::submission::brief::{BriefGenerator, GenerationError};
use crate::workflows::submission::checklist::ChecklistStore;
use crate::workflows::submission::domain::{
    ChecklistItem, ChecklistItemDraft, ChecklistItemId, ComplianceRequirement, OpportunitySummary,
    Proposal, ProposalId, ProposalSection, ProposalStatus, RequirementStatus,
};
use crate::workflows::submission::export::{
    DocumentProducer, DocxExporter, ExportError, ExportedDocument,
};
use crate::workflows::submission::repository::{
    ChecklistRepository, ProposalRepository, RepositoryError, SeedOutcome,
};
use crate::workflows::submission::SubmissionService;

pub(super) const PROPOSAL_ID: &str = "3f2a9c1e-7b44-4d0e-9a51-0c6d2e8f1b77";

pub(super) fn proposal_id() -> ProposalId {
    ProposalId(PROPOSAL_ID.to_string())
}

pub(super) fn opportunity() -> OpportunitySummary {
    OpportunitySummary {
        title: "Enterprise Cybersecurity Operations Support".to_string(),
        agency: Some("Department of Veterans Affairs".to_string()),
        notice_id: Some("36C10B25Q0142".to_string()),
        naics_code: Some("541512".to_string()),
        set_aside: Some("SDVOSBC".to_string()),
        response_deadline: Some("2025-11-14T17:00:00-05:00".to_string()),
    }
}

pub(super) fn proposal() -> Proposal {
    Proposal {
        id: proposal_id(),
        title: "VA Cyber Operations Proposal".to_string(),
        status: ProposalStatus::Draft,
        opportunity_id: Some("opp-36c10b25q0142".to_string()),
        opportunity: Some(opportunity()),
    }
}

/// Proposal with no title, no opportunity and draft status.
pub(super) fn bare_proposal() -> Proposal {
    Proposal {
        id: proposal_id(),
        title: String::new(),
        status: ProposalStatus::Draft,
        opportunity_id: None,
        opportunity: None,
    }
}

pub(super) fn drafted_section(name: &str, order: u32) -> ProposalSection {
    ProposalSection {
        name: name.to_string(),
        content: format!(
            "Our {name} approach pairs a 24x7 security operations center with \
             continuous monitoring tuned to VA enclave boundaries.\n\n\
             - Tier 1 triage within 15 minutes\n\
             * Weekly threat briefings"
        ),
        order,
    }
}

pub(super) fn placeholder_section(name: &str, order: u32) -> ProposalSection {
    ProposalSection {
        name: name.to_string(),
        content: "TBD".to_string(),
        order,
    }
}

pub(super) fn requirement(text: &str, status: RequirementStatus) -> ComplianceRequirement {
    ComplianceRequirement {
        requirement_text: text.to_string(),
        status,
        section_ref: Some("L.4.2".to_string()),
        notes: None,
    }
}

pub(super) fn requirements(statuses: &[(RequirementStatus, usize)]) -> Vec<ComplianceRequirement> {
    let mut requirements = Vec::new();
    for (status, count) in statuses {
        for _ in 0..*count {
            let index = requirements.len() + 1;
            requirements.push(requirement(
                &format!("The contractor shall satisfy obligation {index}."),
                *status,
            ));
        }
    }
    requirements
}

pub(super) fn four_drafted_sections() -> Vec<ProposalSection> {
    vec![
        drafted_section("Technical Approach", 1),
        drafted_section("Management Approach", 2),
        drafted_section("Staffing Plan", 3),
        drafted_section("Past Performance", 4),
    ]
}

/// Scores exactly 50: sections 25, metadata 15, compliance 10, checklist 0.
pub(super) fn gate_passing_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.put_proposal(proposal());
    store.put_sections(&proposal_id(), four_drafted_sections());
    store.put_requirements(
        &proposal_id(),
        requirements(&[
            (RequirementStatus::Addressed, 1),
            (RequirementStatus::NotAddressed, 2),
        ]),
    );
    store
}

/// Scores exactly 49: sections 25, metadata 15, compliance 9, checklist 0.
pub(super) fn gate_blocked_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.put_proposal(proposal());
    store.put_sections(&proposal_id(), four_drafted_sections());
    store.put_requirements(
        &proposal_id(),
        requirements(&[
            (RequirementStatus::Addressed, 3),
            (RequirementStatus::NotAddressed, 7),
        ]),
    );
    store
}

/// Clears the gate on compliance and checklist alone while having no sections to export.
pub(super) fn sectionless_ready_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.put_proposal(proposal());
    store.put_requirements(
        &proposal_id(),
        requirements(&[(RequirementStatus::Addressed, 4)]),
    );

    let checklist = ChecklistStore::new(store.clone());
    let seeded = checklist.seed(&proposal_id()).expect("seed checklist");
    for item in &seeded.items {
        checklist.update_item(&item.id, true).expect("complete item");
    }
    store
}

#[derive(Default)]
struct MemoryState {
    proposals: HashMap<ProposalId, Proposal>,
    sections: HashMap<ProposalId, Vec<ProposalSection>>,
    requirements: HashMap<ProposalId, Vec<ComplianceRequirement>>,
    checklists: HashMap<ProposalId, Vec<ChecklistItem>>,
    next_item: usize,
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub(super) fn put_proposal(&self, proposal: Proposal) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.proposals.insert(proposal.id.clone(), proposal);
    }

    pub(super) fn put_sections(&self, id: &ProposalId, sections: Vec<ProposalSection>) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.sections.insert(id.clone(), sections);
    }

    pub(super) fn put_requirements(&self, id: &ProposalId, requirements: Vec<ComplianceRequirement>) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.requirements.insert(id.clone(), requirements);
    }
}

impl ProposalRepository for MemoryStore {
    fn proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.proposals.get(id).cloned())
    }

    fn sections(&self, id: &ProposalId) -> Result<Vec<ProposalSection>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut sections = state.sections.get(id).cloned().unwrap_or_default();
        sections.sort_by_key(|section| section.order);
        Ok(sections)
    }

    fn requirements(
        &self,
        id: &ProposalId,
    ) -> Result<Vec<ComplianceRequirement>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.requirements.get(id).cloned().unwrap_or_default())
    }
}

impl ChecklistRepository for MemoryStore {
    fn checklist(&self, proposal_id: &ProposalId) -> Result<Vec<ChecklistItem>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.checklists.get(proposal_id).cloned().unwrap_or_default())
    }

    fn seed_if_empty(
        &self,
        proposal_id: &ProposalId,
        drafts: Vec<ChecklistItemDraft>,
    ) -> Result<SeedOutcome, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(existing) = state.checklists.get(proposal_id) {
            if !existing.is_empty() {
                return Ok(SeedOutcome {
                    inserted: false,
                    items: existing.clone(),
                });
            }
        }

        let created_at = Utc::now();
        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            state.next_item += 1;
            items.push(ChecklistItem {
                id: ChecklistItemId(format!("item-{:03}", state.next_item)),
                proposal_id: proposal_id.clone(),
                text: draft.text,
                category: draft.category,
                completed: false,
                created_at,
            });
        }
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
        let mut state = self.state.lock().expect("store mutex poisoned");
        for items in state.checklists.values_mut() {
            if let Some(item) = items.iter_mut().find(|item| &item.id == item_id) {
                item.completed = completed;
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }
}

pub(super) struct UnavailableStore;

impl ProposalRepository for UnavailableStore {
    fn proposal(&self, _id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn sections(&self, _id: &ProposalId) -> Result<Vec<ProposalSection>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn requirements(
        &self,
        _id: &ProposalId,
    ) -> Result<Vec<ComplianceRequirement>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ChecklistRepository for UnavailableStore {
    fn checklist(&self, _proposal_id: &ProposalId) -> Result<Vec<ChecklistItem>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn seed_if_empty(
        &self,
        _proposal_id: &ProposalId,
        _drafts: Vec<ChecklistItemDraft>,
    ) -> Result<SeedOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_completed(
        &self,
        _item_id: &ChecklistItemId,
        _completed: bool,
    ) -> Result<Option<ChecklistItem>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Wraps the DOCX exporter and counts how often each document is requested.
pub(super) struct CountingDocuments {
    inner: DocxExporter<MemoryStore>,
    calls: AtomicUsize,
}

impl CountingDocuments {
    pub(super) fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            inner: DocxExporter::new(store),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentProducer for CountingDocuments {
    fn proposal_document(&self, proposal_id: &ProposalId) -> Result<ExportedDocument, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.proposal_document(proposal_id)
    }

    fn compliance_document(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ExportedDocument, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.compliance_document(proposal_id)
    }
}

/// Brief generator returning fixed text, or failing like an unreachable model.
pub(super) struct CannedBrief {
    text: Option<String>,
    calls: AtomicUsize,
}

impl CannedBrief {
    pub(super) fn ok(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn unreachable() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BriefGenerator for CannedBrief {
    async fn generate_brief(&self, _proposal_id: &ProposalId) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(GenerationError::Llm(LlmError::Provider {
                status: 503,
                message: "model overloaded".to_string(),
            })),
        }
    }
}

/// Text generator that records the prompts it was given.
#[derive(Default)]
pub(super) struct RecordingGenerator {
    pub(super) prompts: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push((system.to_string(), prompt.to_string()));
        Ok("## Opportunity Summary\n- Go: strong incumbent knowledge".to_string())
    }
}

pub(super) struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::EmptyResponse)
    }
}

pub(super) fn offline_service(store: Arc<MemoryStore>) -> SubmissionService<MemoryStore> {
    SubmissionService::with_defaults(store, None)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

/// Names of the entries in a ZIP container, in archive order.
pub(super) fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|index| archive.by_index(index).expect("entry").name().to_string())
        .collect()
}

pub(super) fn zip_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).expect("read entry");
    contents
}

/// The `word/document.xml` part of a DOCX file.
pub(super) fn document_xml(docx: &[u8]) -> String {
    String::from_utf8(zip_entry(docx, "word/document.xml")).expect("utf-8 document")
}

/// Text of each top-level paragraph, as read back by `docx-rs`.
pub(super) fn paragraph_texts(docx: &[u8]) -> Vec<String> {
    let document = docx_rs::read_docx(docx).expect("docx parses");
    document
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(
                paragraph
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        ParagraphChild::Run(run) => Some(run_text(run)),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect()
}

fn run_text(run: &docx_rs::Run) -> String {
    run.children
        .iter()
        .filter_map(|child| match child {
            RunChild::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}
