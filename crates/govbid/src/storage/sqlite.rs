use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use super::{open_db, open_db_in_memory, StorageError};
use crate::workflows::submission::domain::{
    ChecklistCategory, ChecklistItem, ChecklistItemDraft, ChecklistItemId, ComplianceRequirement,
    OpportunitySummary, Proposal, ProposalId, ProposalSection, ProposalStatus, RequirementStatus,
};
use crate::workflows::submission::repository::{
    ChecklistRepository, ProposalRepository, RepositoryError, SeedOutcome,
};

const CHECKLIST_SELECT_SQL: &str = "SELECT id, proposal_id, item, category, completed, created_at
FROM submission_checklists";

/// Submission store backed by a single SQLite connection.
pub struct SqliteSubmissionStore {
    conn: Mutex<Connection>,
}

impl SqliteSubmissionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection that already has migrations applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Inserts or replaces a proposal together with its opportunity details.
    pub fn upsert_proposal(&self, proposal: &Proposal) -> Result<(), StorageError> {
        let mut conn = self.lock().map_err(|_| StorageError::Poisoned)?;
        let tx = conn.transaction()?;

        if let (Some(opportunity_id), Some(opportunity)) =
            (proposal.opportunity_id.as_deref(), proposal.opportunity.as_ref())
        {
            tx.execute(
                "INSERT INTO opportunities
                    (id, title, agency, notice_id, naics_code, set_aside, response_deadline)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (id) DO UPDATE SET
                    title = excluded.title,
                    agency = excluded.agency,
                    notice_id = excluded.notice_id,
                    naics_code = excluded.naics_code,
                    set_aside = excluded.set_aside,
                    response_deadline = excluded.response_deadline;",
                params![
                    opportunity_id,
                    opportunity.title,
                    opportunity.agency,
                    opportunity.notice_id,
                    opportunity.naics_code,
                    opportunity.set_aside,
                    opportunity.response_deadline,
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO proposals (id, title, status, opportunity_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                status = excluded.status,
                opportunity_id = excluded.opportunity_id;",
            params![
                proposal.id.0,
                proposal.title,
                proposal.status.label(),
                proposal.opportunity_id,
            ],
        )?;
        tx.commit()?;

        debug!(proposal_id = %proposal.id, "proposal stored");
        Ok(())
    }

    pub fn replace_sections(
        &self,
        proposal_id: &ProposalId,
        sections: &[ProposalSection],
    ) -> Result<(), StorageError> {
        let mut conn = self.lock().map_err(|_| StorageError::Poisoned)?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM proposal_sections WHERE proposal_id = ?1;",
            params![proposal_id.0],
        )?;
        for section in sections {
            tx.execute(
                "INSERT INTO proposal_sections (proposal_id, section_name, content, order_index)
                 VALUES (?1, ?2, ?3, ?4);",
                params![proposal_id.0, section.name, section.content, section.order],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn replace_requirements(
        &self,
        proposal_id: &ProposalId,
        requirements: &[ComplianceRequirement],
    ) -> Result<(), StorageError> {
        let mut conn = self.lock().map_err(|_| StorageError::Poisoned)?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM compliance_requirements WHERE proposal_id = ?1;",
            params![proposal_id.0],
        )?;
        for requirement in requirements {
            tx.execute(
                "INSERT INTO compliance_requirements
                    (proposal_id, requirement, status, section_ref, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    proposal_id.0,
                    requirement.requirement_text,
                    requirement.status.label(),
                    requirement.section_ref,
                    requirement.notes,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("database connection lock poisoned".into()))
    }
}

struct ProposalRow {
    id: String,
    title: String,
    status: String,
    opportunity_id: Option<String>,
    opportunity_title: Option<String>,
    agency: Option<String>,
    notice_id: Option<String>,
    naics_code: Option<String>,
    set_aside: Option<String>,
    response_deadline: Option<String>,
}

impl ProposalRow {
    fn into_proposal(self) -> Result<Proposal, RepositoryError> {
        let status = ProposalStatus::from_label(&self.status).ok_or_else(|| {
            RepositoryError::Corrupt(format!("unknown proposal status '{}'", self.status))
        })?;
        let opportunity = self.opportunity_title.map(|title| OpportunitySummary {
            title,
            agency: self.agency,
            notice_id: self.notice_id,
            naics_code: self.naics_code,
            set_aside: self.set_aside,
            response_deadline: self.response_deadline,
        });

        Ok(Proposal {
            id: ProposalId(self.id),
            title: self.title,
            status,
            opportunity_id: self.opportunity_id,
            opportunity,
        })
    }
}

struct ChecklistRow {
    id: String,
    proposal_id: String,
    item: String,
    category: String,
    completed: i64,
    created_at: String,
}

impl ChecklistRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            proposal_id: row.get(1)?,
            item: row.get(2)?,
            category: row.get(3)?,
            completed: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_item(self) -> Result<ChecklistItem, RepositoryError> {
        let category = ChecklistCategory::from_label(&self.category).ok_or_else(|| {
            RepositoryError::Corrupt(format!("unknown checklist category '{}'", self.category))
        })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|err| {
                RepositoryError::Corrupt(format!("invalid checklist timestamp: {err}"))
            })?
            .with_timezone(&Utc);

        Ok(ChecklistItem {
            id: ChecklistItemId(self.id),
            proposal_id: ProposalId(self.proposal_id),
            text: self.item,
            category,
            completed: self.completed != 0,
            created_at,
        })
    }
}

fn load_checklist(
    conn: &Connection,
    proposal_id: &ProposalId,
) -> Result<Vec<ChecklistItem>, RepositoryError> {
    let mut stmt = conn
        .prepare(&format!(
            "{CHECKLIST_SELECT_SQL} WHERE proposal_id = ?1 ORDER BY position, created_at;"
        ))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![proposal_id.0], ChecklistRow::from_row)
        .map_err(sqlite_error)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.map_err(sqlite_error)?.into_item()?);
    }
    Ok(items)
}

fn sqlite_error(err: rusqlite::Error) -> RepositoryError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => RepositoryError::Conflict,
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

impl ProposalRepository for SqliteSubmissionStore {
    fn proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT p.id, p.title, p.status, p.opportunity_id,
                        o.title, o.agency, o.notice_id, o.naics_code, o.set_aside,
                        o.response_deadline
                 FROM proposals p
                 LEFT JOIN opportunities o ON o.id = p.opportunity_id
                 WHERE p.id = ?1;",
                params![id.0],
                |row| {
                    Ok(ProposalRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        status: row.get(2)?,
                        opportunity_id: row.get(3)?,
                        opportunity_title: row.get(4)?,
                        agency: row.get(5)?,
                        notice_id: row.get(6)?,
                        naics_code: row.get(7)?,
                        set_aside: row.get(8)?,
                        response_deadline: row.get(9)?,
                    })
                },
            )
            .optional()
            .map_err(sqlite_error)?;

        row.map(ProposalRow::into_proposal).transpose()
    }

    fn sections(&self, id: &ProposalId) -> Result<Vec<ProposalSection>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT section_name, content, order_index
                 FROM proposal_sections
                 WHERE proposal_id = ?1
                 ORDER BY order_index, id;",
            )
            .map_err(sqlite_error)?;
        let rows = stmt
            .query_map(params![id.0], |row| {
                Ok(ProposalSection {
                    name: row.get(0)?,
                    content: row.get(1)?,
                    order: row.get(2)?,
                })
            })
            .map_err(sqlite_error)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sqlite_error)
    }

    fn requirements(
        &self,
        id: &ProposalId,
    ) -> Result<Vec<ComplianceRequirement>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT requirement, status, section_ref, notes
                 FROM compliance_requirements
                 WHERE proposal_id = ?1
                 ORDER BY id;",
            )
            .map_err(sqlite_error)?;
        let rows = stmt
            .query_map(params![id.0], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(sqlite_error)?;

        let mut requirements = Vec::new();
        for row in rows {
            let (requirement_text, status, section_ref, notes) = row.map_err(sqlite_error)?;
            let status = RequirementStatus::from_label(&status).ok_or_else(|| {
                RepositoryError::Corrupt(format!("unknown requirement status '{status}'"))
            })?;
            requirements.push(ComplianceRequirement {
                requirement_text,
                status,
                section_ref,
                notes,
            });
        }
        Ok(requirements)
    }
}

impl ChecklistRepository for SqliteSubmissionStore {
    fn checklist(&self, proposal_id: &ProposalId) -> Result<Vec<ChecklistItem>, RepositoryError> {
        let conn = self.lock()?;
        load_checklist(&conn, proposal_id)
    }

    fn seed_if_empty(
        &self,
        proposal_id: &ProposalId,
        drafts: Vec<ChecklistItemDraft>,
    ) -> Result<SeedOutcome, RepositoryError> {
        let mut conn = self.lock()?;
        // IMMEDIATE takes the write lock before the emptiness check.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(sqlite_error)?;

        let existing: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM submission_checklists WHERE proposal_id = ?1;",
                params![proposal_id.0],
                |row| row.get(0),
            )
            .map_err(sqlite_error)?;

        let inserted = existing == 0;
        if inserted {
            let created_at = Utc::now().to_rfc3339();
            for draft in &drafts {
                tx.execute(
                    "INSERT INTO submission_checklists
                        (id, proposal_id, position, item, category, completed, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6);",
                    params![
                        Uuid::new_v4().to_string(),
                        proposal_id.0,
                        draft.position,
                        draft.text,
                        draft.category.label(),
                        created_at,
                    ],
                )
                .map_err(sqlite_error)?;
            }
        }

        let items = load_checklist(&tx, proposal_id)?;
        tx.commit().map_err(sqlite_error)?;

        Ok(SeedOutcome { inserted, items })
    }

    fn set_completed(
        &self,
        item_id: &ChecklistItemId,
        completed: bool,
    ) -> Result<Option<ChecklistItem>, RepositoryError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE submission_checklists SET completed = ?1 WHERE id = ?2;",
                params![i64::from(completed), item_id.0],
            )
            .map_err(sqlite_error)?;
        if changed == 0 {
            return Ok(None);
        }

        let row = conn
            .query_row(
                &format!("{CHECKLIST_SELECT_SQL} WHERE id = ?1;"),
                params![item_id.0],
                ChecklistRow::from_row,
            )
            .optional()
            .map_err(sqlite_error)?;

        row.map(ChecklistRow::into_item).transpose()
    }
}
