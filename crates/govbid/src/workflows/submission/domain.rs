use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for proposals drafted against an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub String);

impl ProposalId {
    /// Leading characters used in export file names.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((index, _)) => &self.0[..index],
            None => &self.0,
        }
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for seeded checklist rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistItemId(pub String);

impl fmt::Display for ChecklistItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a proposal as tracked by the capture team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    InReview,
    Ready,
    Submitted,
    Awarded,
    Rejected,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::InReview => "in_review",
            ProposalStatus::Ready => "ready",
            ProposalStatus::Submitted => "submitted",
            ProposalStatus::Awarded => "awarded",
            ProposalStatus::Rejected => "rejected",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "draft" => Some(ProposalStatus::Draft),
            "in_review" => Some(ProposalStatus::InReview),
            "ready" => Some(ProposalStatus::Ready),
            "submitted" => Some(ProposalStatus::Submitted),
            "awarded" => Some(ProposalStatus::Awarded),
            "rejected" => Some(ProposalStatus::Rejected),
            _ => None,
        }
    }
}

/// Solicitation details carried alongside a proposal for exports and briefs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunitySummary {
    pub title: String,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub notice_id: Option<String>,
    #[serde(default)]
    pub naics_code: Option<String>,
    #[serde(default)]
    pub set_aside: Option<String>,
    #[serde(default)]
    pub response_deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub status: ProposalStatus,
    #[serde(default)]
    pub opportunity_id: Option<String>,
    #[serde(default)]
    pub opportunity: Option<OpportunitySummary>,
}

/// Sections shorter than this many characters are treated as placeholders.
pub const SECTION_CONTENT_MIN_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSection {
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub order: u32,
}

impl ProposalSection {
    pub fn has_content(&self) -> bool {
        self.content.chars().count() > SECTION_CONTENT_MIN_CHARS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Addressed,
    Partial,
    NotAddressed,
    Na,
}

impl RequirementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequirementStatus::Addressed => "addressed",
            RequirementStatus::Partial => "partial",
            RequirementStatus::NotAddressed => "not_addressed",
            RequirementStatus::Na => "na",
        }
    }

    /// Title-cased label used in rendered matrices.
    pub const fn display(self) -> &'static str {
        match self {
            RequirementStatus::Addressed => "Addressed",
            RequirementStatus::Partial => "Partial",
            RequirementStatus::NotAddressed => "Not Addressed",
            RequirementStatus::Na => "Na",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "addressed" => Some(RequirementStatus::Addressed),
            "partial" => Some(RequirementStatus::Partial),
            "not_addressed" => Some(RequirementStatus::NotAddressed),
            "na" => Some(RequirementStatus::Na),
            _ => None,
        }
    }
}

/// A single "shall/must" obligation extracted from the solicitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRequirement {
    pub requirement_text: String,
    pub status: RequirementStatus,
    #[serde(default)]
    pub section_ref: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    Compliance,
    Content,
    Pricing,
    Formatting,
    Attachments,
    Eligibility,
    Submission,
    Review,
}

impl ChecklistCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ChecklistCategory::Compliance => "compliance",
            ChecklistCategory::Content => "content",
            ChecklistCategory::Pricing => "pricing",
            ChecklistCategory::Formatting => "formatting",
            ChecklistCategory::Attachments => "attachments",
            ChecklistCategory::Eligibility => "eligibility",
            ChecklistCategory::Submission => "submission",
            ChecklistCategory::Review => "review",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "compliance" => Some(ChecklistCategory::Compliance),
            "content" => Some(ChecklistCategory::Content),
            "pricing" => Some(ChecklistCategory::Pricing),
            "formatting" => Some(ChecklistCategory::Formatting),
            "attachments" => Some(ChecklistCategory::Attachments),
            "eligibility" => Some(ChecklistCategory::Eligibility),
            "submission" => Some(ChecklistCategory::Submission),
            "review" => Some(ChecklistCategory::Review),
            _ => None,
        }
    }
}

/// Static catalog entry; instantiated per proposal when a checklist is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItemTemplate {
    pub text: &'static str,
    pub category: ChecklistCategory,
}

/// Unsaved checklist row handed to the repository during seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItemDraft {
    pub position: u32,
    pub text: String,
    pub category: ChecklistCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub proposal_id: ProposalId,
    pub text: String,
    pub category: ChecklistCategory,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}
