use chrono::{DateTime, Utc};

use super::super::domain::{ComplianceRequirement, Proposal, RequirementStatus};
use super::docx::{self, RenderError, BRAND_GREEN};

const REQUIREMENT_TEXT_LIMIT: usize = 200;
const MATRIX_HEADER: [&str; 5] = ["#", "Requirement", "Section Ref", "Status", "Notes"];

pub fn render_compliance_matrix(
    proposal: &Proposal,
    requirements: &[ComplianceRequirement],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = docx::document(10).add_paragraph(docx::centered(
        docx::sized("Compliance Traceability Matrix", 18)
            .bold()
            .color(BRAND_GREEN),
    ));

    let title = if proposal.title.trim().is_empty() {
        "Untitled Proposal"
    } else {
        proposal.title.as_str()
    };
    doc = doc.add_paragraph(docx::centered(docx::sized(title, 12)));
    let notice_id = proposal
        .opportunity
        .as_ref()
        .and_then(|opportunity| opportunity.notice_id.as_deref())
        .map(str::trim)
        .filter(|raw| !raw.is_empty());
    if let Some(notice_id) = notice_id {
        doc = doc.add_paragraph(docx::centered(docx::sized(
            &format!("Solicitation: {notice_id}"),
            11,
        )));
    }
    doc = doc
        .add_paragraph(docx::centered(docx::sized(
            &format!("Generated: {}", generated_at.format("%B %d, %Y")),
            10,
        )))
        .add_paragraph(docx::paragraph(""));

    let count = |status: RequirementStatus| {
        requirements
            .iter()
            .filter(|requirement| requirement.status == status)
            .count()
    };
    doc = doc.add_paragraph(docx::heading("Summary", 2));
    let summary = docx::grid(
        None,
        &[vec![
            format!("Total: {}", requirements.len()),
            format!("Addressed: {}", count(RequirementStatus::Addressed)),
            format!("Partial: {}", count(RequirementStatus::Partial)),
            format!("Not Addressed: {}", count(RequirementStatus::NotAddressed)),
        ]],
    );
    if let Some(table) = summary {
        doc = doc.add_table(table);
    }
    doc = doc
        .add_paragraph(docx::paragraph(""))
        .add_paragraph(docx::heading("Requirements Matrix", 2));

    if requirements.is_empty() {
        doc = doc.add_paragraph(docx::paragraph(
            "No compliance requirements found for this proposal.",
        ));
    } else {
        let rows: Vec<Vec<String>> = requirements
            .iter()
            .enumerate()
            .map(|(index, requirement)| {
                vec![
                    (index + 1).to_string(),
                    requirement
                        .requirement_text
                        .chars()
                        .take(REQUIREMENT_TEXT_LIMIT)
                        .collect(),
                    requirement.section_ref.clone().unwrap_or_default(),
                    requirement.status.display().to_string(),
                    requirement.notes.clone().unwrap_or_default(),
                ]
            })
            .collect();
        if let Some(table) = docx::grid(Some(&MATRIX_HEADER), &rows) {
            doc = doc.add_table(table);
        }
    }

    docx::pack(doc)
}
