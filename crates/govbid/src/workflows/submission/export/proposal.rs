use chrono::{DateTime, Utc};

use super::super::domain::{Proposal, ProposalSection};
use super::docx::{self, RenderError, ALERT_RED, BRAND_GREEN, SLATE};

const BULLET_MARKERS: [&str; 3] = ["- ", "\u{2022} ", "* "];

/// Cover page, table of contents, section bodies and a document information table.
pub fn render_proposal(
    proposal: &Proposal,
    sections: &[ProposalSection],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = docx::document(11);
    let opportunity = proposal.opportunity.clone().unwrap_or_default();

    doc = doc.add_paragraph(docx::paragraph(""));
    let title = if proposal.title.trim().is_empty() {
        "Untitled Proposal"
    } else {
        proposal.title.as_str()
    };
    doc = doc.add_paragraph(docx::centered(
        docx::sized(title, 24).bold().color(BRAND_GREEN),
    ));
    if let Some(agency) = non_blank(&opportunity.agency) {
        doc = doc.add_paragraph(docx::centered(
            docx::sized(&format!("Submitted to: {agency}"), 14).color(SLATE),
        ));
    }
    if let Some(notice_id) = non_blank(&opportunity.notice_id) {
        doc = doc.add_paragraph(docx::centered(docx::sized(
            &format!("Solicitation: {notice_id}"),
            12,
        )));
    }
    doc = doc.add_paragraph(docx::centered(docx::sized(
        &format!("Date: {}", generated_at.format("%B %d, %Y")),
        12,
    )));
    if let Some(deadline) = non_blank(&opportunity.response_deadline) {
        doc = doc.add_paragraph(docx::centered(
            docx::sized(&format!("Response Deadline: {deadline}"), 11).color(ALERT_RED),
        ));
    }
    doc = doc.add_paragraph(docx::page_break());

    doc = doc.add_paragraph(docx::heading("Table of Contents", 1));
    for (index, section) in sections.iter().enumerate() {
        let number = index + 1;
        let name = if section.name.trim().is_empty() {
            format!("Section {number}")
        } else {
            section.name.clone()
        };
        doc = doc.add_paragraph(docx::numbered(number, &name));
    }
    doc = doc.add_paragraph(docx::page_break());

    for section in sections {
        let heading = if section.name.trim().is_empty() {
            "Untitled Section"
        } else {
            section.name.as_str()
        };
        doc = doc.add_paragraph(docx::heading(heading, 1));
        for line in section.content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let paragraph = match strip_bullet(line) {
                Some(item) => docx::bullet(item),
                None => docx::paragraph(line),
            };
            doc = doc.add_paragraph(paragraph);
        }
    }

    doc = doc
        .add_paragraph(docx::page_break())
        .add_paragraph(docx::heading("Document Information", 2));
    let naics = non_blank(&opportunity.naics_code).unwrap_or("N/A");
    let info = docx::grid(
        None,
        &[
            vec!["Proposal ID".to_string(), proposal.id.to_string()],
            vec!["Status".to_string(), proposal.status.label().to_string()],
            vec![
                "Generated".to_string(),
                generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            ],
            vec!["NAICS Code".to_string(), naics.to_string()],
        ],
    );
    if let Some(table) = info {
        doc = doc.add_table(table);
    }

    docx::pack(doc)
}

fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|raw| !raw.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_all_bullet_markers() {
        assert_eq!(strip_bullet("- past performance"), Some("past performance"));
        assert_eq!(strip_bullet("\u{2022} staffing"), Some("staffing"));
        assert_eq!(strip_bullet("* pricing"), Some("pricing"));
        assert_eq!(strip_bullet("-no space"), None);
        assert_eq!(strip_bullet("Plain sentence."), None);
    }
}
