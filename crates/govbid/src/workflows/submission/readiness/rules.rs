use super::super::domain::{
    ChecklistItem, ComplianceRequirement, Proposal, ProposalSection, ProposalStatus,
    RequirementStatus,
};
use super::{
    ChecklistBreakdown, ComplianceBreakdown, MetadataBreakdown, SectionBreakdown,
    CHECKLIST_WEIGHT, COMPLIANCE_WEIGHT, METADATA_WEIGHT, SECTIONS_WEIGHT,
};

/// Minimum number of sections for the metadata completeness check.
const MINIMUM_SECTION_COUNT: usize = 3;

/// Scales `numerator / denominator` onto `weight` points.
///
/// Rounds half to even and never exceeds `weight`; an empty denominator yields zero.
pub(crate) fn percent_of(numerator: f64, denominator: usize, weight: u8) -> u8 {
    if denominator == 0 {
        return 0;
    }

    let share = numerator / denominator as f64;
    let points = (share * f64::from(weight)).round_ties_even();
    points.clamp(0.0, f64::from(weight)) as u8
}

pub(crate) fn score_sections(sections: &[ProposalSection]) -> SectionBreakdown {
    let with_content = sections.iter().filter(|section| section.has_content()).count();

    SectionBreakdown {
        score: percent_of(with_content as f64, sections.len(), SECTIONS_WEIGHT),
        max: SECTIONS_WEIGHT,
        total: sections.len(),
        with_content,
    }
}

pub(crate) fn score_compliance(requirements: &[ComplianceRequirement]) -> ComplianceBreakdown {
    let count = |status: RequirementStatus| {
        requirements
            .iter()
            .filter(|requirement| requirement.status == status)
            .count()
    };
    let addressed = count(RequirementStatus::Addressed);
    let partial = count(RequirementStatus::Partial);
    let not_addressed = count(RequirementStatus::NotAddressed);
    let credited = addressed as f64 + partial as f64 * 0.5;

    ComplianceBreakdown {
        score: percent_of(credited, requirements.len(), COMPLIANCE_WEIGHT),
        max: COMPLIANCE_WEIGHT,
        total: requirements.len(),
        addressed,
        partial,
        not_addressed,
    }
}

pub(crate) fn score_checklist(items: &[ChecklistItem]) -> ChecklistBreakdown {
    let completed = items.iter().filter(|item| item.completed).count();

    ChecklistBreakdown {
        score: percent_of(completed as f64, items.len(), CHECKLIST_WEIGHT),
        max: CHECKLIST_WEIGHT,
        total: items.len(),
        completed,
    }
}

pub(crate) fn score_metadata(proposal: &Proposal, section_count: usize) -> MetadataBreakdown {
    let checks = [
        !proposal.title.is_empty(),
        proposal
            .opportunity_id
            .as_deref()
            .is_some_and(|id| !id.is_empty()),
        matches!(
            proposal.status,
            ProposalStatus::InReview | ProposalStatus::Submitted
        ),
        section_count >= MINIMUM_SECTION_COUNT,
    ];
    let checks_passed = checks.iter().filter(|passed| **passed).count();

    MetadataBreakdown {
        score: percent_of(checks_passed as f64, checks.len(), METADATA_WEIGHT),
        max: METADATA_WEIGHT,
        checks_passed,
        total_checks: checks.len(),
    }
}
