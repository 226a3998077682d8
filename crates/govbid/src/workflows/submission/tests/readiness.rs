use super::common::*;
use std::sync::Arc;

use chrono::Utc;

use crate::workflows::submission::domain::{
    ChecklistCategory, ChecklistItem, ChecklistItemId, ProposalId, ProposalStatus,
    RequirementStatus,
};
use crate::workflows::submission::readiness::percent_of;
use crate::workflows::submission::{
    evaluate, ChecklistStore, ReadinessError, ReadinessInputs, ReadinessScorer, ReadinessStatus,
};

fn checklist(total: usize, completed: usize) -> Vec<ChecklistItem> {
    (0..total)
        .map(|index| ChecklistItem {
            id: ChecklistItemId(format!("item-{index}")),
            proposal_id: proposal_id(),
            text: format!("Checklist item {index}"),
            category: ChecklistCategory::Submission,
            completed: index < completed,
            created_at: Utc::now(),
        })
        .collect()
}

fn inputs() -> ReadinessInputs {
    ReadinessInputs {
        proposal: bare_proposal(),
        sections: Vec::new(),
        requirements: Vec::new(),
        checklist: Vec::new(),
    }
}

#[test]
fn empty_proposal_scores_zero() {
    let result = evaluate(&inputs());

    assert_eq!(result.score, 0);
    assert_eq!(result.max_score, 100);
    assert_eq!(result.status, ReadinessStatus::NotReady);
    assert_eq!(
        result.recommendation,
        "Proposal is in early stages. Complete core sections first."
    );
    assert_eq!(result.breakdown.metadata.total_checks, 4);
    assert_eq!(result.breakdown.metadata.checks_passed, 0);
}

#[test]
fn sections_score_counts_substantive_content() {
    let mut inputs = inputs();
    inputs.sections = vec![
        drafted_section("Technical Approach", 1),
        drafted_section("Management Approach", 2),
        drafted_section("Staffing Plan", 3),
        placeholder_section("Past Performance", 4),
    ];

    let result = evaluate(&inputs);

    assert_eq!(result.breakdown.sections.score, 19);
    assert_eq!(result.breakdown.sections.total, 4);
    assert_eq!(result.breakdown.sections.with_content, 3);
}

#[test]
fn content_of_exactly_fifty_characters_is_a_placeholder() {
    let mut inputs = inputs();
    let mut section = placeholder_section("Executive Summary", 1);
    section.content = "x".repeat(50);
    inputs.sections = vec![section.clone()];
    assert_eq!(evaluate(&inputs).breakdown.sections.with_content, 0);

    section.content.push('x');
    inputs.sections = vec![section];
    assert_eq!(evaluate(&inputs).breakdown.sections.with_content, 1);
}

#[test]
fn compliance_gives_half_credit_for_partial() {
    let mut inputs = inputs();
    inputs.requirements = requirements(&[
        (RequirementStatus::Addressed, 6),
        (RequirementStatus::Partial, 2),
        (RequirementStatus::NotAddressed, 2),
    ]);

    let compliance = evaluate(&inputs).breakdown.compliance;

    assert_eq!(compliance.score, 21);
    assert_eq!(compliance.total, 10);
    assert_eq!(compliance.addressed, 6);
    assert_eq!(compliance.partial, 2);
    assert_eq!(compliance.not_addressed, 2);
}

#[test]
fn na_requirements_count_toward_total_only() {
    let mut inputs = inputs();
    inputs.requirements = requirements(&[
        (RequirementStatus::Addressed, 1),
        (RequirementStatus::Na, 1),
    ]);

    assert_eq!(evaluate(&inputs).breakdown.compliance.score, 15);
}

#[test]
fn checklist_score_uses_completed_share() {
    let mut inputs = inputs();
    inputs.checklist = checklist(18, 9);

    let breakdown = evaluate(&inputs).breakdown.checklist;

    // 25 * 9 / 18 = 12.5, rounded half to even
    assert_eq!(breakdown.score, 12);
    assert_eq!(breakdown.completed, 9);
    assert_eq!(breakdown.total, 18);
}

#[test]
fn metadata_checks_title_opportunity_status_and_section_count() {
    let mut inputs = inputs();
    inputs.proposal = proposal();
    inputs.proposal.status = ProposalStatus::InReview;
    inputs.sections = four_drafted_sections();

    let metadata = evaluate(&inputs).breakdown.metadata;
    assert_eq!(metadata.checks_passed, 4);
    assert_eq!(metadata.score, 20);

    inputs.proposal.status = ProposalStatus::Ready;
    let metadata = evaluate(&inputs).breakdown.metadata;
    assert_eq!(metadata.checks_passed, 3);
    assert_eq!(metadata.score, 15);

    inputs.proposal.opportunity_id = Some(String::new());
    inputs.sections.truncate(2);
    let metadata = evaluate(&inputs).breakdown.metadata;
    assert_eq!(metadata.checks_passed, 1);
    assert_eq!(metadata.score, 5);
}

#[test]
fn complete_proposal_scores_one_hundred() {
    let mut proposal = proposal();
    proposal.status = ProposalStatus::Submitted;
    let inputs = ReadinessInputs {
        proposal,
        sections: four_drafted_sections(),
        requirements: requirements(&[(RequirementStatus::Addressed, 12)]),
        checklist: checklist(18, 18),
    };

    let result = evaluate(&inputs);

    assert_eq!(result.score, 100);
    assert_eq!(result.status, ReadinessStatus::Ready);
    assert_eq!(result.recommendation, "Proposal is ready for submission.");
}

#[test]
fn total_is_sum_of_capped_components() {
    let mut proposal = proposal();
    proposal.status = ProposalStatus::InReview;
    let inputs = ReadinessInputs {
        proposal,
        sections: vec![
            drafted_section("Technical Approach", 1),
            placeholder_section("Pricing", 2),
            drafted_section("Staffing Plan", 3),
        ],
        requirements: requirements(&[
            (RequirementStatus::Addressed, 2),
            (RequirementStatus::Partial, 3),
            (RequirementStatus::NotAddressed, 2),
        ]),
        checklist: checklist(18, 7),
    };

    let result = evaluate(&inputs);
    let breakdown = result.breakdown;

    assert_eq!(
        result.score,
        breakdown.sections.score
            + breakdown.compliance.score
            + breakdown.checklist.score
            + breakdown.metadata.score
    );
    assert!(breakdown.sections.score <= breakdown.sections.max);
    assert!(breakdown.compliance.score <= breakdown.compliance.max);
    assert!(breakdown.checklist.score <= breakdown.checklist.max);
    assert!(breakdown.metadata.score <= breakdown.metadata.max);
    assert!(result.score <= result.max_score);
    // 17 + 15 + 10 + 20
    assert_eq!(result.score, 62);
    assert_eq!(result.status, ReadinessStatus::InProgress);
}

#[test]
fn banding_boundaries() {
    let cases = [
        (0, ReadinessStatus::NotReady),
        (39, ReadinessStatus::NotReady),
        (40, ReadinessStatus::InProgress),
        (69, ReadinessStatus::InProgress),
        (70, ReadinessStatus::AlmostReady),
        (89, ReadinessStatus::AlmostReady),
        (90, ReadinessStatus::Ready),
        (100, ReadinessStatus::Ready),
    ];

    for (score, expected) in cases {
        assert_eq!(ReadinessStatus::from_score(score), expected, "score {score}");
    }
    assert_eq!(
        ReadinessStatus::AlmostReady.recommendation(),
        "Proposal needs minor items completed before submission."
    );
    assert_eq!(
        ReadinessStatus::InProgress.recommendation(),
        "Significant work remains before submission."
    );
}

#[test]
fn percent_of_rounds_half_to_even_and_caps() {
    assert_eq!(percent_of(0.0, 0, 25), 0);
    assert_eq!(percent_of(1.0, 2, 25), 12);
    assert_eq!(percent_of(3.0, 4, 30), 22);
    assert_eq!(percent_of(5.0, 8, 20), 12);
    assert_eq!(percent_of(3.0, 2, 20), 20);
}

#[test]
fn scorer_reads_store_and_matches_pure_evaluation() {
    let store = gate_passing_store();
    let scorer = ReadinessScorer::new(store.clone());

    let result = scorer.score(&proposal_id()).expect("score");

    assert_eq!(result.score, 50);
    assert_eq!(result.breakdown.sections.score, 25);
    assert_eq!(result.breakdown.metadata.score, 15);
    assert_eq!(result.breakdown.compliance.score, 10);
    assert_eq!(result.breakdown.checklist.score, 0);
    assert_eq!(result.status, ReadinessStatus::InProgress);
}

#[test]
fn scorer_includes_seeded_checklist() {
    let store = gate_passing_store();
    let checklists = ChecklistStore::new(store.clone());
    let seeded = checklists.seed(&proposal_id()).expect("seed");
    for item in &seeded.items {
        checklists.update_item(&item.id, true).expect("update");
    }

    let result = ReadinessScorer::new(store)
        .score(&proposal_id())
        .expect("score");

    assert_eq!(result.breakdown.checklist.score, 25);
    assert_eq!(result.score, 75);
    assert_eq!(result.status, ReadinessStatus::AlmostReady);
}

#[test]
fn scorer_distinguishes_missing_proposal() {
    let scorer = ReadinessScorer::new(Arc::new(MemoryStore::default()));

    match scorer.score(&ProposalId("missing".to_string())) {
        Err(ReadinessError::ProposalNotFound(id)) => assert_eq!(id.0, "missing"),
        other => panic!("expected proposal not found, got {other:?}"),
    }
}

#[test]
fn scorer_propagates_repository_failures() {
    let scorer = ReadinessScorer::new(Arc::new(UnavailableStore));

    assert!(matches!(
        scorer.score(&proposal_id()),
        Err(ReadinessError::Repository(_))
    ));
}
