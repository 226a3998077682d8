use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use super::domain::{ChecklistItemId, ProposalId};
use super::package::{PackageOutcome, ZIP_MEDIA_TYPE};
use super::repository::SubmissionStore;
use super::service::{SubmissionService, SubmissionServiceError};

/// Body accepted when toggling a checklist item.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChecklistItemUpdate {
    pub completed: bool,
}

/// Router builder exposing checklist, readiness, export and packaging endpoints.
pub fn submission_router<S>(service: Arc<SubmissionService<S>>) -> Router
where
    S: SubmissionStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/submission/seed_checklist/:proposal_id",
            post(seed_checklist_handler::<S>),
        )
        .route(
            "/api/v1/submission/checklist/:proposal_id",
            get(checklist_handler::<S>),
        )
        .route(
            "/api/v1/submission/checklist/item/:item_id",
            put(update_item_handler::<S>),
        )
        .route(
            "/api/v1/submission/readiness/:proposal_id",
            get(readiness_handler::<S>),
        )
        .route(
            "/api/v1/submission/brief/:proposal_id",
            get(brief_handler::<S>),
        )
        .route(
            "/api/v1/submission/package/:proposal_id",
            get(package_handler::<S>),
        )
        .route(
            "/api/v1/export/proposal/:proposal_id",
            get(export_proposal_handler::<S>),
        )
        .route(
            "/api/v1/export/compliance/:proposal_id",
            get(export_compliance_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn seed_checklist_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.seed_checklist(&ProposalId(proposal_id)) {
        Ok(seeded) => {
            let payload = json!({
                "seeded": seeded.seeded,
                "count": seeded.items.len(),
                "items": seeded.items,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn checklist_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.checklist(&ProposalId(proposal_id)) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn update_item_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(item_id): Path<String>,
    axum::Json(update): axum::Json<ChecklistItemUpdate>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.update_checklist_item(&ChecklistItemId(item_id), update.completed) {
        Ok(item) => {
            let payload = json!({
                "updated": true,
                "item": item,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn readiness_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.readiness(&ProposalId(proposal_id)) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn brief_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.brief(&ProposalId(proposal_id)).await {
        Ok(brief) => (StatusCode::OK, axum::Json(json!({ "brief": brief }))).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn package_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.package(&ProposalId(proposal_id)).await {
        Ok(PackageOutcome::Archive(archive)) => {
            attachment(&archive.file_name, ZIP_MEDIA_TYPE, archive.bytes)
        }
        Ok(PackageOutcome::Rejected(rejection)) => {
            let payload = json!({
                "error": rejection.message(),
                "readiness": rejection.readiness,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn export_proposal_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.export_proposal(&ProposalId(proposal_id)) {
        Ok(document) => attachment(&document.file_name, &document.media_type, document.bytes),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn export_compliance_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.export_compliance(&ProposalId(proposal_id)) {
        Ok(document) => attachment(&document.file_name, &document.media_type, document.bytes),
        Err(other) => error_response(other),
    }
}

fn attachment(file_name: &str, media_type: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

fn error_response(error: SubmissionServiceError) -> Response {
    let status = if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else if error.is_unprocessable() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else if error.is_upstream() {
        warn!(error = %error, "brief generation failed upstream");
        StatusCode::BAD_GATEWAY
    } else {
        error!(error = %error, "submission request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
