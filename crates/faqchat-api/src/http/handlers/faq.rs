//! FAQ entry CRUD handlers for the REST API.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use faqchat_types::faq::{BulkFaqRequest, EntryId, FaqEntry, FaqEntryRequest};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

/// Parse a path segment as an entry id; malformed ids are a 400.
fn parse_entry_id(raw: &str) -> Result<EntryId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid entry id: '{raw}'")))
}

/// GET /api/v1/faq - List all entries in match order.
pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FaqEntry>>>, AppError> {
    let meta = RequestMeta::start();

    let entries = state.faq_service.list_entries().await?;

    Ok(Json(meta.respond(entries).with_link("self", "/api/v1/faq")))
}

/// POST /api/v1/faq - Create an entry.
pub async fn create_entry(
    State(state): State<AppState>,
    body: Result<Json<FaqEntryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FaqEntry>>, AppError> {
    let meta = RequestMeta::start();
    let Json(body) = body?;

    let entry = state.faq_service.create_entry(body).await?;
    let href = format!("/api/v1/faq/{}", entry.id);

    Ok(Json(meta.respond(entry).with_link("self", &href)))
}

/// POST /api/v1/faq/bulk - Create many entries atomically.
pub async fn create_bulk(
    State(state): State<AppState>,
    body: Result<Json<BulkFaqRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<FaqEntry>>>, AppError> {
    let meta = RequestMeta::start();
    let Json(body) = body?;

    let entries = state.faq_service.create_many(body).await?;

    Ok(Json(meta.respond(entries).with_link("collection", "/api/v1/faq")))
}

/// DELETE /api/v1/faq - Delete every entry.
pub async fn delete_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let meta = RequestMeta::start();

    let deleted = state.faq_service.delete_all().await?;

    Ok(Json(meta.respond(serde_json::json!({ "deleted": deleted }))))
}

/// GET /api/v1/faq/{id} - Get one entry.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FaqEntry>>, AppError> {
    let meta = RequestMeta::start();
    let id = parse_entry_id(&id)?;

    let entry = state.faq_service.get_entry(&id).await?;

    Ok(Json(
        meta.respond(entry)
            .with_link("self", &format!("/api/v1/faq/{id}"))
            .with_link("collection", "/api/v1/faq"),
    ))
}

/// PUT /api/v1/faq/{id} - Replace an entry's content.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FaqEntryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FaqEntry>>, AppError> {
    let meta = RequestMeta::start();
    let id = parse_entry_id(&id)?;
    let Json(body) = body?;

    let entry = state.faq_service.update_entry(&id, body).await?;

    Ok(Json(
        meta.respond(entry)
            .with_link("self", &format!("/api/v1/faq/{id}")),
    ))
}

/// DELETE /api/v1/faq/{id} - Delete one entry.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let meta = RequestMeta::start();
    let id = parse_entry_id(&id)?;

    state.faq_service.delete_entry(&id).await?;

    Ok(Json(meta.respond(serde_json::json!({
        "deleted": true,
        "id": id,
    }))))
}
