//! HTTP handlers for the `/items` routes.
//!
//! Handlers validate first, then call the repository; every error funnels
//! through the single [`ApiError`] translation, so no handler shapes its own
//! failure response.

use crate::db::ItemRepository;
use crate::error::{ApiError, ApiResult};
use crate::models::Item;
use crate::validate::{ItemDraft, parse_item_id};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ItemRepository>,
}

/// Build the items router.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .with_state(state)
}

/// GET /items — all items, descending by id.
async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.repository.list_all().await?))
}

/// POST /items — create from a validated payload, 201 with the stored row.
async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let draft = draft_from_body(body)?;
    let item = state.repository.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items/{id}
async fn get_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Item>> {
    let id = parse_item_id(&raw_id)?;
    Ok(Json(state.repository.get_by_id(id).await?))
}

/// PUT /items/{id} — full replace of name/description. The id is validated
/// before the body so a malformed path never reads the payload.
async fn update_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let id = parse_item_id(&raw_id)?;
    let draft = draft_from_body(body)?;
    Ok(Json(state.repository.update_by_id(id, &draft).await?))
}

/// DELETE /items/{id} — permanent removal.
async fn delete_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_item_id(&raw_id)?;
    state.repository.delete_by_id(id).await?;
    Ok(Json(json!({ "ok": true })))
}

/// A body that is not valid JSON is an invalid payload, not a server error.
fn draft_from_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<ItemDraft> {
    let Json(value) = body.map_err(|_| ApiError::invalid_payload("invalid JSON body"))?;
    ItemDraft::from_json(&value)
}
