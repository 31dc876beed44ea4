/*
 * Responsibility
 * - /examples 系 CRUD handler
 * - Path/Query/Json を extractor で受け、DTO validation → repo 呼び出し
 * - extractor の rejection も AppError (JSON error body) に揃える
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::examples::{ExampleRequest, ExampleResponse, ListQuery},
    error::AppError,
    repos::Example,
    state::AppState,
};

fn example_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::bad_request("INVALID_ID", "invalid id"))
}

fn validated(req: &ExampleRequest) -> Result<(), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))
}

pub async fn list_examples(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ExampleResponse>>, AppError> {
    let Query(query) = query?;
    let rows = state
        .examples
        .list(query.limit(), query.offset())
        .await?;

    Ok(Json(rows.into_iter().map(ExampleResponse::from).collect()))
}

pub async fn create_example(
    State(state): State<AppState>,
    body: Result<Json<ExampleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExampleResponse>), AppError> {
    let Json(req) = body?;
    validated(&req)?;

    let row = state
        .examples
        .create(Example::new(req.name.trim(), req.description))
        .await?;

    tracing::info!(id = %row.id, "example created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_example(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExampleResponse>, AppError> {
    let id = example_id(path)?;

    let row = state
        .examples
        .get(id)
        .await?
        .ok_or(AppError::not_found("example"))?;

    Ok(Json(row.into()))
}

pub async fn update_example(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ExampleRequest>, JsonRejection>,
) -> Result<Json<ExampleResponse>, AppError> {
    let id = example_id(path)?;
    let Json(req) = body?;
    validated(&req)?;

    let row = state
        .examples
        .update(id, req.name.trim().to_string(), req.description)
        .await?;

    Ok(Json(row.into()))
}

pub async fn delete_example(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = example_id(path)?;
    state.examples.delete(id).await?;

    tracing::info!(%id, "example deleted");
    Ok(StatusCode::NO_CONTENT)
}
