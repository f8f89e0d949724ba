//! # Book Routes
//!
//! | Method | Path              | Success                    |
//! |--------|-------------------|----------------------------|
//! | POST   | /api/books        | 201, created record        |
//! | GET    | /api/books        | 200, array of records      |
//! | GET    | /api/books/:id    | 200, record                |
//! | PUT    | /api/books/:id    | 200, updated record        |
//! | DELETE | /api/books/:id    | 200, `{message, deletedBook}` |
//!
//! Identifiers are validated before the body so a malformed id is always
//! reported as such.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::book::Book;

use super::errors::RestError;
use super::filter::{build_filter, BookQuery};
use super::handler::BookGateway;
use super::response::DeleteResponse;
use super::validation::{validate_create_or_replace, validate_identifier};

type GatewayState = Arc<BookGateway>;

/// Build the `/api/books` router
pub fn book_routes(gateway: GatewayState) -> Router {
    Router::new()
        .route("/api/books", get(list_handler).post(create_handler))
        .route(
            "/api/books/:id",
            get(get_handler).put(replace_handler).delete(delete_handler),
        )
        .with_state(gateway)
}

async fn create_handler(
    State(gateway): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), RestError> {
    let Json(payload) = body?;
    let fields = validate_create_or_replace(&payload)?;

    let book = gateway.create(fields)?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_handler(
    State(gateway): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Book>>, RestError> {
    let filter = build_filter(&BookQuery::from_params(&params));
    Ok(Json(gateway.list_all(&filter)?))
}

async fn get_handler(
    State(gateway): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, RestError> {
    let id = validate_identifier(&id)?;
    Ok(Json(gateway.get_by_id(&id)?))
}

async fn replace_handler(
    State(gateway): State<GatewayState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, RestError> {
    let id = validate_identifier(&id)?;
    let Json(payload) = body?;
    let fields = validate_create_or_replace(&payload)?;

    Ok(Json(gateway.replace_by_id(&id, fields)?))
}

async fn delete_handler(
    State(gateway): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, RestError> {
    let id = validate_identifier(&id)?;
    let book = gateway.delete_by_id(&id)?;
    Ok(Json(DeleteResponse::new(book)))
}
