//! # Admin Handlers
//!
//! CRUD on "the cart identified by this ID", mounted at `/admin/cart`.
//!
//! Every handler runs the same state machine: authorize, execute, respond.
//! The authorizer gate comes first and its denials map to 403 regardless of
//! whether the target cart exists; unauthorized callers never learn whether
//! an ID is real. Authorizer infrastructure failures map to 500 and are not
//! conflated with denials.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use kaimono_core::{CartResult, Operation, OperationType};

use crate::response::{decode_cart, failure, success};
use crate::service::CartService;

/// Admin routes. Create takes no ID (nothing is contended at that path);
/// the remaining operations address an explicit cart ID.
pub(crate) fn router() -> Router<Arc<CartService>> {
    Router::new()
        .route("/admin/cart", post(create_cart))
        .route(
            "/admin/cart/{id}",
            get(get_cart).put(update_cart).delete(delete_cart),
        )
}

// =============================================================================
// Handlers
// =============================================================================

/// Returns the cart with the given ID.
///
/// Status codes: 200 OK, 403 not authorized, 404 not found, 500 other.
async fn get_cart(
    State(svc): State<Arc<CartService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    run_get(&svc, &headers, &id)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_get(svc: &CartService, headers: &HeaderMap, id: &str) -> CartResult<Response> {
    svc.authorizer
        .authorize(headers, Operation::cart(OperationType::Read), id)
        .await?;

    let cart = svc.store.lookup(id).await?;
    Ok(success(StatusCode::OK, cart))
}

/// Creates an empty cart without binding it to any session.
///
/// Status codes: 201 created, 403 not authorized, 500 other.
async fn create_cart(State(svc): State<Arc<CartService>>, headers: HeaderMap) -> Response {
    run_create(&svc, &headers)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_create(svc: &CartService, headers: &HeaderMap) -> CartResult<Response> {
    svc.authorizer
        .authorize(headers, Operation::cart(OperationType::Create), "")
        .await?;

    let cart = svc.store.create_unbound().await?;
    Ok(success(StatusCode::CREATED, cart))
}

/// Replaces the cart with the given ID wholesale.
///
/// The stored cart's ID always wins over whatever the client put in the
/// body: the payload's ID field is overwritten with the looked-up cart's ID
/// before storing, which closes off ID spoofing through the body.
///
/// Status codes: 200 updated, 400 decode failure, 403 not authorized,
/// 404 not found, 500 other.
async fn update_cart(
    State(svc): State<Arc<CartService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    run_update(&svc, &headers, &id, &body)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_update(
    svc: &CartService,
    headers: &HeaderMap,
    id: &str,
    body: &[u8],
) -> CartResult<Response> {
    svc.authorizer
        .authorize(headers, Operation::cart(OperationType::Update), id)
        .await?;

    let found = svc.store.lookup(id).await?;

    let mut payload = decode_cart(body)?;
    payload.id = found.id;

    svc.store.replace(payload.clone()).await?;
    Ok(success(StatusCode::OK, payload))
}

/// Deletes the cart with the given ID.
///
/// Status codes: 204 deleted, 403 not authorized, 404 not found, 500 other.
async fn delete_cart(
    State(svc): State<Arc<CartService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    run_delete(&svc, &headers, &id)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_delete(svc: &CartService, headers: &HeaderMap, id: &str) -> CartResult<Response> {
    svc.authorizer
        .authorize(headers, Operation::cart(OperationType::Delete), id)
        .await?;

    svc.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// =============================================================================
// Unit Tests
// =============================================================================
