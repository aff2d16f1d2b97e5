//! # Session-Scoped Handlers
//!
//! CRUD on "the cart belonging to my session", mounted at `/cart`.
//!
//! Every handler runs the same state machine: resolve the session, execute
//! against the store, classify the outcome into the envelope. Session routes
//! never consult the authorizer; session ownership *is* the authorization.
//!
//! Ordering rules enforced here:
//! - session resolution always precedes any store call
//! - the existence lookup precedes any mutating call
//! - a decode failure or ID mismatch short-circuits before any mutation

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use kaimono_core::{CartError, CartResult};

use crate::response::{conflict_with_existing, decode_cart, failure, success};
use crate::service::CartService;
use crate::store::SessionCartOutcome;

/// Session-scoped routes.
pub(crate) fn router() -> Router<Arc<CartService>> {
    Router::new().route(
        "/cart",
        get(get_cart)
            .post(create_cart)
            .put(update_cart)
            .delete(delete_cart),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Returns the cart associated with the current session.
///
/// Status codes: 200 OK, 400 no session, 404 no cart, 500 other.
async fn get_cart(State(svc): State<Arc<CartService>>, headers: HeaderMap) -> Response {
    run_get(&svc, &headers)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_get(svc: &CartService, headers: &HeaderMap) -> CartResult<Response> {
    let ctx = svc.resolver.user_context(headers).await?;
    let cart = svc.store.lookup_for_session(&ctx.session_token).await?;
    Ok(success(StatusCode::OK, cart))
}

/// Creates a new cart for the current session.
///
/// A session holds at most one cart. If one already exists, the response is
/// 409 and the body carries the existing cart, so the conflict stays visible
/// to the caller instead of being silently absorbed.
///
/// Status codes: 201 created, 400 no session, 409 already exists, 500 other.
async fn create_cart(State(svc): State<Arc<CartService>>, headers: HeaderMap) -> Response {
    run_create(&svc, &headers)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_create(svc: &CartService, headers: &HeaderMap) -> CartResult<Response> {
    let ctx = svc.resolver.user_context(headers).await?;

    match svc.store.create_for_session(&ctx.session_token).await? {
        SessionCartOutcome::Created(cart) => Ok(success(StatusCode::CREATED, cart)),
        SessionCartOutcome::AlreadyExists(existing) => Ok(conflict_with_existing(existing)),
    }
}

/// Replaces the session's cart wholesale.
///
/// The payload's ID must match the session's cart ID; a mismatch is rejected
/// with 403 before the store is touched. The session owner may only
/// overwrite their own cart.
///
/// Status codes: 200 updated, 400 no session / decode failure,
/// 403 ID mismatch, 404 no cart, 500 other.
async fn update_cart(
    State(svc): State<Arc<CartService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    run_update(&svc, &headers, &body)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_update(svc: &CartService, headers: &HeaderMap, body: &[u8]) -> CartResult<Response> {
    let ctx = svc.resolver.user_context(headers).await?;
    let found = svc.store.lookup_for_session(&ctx.session_token).await?;

    let payload = decode_cart(body)?;
    if payload.id != found.id {
        return Err(CartError::InvalidId);
    }

    svc.store
        .replace(payload.clone())
        .await
        .map_err(|err| vanished_mid_request(err, &found.id))?;
    Ok(success(StatusCode::OK, payload))
}

/// Deletes the session's cart.
///
/// Status codes: 204 deleted, 400 no session, 404 no cart, 500 other.
async fn delete_cart(State(svc): State<Arc<CartService>>, headers: HeaderMap) -> Response {
    run_delete(&svc, &headers)
        .await
        .unwrap_or_else(|err| failure(&err))
}

async fn run_delete(svc: &CartService, headers: &HeaderMap) -> CartResult<Response> {
    let ctx = svc.resolver.user_context(headers).await?;
    let found = svc.store.lookup_for_session(&ctx.session_token).await?;

    svc.store
        .delete(&found.id)
        .await
        .map_err(|err| vanished_mid_request(err, &found.id))?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Reclassifies a post-lookup `CartNotFound` as an infrastructure error.
///
/// The lookup-then-act pairs in Update and Delete are not atomic. A cart
/// that vanishes in the race window, after the session lookup already
/// succeeded, is not a caller-visible 404: the session's cart did exist for
/// this request.
fn vanished_mid_request(err: CartError, cart_id: &str) -> CartError {
    match err {
        CartError::CartNotFound => {
            CartError::Internal(format!("cart {cart_id} disappeared mid-request"))
        }
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use async_trait::async_trait;

    use kaimono_core::{Cart, UserContext};

    use crate::memory::MemoryBackend;
    use crate::store::CartStore;

    async fn test_router() -> Router {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_session("anonymous-session").await;
        backend
            .register_user(UserContext {
                user_id: "test-user".to_string(),
                session_token: "logged-in-session".to_string(),
            })
            .await;
        backend
            .register_user(UserContext {
                user_id: "test-admin-user".to_string(),
                session_token: "logged-in-admin-session".to_string(),
            })
            .await;
        backend.grant_admin("test-admin-user").await;

        CartService::new(backend.clone(), backend.clone(), backend).router()
    }

    fn request(method: &str, uri: &str, session: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header("cookie", format!("session={token}"));
        }
        let body = match body {
            Some(b) => Body::from(b.to_string()),
            None => Body::empty(),
        };
        builder.body(body).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_without_session_cookie_is_400() {
        let app = test_router().await;
        let response = app.oneshot(request("GET", "/cart", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "session not found");
    }

    #[tokio::test]
    async fn test_get_with_unknown_session_is_400() {
        let app = test_router().await;
        let response = app
            .oneshot(request("GET", "/cart", Some("non-existent-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_before_and_after_create() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(request("GET", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let cart_id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["error"], "");

        let response = app
            .oneshot(request("GET", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"]["id"], cart_id.as_str());
    }

    #[tokio::test]
    async fn test_second_create_conflicts_with_original_cart() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let first = body_json(response).await;
        let cart_id = first["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let second = body_json(response).await;
        // The conflict still hands back the original cart.
        assert_eq!(second["data"]["id"], cart_id.as_str());
        assert_eq!(second["error"], "cart already exists for session");
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_id_without_mutation() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        let created = body_json(response).await;
        let cart_id = created["data"]["id"].as_str().unwrap().to_string();

        let payload = r#"{"data":{"id":"spoofed-id","cart-items":[{"product-id":"p1","quantity":1,"discounts":[],"price":{"currency":"usd","value":2.0}}],"discounts":[]}}"#;
        let response = app
            .clone()
            .oneshot(request("PUT", "/cart", Some("logged-in-session"), Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Store must be untouched.
        let response = app
            .oneshot(request("GET", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"]["id"], cart_id.as_str());
        assert_eq!(fetched["data"]["cart-items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_cart_wholesale() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        let created = body_json(response).await;
        let cart_id = created["data"]["id"].as_str().unwrap().to_string();

        let payload = format!(
            r#"{{"data":{{"id":"{cart_id}","cart-items":[{{"product-id":"p1","quantity":3,"discounts":[],"price":{{"currency":"euro","value":9.99}}}}],"discounts":[]}}}}"#
        );
        let response = app
            .clone()
            .oneshot(request("PUT", "/cart", Some("logged-in-session"), Some(&payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"]["cart-items"][0]["product-id"], "p1");
        assert_eq!(fetched["data"]["cart-items"][0]["quantity"], 3);
    }

    #[tokio::test]
    async fn test_malformed_update_body_is_400_without_mutation() {
        let app = test_router().await;

        app.clone()
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request("PUT", "/cart", Some("logged-in-session"), Some("{not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("could not decode"));

        let response = app
            .oneshot(request("GET", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"]["cart-items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_cart_and_binding() {
        let app = test_router().await;

        app.clone()
            .oneshot(request("POST", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request("DELETE", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request("GET", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Store whose carts vanish between the session lookup and the
    /// follow-up mutating call: lookups succeed against the inner backend,
    /// but `replace` and `delete` behave as if the cart is already gone.
    struct VanishingCartStore {
        inner: Arc<MemoryBackend>,
    }

    #[async_trait]
    impl CartStore for VanishingCartStore {
        async fn lookup(&self, cart_id: &str) -> kaimono_core::CartResult<Cart> {
            self.inner.lookup(cart_id).await
        }

        async fn lookup_for_session(&self, session_token: &str) -> kaimono_core::CartResult<Cart> {
            self.inner.lookup_for_session(session_token).await
        }

        async fn create_for_session(
            &self,
            session_token: &str,
        ) -> kaimono_core::CartResult<crate::store::SessionCartOutcome> {
            self.inner.create_for_session(session_token).await
        }

        async fn create_unbound(&self) -> kaimono_core::CartResult<Cart> {
            self.inner.create_unbound().await
        }

        async fn replace(&self, _cart: Cart) -> kaimono_core::CartResult<()> {
            Err(CartError::CartNotFound)
        }

        async fn delete(&self, _cart_id: &str) -> kaimono_core::CartResult<()> {
            Err(CartError::CartNotFound)
        }
    }

    /// Router over a [`VanishingCartStore`], with one cart already bound to
    /// `logged-in-session`. Returns the router and that cart's ID.
    async fn vanishing_router() -> (Router, String) {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .register_user(UserContext {
                user_id: "test-user".to_string(),
                session_token: "logged-in-session".to_string(),
            })
            .await;

        let cart = match backend.create_for_session("logged-in-session").await.unwrap() {
            crate::store::SessionCartOutcome::Created(cart) => cart,
            other => panic!("expected Created, got {other:?}"),
        };

        let store = Arc::new(VanishingCartStore {
            inner: backend.clone(),
        });
        let app = CartService::new(store, backend.clone(), backend).router();
        (app, cart.id)
    }

    #[tokio::test]
    async fn test_delete_race_is_500_not_404() {
        let (app, _) = vanishing_router().await;

        let response = app
            .oneshot(request("DELETE", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        // The lookup succeeded, so the disappearance is an infrastructure
        // condition, not a caller-visible 404.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("internal error"));
    }

    #[tokio::test]
    async fn test_update_race_is_500_not_404() {
        let (app, cart_id) = vanishing_router().await;

        let payload = format!(r#"{{"data":{{"id":"{cart_id}","cart-items":[],"discounts":[]}}}}"#);
        let response = app
            .oneshot(request("PUT", "/cart", Some("logged-in-session"), Some(&payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_delete_without_cart_is_404() {
        let app = test_router().await;
        let response = app
            .oneshot(request("DELETE", "/cart", Some("logged-in-session"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
