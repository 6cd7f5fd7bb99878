//! # attest-api: HTTP Surface for the Verifier
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/v1/validate` | POST | [`routes::validate`] |
//! | `/health/liveness` | GET | always `ok` |
//! | `/health/readiness` | GET | `ready` once a validator is configured |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → DefaultBodyLimit(2 MiB) → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers; decisions come from
//!   `attest-validator`.
//! - All non-protocol errors map to structured HTTP responses via
//!   [`AppError`].

pub mod error;
pub mod routes;
pub mod state;

use attest_crypto::SignerRecovery;
use attest_ledger::LedgerQuery;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Request body limit for every API route.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the application router.
pub fn app<L, R>(state: AppState<L, R>) -> Router
where
    L: LedgerQuery,
    R: SignerRecovery + 'static,
{
    let api = routes::validate::router::<L, R>()
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness::<L, R>))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe: the process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. A constructed [`AppState`] always holds a validated
/// configuration, so reaching the handler means the service can answer.
async fn readiness<L, R>(State(state): State<AppState<L, R>>) -> &'static str
where
    L: LedgerQuery,
    R: SignerRecovery + 'static,
{
    tracing::trace!(
        contracts = state.validator.config().accepted_contracts.len(),
        "readiness probe"
    );
    "ready"
}
