//! # Credential Validation
//!
//! Routes:
//! - POST /v1/validate: validate a disclosure, returning a `ValidationReport`
//!
//! The report is the body for every protocol outcome. The status is 200
//! unless the verifier could not check at all (code 10), which answers 503
//! so load balancers and clients can retry elsewhere.

use attest_core::{ErrorCode, ValidationReport, ValidationRequest};
use attest_crypto::SignerRecovery;
use attest_ledger::LedgerQuery;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::AppError;
use crate::state::AppState;

pub fn router<L, R>() -> Router<AppState<L, R>>
where
    L: LedgerQuery,
    R: SignerRecovery + 'static,
{
    Router::new().route("/v1/validate", post(validate::<L, R>))
}

/// POST /v1/validate
pub async fn validate<L, R>(
    State(state): State<AppState<L, R>>,
    body: Result<Json<ValidationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ValidationReport>), AppError>
where
    L: LedgerQuery,
    R: SignerRecovery + 'static,
{
    let Json(request) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let report = state.validator.validate(&request).await;
    let status = if report.has_code(ErrorCode::InfrastructureUnavailable) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    Ok((status, Json(report)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use attest_core::{Address, Challenge, Section, Timestamp};
    use attest_crypto::MockRecovery;
    use attest_ledger::{InMemoryLedger, QueryKind, QuorumThresholds, SignerInfo};
    use attest_validator::{Validator, ValidatorConfig};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    const CONTRACT: &str = "0xccc0000000000000000000000000000000000000";

    fn owner() -> Address {
        Address::from_bytes([0x0a; 20])
    }

    fn signer() -> Address {
        Address::from_bytes([0x51; 20])
    }

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new(QuorumThresholds {
            signer_count: 1,
            stake: 10,
        })
        .with_signer(SignerInfo {
            address: signer(),
            stake: 10,
            active_from: 1,
            active_until: 0,
        })
    }

    fn test_app(ledger: InMemoryLedger) -> Router {
        let validator = Validator::new(
            ValidatorConfig::accepting(CONTRACT),
            Arc::new(ledger),
            Arc::new(MockRecovery),
        )
        .unwrap();
        crate::app(AppState::new(validator))
    }

    fn signed_request() -> Value {
        let challenge = Challenge::issue(Timestamp::now());
        let mut section = Section::new(1_700_000_000, vec![]);
        section.signatures =
            vec![MockRecovery::sign_section("personInfo", &section, &owner(), &signer()).unwrap()];
        json!({
            "challenge": challenge,
            "signature": MockRecovery::sign_text(&challenge.text, &owner()),
            "contractId": CONTRACT,
            "decryptedSections": { "personInfo": section }
        })
    }

    async fn post(app: Router, body: Vec<u8>) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/validate")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn valid_request_returns_report() {
        let body = serde_json::to_vec(&signed_request()).unwrap();
        let (status, report) = post(test_app(ledger()), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["isValid"], json!(true));
        assert_eq!(report["isAuthenticated"], json!(true));
        assert_eq!(report["perSection"]["personInfo"]["isValid"], json!(true));
    }

    #[tokio::test]
    async fn protocol_rejection_is_200_with_code() {
        let mut body = signed_request();
        body["contractId"] = json!("0xdead");
        let (status, report) = post(test_app(ledger()), serde_json::to_vec(&body).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["isValid"], json!(false));
        assert_eq!(report["errors"], json!([{ "code": 1 }]));
        assert_eq!(report["perSection"], json!({}));
    }

    #[tokio::test]
    async fn infrastructure_failure_is_503_with_report() {
        let ledger = ledger().failing(QueryKind::LastRevoke);
        let body = serde_json::to_vec(&signed_request()).unwrap();
        let (status, report) = post(test_app(ledger), body).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report["errors"][0]["code"], json!(10));
        assert!(!report.to_string().contains("LastRevoke"));
    }

    #[tokio::test]
    async fn malformed_json_is_422() {
        let (status, body) = post(test_app(ledger()), b"{not json".to_vec()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn missing_contract_id_is_422() {
        let (status, _) = post(test_app(ledger()), b"{}".to_vec()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let big = vec![b' '; crate::BODY_LIMIT_BYTES + 1];
        let req = Request::builder()
            .method("POST")
            .uri("/v1/validate")
            .header("content-type", "application/json")
            .body(Body::from(big))
            .unwrap();
        let resp = test_app(ledger()).oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }
}
