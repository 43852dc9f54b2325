//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::bad_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("stale"), StatusCode::CONFLICT)]
#[case(Error::malformed_document("truncated"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::io_error("disk full"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn error_payload(error: Error, expected_trace_id: Option<&str>) -> serde_json::Value {
    let response = ResponseError::error_response(&error);
    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON decodes")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = error_payload(error, Some(expected_trace_id.as_str())).await;
    assert_eq!(
        payload,
        json!({
            "status": "internal_error",
            "message": "Internal server error",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::conflict("tools revision mismatch")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"expected": "a", "actual": "b"}));

    let payload = error_payload(error, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload["status"], "conflict");
    assert_eq!(payload["message"], "tools revision mismatch");
    assert_eq!(payload["details"], json!({"expected": "a", "actual": "b"}));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let payload = error_payload(Error::bad_request("Invalid key."), None).await;
    assert_eq!(payload["status"], "bad_request");
    assert!(payload.get("traceId").is_none());
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
}

#[rstest]
fn undecodable_bodies_are_bad_requests() {
    let result: ApiResult<Vec<String>> = decode_json(b"{not json");
    let err = result.expect_err("body is rejected");
    assert_eq!(err.code(), ErrorCode::BadRequest);
}
