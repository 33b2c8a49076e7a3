use engage::models::{QUERY_ENVELOPE_SCHEMA_VERSION, QueryEnvelope, QueryEnvelopeCommandFailure};
use serde_json::json;

#[test]
fn ok_envelope_tracks_contract_fields() {
    let envelope = QueryEnvelope::ok("report", json!({ "rows": [] }))
        .with_meta("row_count", json!(0))
        .with_warning("result_truncated", "printed 0 of 3 rows");

    assert!(envelope.ok);
    assert_eq!(envelope.command, "report");
    assert!(envelope.generated_at_utc.ends_with('Z'));
    assert_eq!(
        envelope.meta.get("schema_version"),
        Some(&json!(QUERY_ENVELOPE_SCHEMA_VERSION))
    );
    assert_eq!(envelope.meta.get("row_count"), Some(&json!(0)));
    assert_eq!(envelope.warnings.len(), 1);
    assert_eq!(envelope.warnings[0].code, "result_truncated");
    assert!(envelope.error.is_none());
}

#[test]
fn ok_envelope_omits_error_key_when_serialized() {
    let envelope = QueryEnvelope::ok("score", json!({ "engagement_score": 1 }));
    let encoded = serde_json::to_value(&envelope).expect("envelope should serialize");

    let object = encoded.as_object().expect("envelope JSON should be object");
    assert_eq!(object.get("ok"), Some(&json!(true)));
    assert!(object.contains_key("data"));
    assert!(object.contains_key("meta"));
    assert!(object.contains_key("warnings"));
    assert!(!object.contains_key("error"));
}

#[test]
fn error_envelope_carries_structured_details() {
    let envelope = QueryEnvelope::error(
        "report",
        "query_execution_failed",
        "engagement report query failed",
    )
    .with_error_details(json!({ "stage": "prepare" }));

    assert!(!envelope.ok);
    assert!(envelope.data.is_none());
    let encoded = serde_json::to_value(&envelope).expect("envelope should serialize");
    assert_eq!(
        encoded
            .pointer("/error/details/stage")
            .and_then(|value| value.as_str()),
        Some("prepare")
    );
}

#[test]
fn error_details_are_ignored_on_ok_envelopes() {
    let envelope =
        QueryEnvelope::ok("report", json!(null)).with_error_details(json!({ "stage": "x" }));

    assert!(envelope.error.is_none());
}

#[test]
fn command_failure_display_is_json_envelope() {
    let failure = QueryEnvelopeCommandFailure::new(QueryEnvelope::error(
        "report",
        "report_store_unavailable",
        "unable to open engagement store",
    ));

    let parsed: serde_json::Value =
        serde_json::from_str(&failure.to_string()).expect("display output should be JSON");
    assert_eq!(parsed.get("ok").and_then(|value| value.as_bool()), Some(false));
    assert_eq!(
        parsed.pointer("/error/code").and_then(|value| value.as_str()),
        Some("report_store_unavailable")
    );
    assert_eq!(
        parsed.get("command").and_then(|value| value.as_str()),
        Some("report")
    );
}
