use anyhow::{Error, Result};
use clap::Args;
use serde_json::json;

use super::emit_envelope;
use crate::config::RuntimePaths;
use crate::models::{QueryEnvelope, QueryEnvelopeCommandFailure};
use crate::report::run_engagement_report;
use crate::store::open_store_read_only;
use crate::utils::time::duration_millis;

const COMMAND: &str = "report";

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Print at most this many rows. The query itself is never limited.
    #[arg(long, value_name = "N")]
    pub row_cap: Option<usize>,
}

pub fn run(args: &ReportArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let db_path = runtime_paths.db_path.display().to_string();

    if args.row_cap == Some(0) {
        return Err(QueryEnvelope::error(
            COMMAND,
            "report_row_cap_invalid",
            "row_cap must be greater than zero",
        )
        .with_error_details(json!({ "row_cap": 0 }))
        .into_failure());
    }

    let connection = open_store_read_only(&runtime_paths.db_path).map_err(|error| {
        QueryEnvelope::error(
            COMMAND,
            "report_store_unavailable",
            "unable to open engagement store",
        )
        .with_meta("db_path", json!(db_path))
        .with_error_details(json!({ "cause": format!("{error:#}") }))
        .into_failure()
    })?;

    let started = std::time::Instant::now();
    let mut rows = run_engagement_report(&connection).map_err(|error| {
        let duration_ms = duration_millis(started.elapsed());
        let envelope = QueryEnvelope::error(
            COMMAND,
            "query_execution_failed",
            "engagement report query failed",
        )
        .with_meta("db_path", json!(db_path))
        .with_meta("duration_ms", json!(duration_ms))
        .with_error_details(json!({
            "stage": error.stage().as_str(),
            "cause": error_source_message(&error),
        }));
        Error::new(error).context(QueryEnvelopeCommandFailure::new(envelope))
    })?;
    let duration_ms = duration_millis(started.elapsed());

    let total_rows = rows.len();
    let truncated = args.row_cap.is_some_and(|cap| total_rows > cap);
    if let Some(cap) = args.row_cap {
        rows.truncate(cap);
    }
    log::info!("report: {total_rows} rows in {duration_ms}ms (truncated={truncated})");

    let mut envelope = QueryEnvelope::ok(COMMAND, json!({ "rows": rows }))
        .with_meta("db_path", json!(db_path))
        .with_meta("row_count", json!(rows.len()))
        .with_meta("total_rows", json!(total_rows))
        .with_meta("truncated", json!(truncated))
        .with_meta("duration_ms", json!(duration_ms));
    if truncated {
        envelope = envelope.with_warning(
            "result_truncated",
            format!("printed {} of {total_rows} rows", rows.len()),
        );
    }

    emit_envelope(&envelope)
}

fn error_source_message(error: &crate::report::QueryExecutionError) -> String {
    std::error::Error::source(error)
        .map_or_else(|| error.to_string(), ToString::to_string)
}
