use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::emit_envelope;
use crate::models::{QueryEnvelope, json_schema};
use crate::report::REPORT_COLUMNS;

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {}

pub fn run(_args: &SchemaArgs) -> Result<()> {
    let envelope = QueryEnvelope::ok("schema", json_schema())
        .with_meta("columns", json!(REPORT_COLUMNS));
    emit_envelope(&envelope)
}
