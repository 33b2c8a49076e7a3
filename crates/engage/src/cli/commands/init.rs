use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::emit_envelope;
use crate::config::RuntimePaths;
use crate::models::QueryEnvelope;
use crate::store::{ensure_store_schema, open_store};

#[derive(Debug, Clone, Args)]
pub struct InitArgs {}

pub fn run(_args: &InitArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let connection = open_store(&runtime_paths.db_path)?;
    ensure_store_schema(&connection)?;
    log::info!(
        "init: engagement store ready at {}",
        runtime_paths.db_path.display()
    );

    emit_envelope(&QueryEnvelope::ok(
        "init",
        json!({ "db_path": runtime_paths.db_path.display().to_string() }),
    ))
}
