use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::emit_envelope;
use crate::config::RuntimePaths;
use crate::models::QueryEnvelope;
use crate::store::{ensure_store_schema, load_fixture, open_store, seed_store};

#[derive(Debug, Clone, Args)]
pub struct SeedArgs {
    /// JSON document with `users`, `artists` and `events` arrays.
    #[arg(value_name = "FIXTURE")]
    pub fixture: PathBuf,
}

pub fn run(args: &SeedArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let fixture_path = runtime_paths.resolve(&args.fixture)?;
    let fixture = load_fixture(&fixture_path)?;

    let mut connection = open_store(&runtime_paths.db_path)?;
    ensure_store_schema(&connection)?;
    let stats = seed_store(&mut connection, &fixture)?;
    log::info!(
        "seed: wrote {} users, {} artists, {} events",
        stats.users_written,
        stats.artists_written,
        stats.events_written
    );

    emit_envelope(&QueryEnvelope::ok(
        "seed",
        json!({
            "db_path": runtime_paths.db_path.display().to_string(),
            "fixture_path": fixture_path.display().to_string(),
            "users_written": stats.users_written,
            "artists_written": stats.artists_written,
            "events_written": stats.events_written,
        }),
    ))
}
