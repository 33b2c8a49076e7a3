pub mod init;
pub mod report;
pub mod schema;
pub mod score;
pub mod seed;

use anyhow::{Context, Result};

use crate::models::QueryEnvelope;

pub(crate) fn emit_envelope(envelope: &QueryEnvelope) -> Result<()> {
    let encoded = serde_json::to_string(envelope)
        .with_context(|| format!("failed to encode `{}` response", envelope.command))?;
    println!("{encoded}");
    Ok(())
}
