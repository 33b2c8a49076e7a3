use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::emit_envelope;
use crate::models::{EventKind, QueryEnvelope};
use crate::scoring::engagement_score;

#[derive(Debug, Clone, Args)]
pub struct ScoreArgs {
    #[arg(value_name = "EVENT_TYPE")]
    pub event_type: String,
}

pub fn run(args: &ScoreArgs) -> Result<()> {
    let known = EventKind::parse(&args.event_type).is_some();
    let mut envelope = QueryEnvelope::ok(
        "score",
        json!({
            "event_type": args.event_type,
            "engagement_score": engagement_score(Some(args.event_type.as_str())),
        }),
    )
    .with_meta("known_event_type", json!(known));
    if !known {
        envelope = envelope.with_warning(
            "unknown_event_type",
            format!("`{}` is not a tracked event type; scored as 0", args.event_type),
        );
    }

    emit_envelope(&envelope)
}
