pub mod engagement;
pub mod query_envelope;

pub use engagement::{
    Artist, CreatedAt, EngagementRow, EventKind, PageData, StoreFixture, User, UserEvent, json_schema,
};
pub use query_envelope::{
    QUERY_ENVELOPE_SCHEMA_VERSION, QueryEnvelope, QueryEnvelopeCommandFailure, QueryEnvelopeError,
    QueryEnvelopeMeta, QueryEnvelopeWarning,
};
