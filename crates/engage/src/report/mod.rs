//! The engagement report: one read-only join over `user_events`, `users` and
//! `artists`, scored and ordered.

use std::fmt::{Display, Formatter};

use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, Row};

use crate::models::{CreatedAt, EngagementRow, PageData};
use crate::ordering::sort_engagement_rows;
use crate::scoring::score_case_sql;

pub const REPORT_COLUMNS: &[&str] = &[
    "artist_name",
    "event_type",
    "engagement_score",
    "created_at",
    "timezone",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Prepare,
    Execute,
    Fetch,
    Decode,
}

impl QueryStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Execute => "execute",
            Self::Fetch => "fetch",
            Self::Decode => "decode",
        }
    }
}

/// The store could not run the report. No rows are returned alongside it.
#[derive(Debug)]
pub struct QueryExecutionError {
    stage: QueryStage,
    source: rusqlite::Error,
}

impl QueryExecutionError {
    fn new(stage: QueryStage, source: rusqlite::Error) -> Self {
        Self { stage, source }
    }

    #[must_use]
    pub fn stage(&self) -> QueryStage {
        self.stage
    }
}

impl Display for QueryExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "engagement report query failed at {} stage",
            self.stage.as_str()
        )
    }
}

impl std::error::Error for QueryExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Report SQL. `e.id` is a trailing key so rows tied on the three report keys
/// come back in a fixed order.
#[must_use]
pub fn engagement_report_sql() -> String {
    format!(
        r#"
SELECT
    a.name AS artist_name,
    e.event_type AS event_type,
    {score} AS engagement_score,
    e.created_at AS created_at,
    u.timezone AS timezone
FROM
    user_events e
JOIN
    users u ON e.user_id = u.id
JOIN
    artists a ON e.artist_id = a.id
ORDER BY
    artist_name ASC, engagement_score DESC, created_at DESC, e.id ASC
"#,
        score = score_case_sql("e.event_type")
    )
}

/// Runs the report against `connection`.
///
/// Events whose user or artist is missing are dropped by the inner joins. The
/// rows are re-sorted with [`crate::ordering::compare_engagement_rows`], which
/// agrees with the SQL `ORDER BY`, so the order holds outside SQLite too. NULL
/// `timezone` and `created_at` values pass through as `None`.
pub fn run_engagement_report(
    connection: &Connection,
) -> Result<Vec<EngagementRow>, QueryExecutionError> {
    let sql = engagement_report_sql();
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| QueryExecutionError::new(QueryStage::Prepare, error))?;

    let mut rows = statement
        .query([])
        .map_err(|error| QueryExecutionError::new(QueryStage::Execute, error))?;
    let mut report = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|error| QueryExecutionError::new(QueryStage::Fetch, error))?
    {
        let decoded = decode_engagement_row(row)
            .map_err(|error| QueryExecutionError::new(QueryStage::Decode, error))?;
        report.push(decoded);
    }

    sort_engagement_rows(&mut report);
    log::debug!("engagement report returned {} rows", report.len());

    Ok(report)
}

/// Page-loader entry point: the report wrapped as `{ data }`.
pub fn load_page(connection: &Connection) -> Result<PageData, QueryExecutionError> {
    run_engagement_report(connection).map(|data| PageData { data })
}

fn decode_engagement_row(row: &Row<'_>) -> rusqlite::Result<EngagementRow> {
    Ok(EngagementRow {
        artist_name: row.get(0)?,
        event_type: row.get(1)?,
        engagement_score: row.get(2)?,
        created_at: created_at_value(row, 3)?,
        timezone: row.get(4)?,
    })
}

// Keeps the storage class so ordering never guesses whether digits are an epoch.
fn created_at_value(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<CreatedAt>> {
    match row.get_ref(index)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(CreatedAt::Epoch(value))),
        ValueRef::Real(value) => Ok(Some(CreatedAt::Fractional(value))),
        value @ ValueRef::Text(_) => value
            .as_str()
            .map(|text| Some(CreatedAt::Text(text.to_string())))
            .map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
            }),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            index,
            REPORT_COLUMNS[index].to_string(),
            Type::Blob,
        )),
    }
}
