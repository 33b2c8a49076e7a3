use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags, params};

use crate::models::StoreFixture;

pub const USERS_TABLE: &str = "users";
pub const ARTISTS_TABLE: &str = "artists";
pub const USER_EVENTS_TABLE: &str = "user_events";

const CREATE_USERS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER NOT NULL PRIMARY KEY,
    timezone TEXT NOT NULL
);
"#;

const CREATE_ARTISTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS artists (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL
);
"#;

// No REFERENCES clauses: events pointing at missing users or artists are
// legal and simply drop out of the report.
const CREATE_USER_EVENTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS user_events (
    id INTEGER NOT NULL PRIMARY KEY,
    user_id INTEGER NOT NULL,
    artist_id INTEGER NOT NULL,
    event_type TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

const CREATE_INDEX_EVENTS_ARTIST_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_user_events_artist
ON user_events (artist_id);
"#;

const CREATE_INDEX_EVENTS_USER_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_user_events_user
ON user_events (user_id);
"#;

#[must_use]
pub fn schema_statements() -> &'static [&'static str] {
    &[
        CREATE_USERS_TABLE_SQL,
        CREATE_ARTISTS_TABLE_SQL,
        CREATE_USER_EVENTS_TABLE_SQL,
        CREATE_INDEX_EVENTS_ARTIST_SQL,
        CREATE_INDEX_EVENTS_USER_SQL,
    ]
}

#[must_use]
pub fn create_schema_sql() -> String {
    schema_statements().join("\n")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub users_written: usize,
    pub artists_written: usize,
    pub events_written: usize,
}

/// Opens an existing store for reading. Writes through the handle fail.
pub fn open_store_read_only(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        bail!("engagement store does not exist: {}", path.display());
    }

    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open engagement store read-only: {}", path.display()))
}

pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create engagement store parent directory: {}",
                parent.display()
            )
        })?;
    }

    Connection::open(path)
        .with_context(|| format!("failed to open engagement store: {}", path.display()))
}

pub fn ensure_store_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(&create_schema_sql())
        .context("failed to create engagement store schema")
}

pub fn load_fixture(path: &Path) -> Result<StoreFixture> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse fixture JSON: {}", path.display()))
}

/// Inserts the fixture in a single transaction; nothing is written if any row
/// is rejected.
pub fn seed_store(connection: &mut Connection, fixture: &StoreFixture) -> Result<SeedStats> {
    let transaction = connection
        .transaction()
        .context("failed to start seed transaction")?;
    let mut stats = SeedStats::default();

    {
        let mut insert_user = transaction
            .prepare("INSERT INTO users (id, timezone) VALUES (?1, ?2)")
            .context("failed to prepare user insert")?;
        for user in &fixture.users {
            insert_user
                .execute(params![user.id, user.timezone])
                .with_context(|| format!("failed to insert user {}", user.id))?;
            stats.users_written += 1;
        }

        let mut insert_artist = transaction
            .prepare("INSERT INTO artists (id, name) VALUES (?1, ?2)")
            .context("failed to prepare artist insert")?;
        for artist in &fixture.artists {
            insert_artist
                .execute(params![artist.id, artist.name])
                .with_context(|| format!("failed to insert artist {}", artist.id))?;
            stats.artists_written += 1;
        }

        let mut insert_event = transaction
            .prepare(
                "INSERT INTO user_events (id, user_id, artist_id, event_type, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .context("failed to prepare user event insert")?;
        for event in &fixture.events {
            insert_event
                .execute(params![
                    event.id,
                    event.user_id,
                    event.artist_id,
                    event.event_type,
                    event.created_at
                ])
                .with_context(|| format!("failed to insert user event {}", event.id))?;
            stats.events_written += 1;
        }
    }

    transaction
        .commit()
        .context("failed to commit seed transaction")?;
    log::debug!(
        "seeded engagement store: users={} artists={} events={}",
        stats.users_written,
        stats.artists_written,
        stats.events_written
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::{
        ARTISTS_TABLE, USER_EVENTS_TABLE, USERS_TABLE, ensure_store_schema, seed_store,
    };
    use crate::models::{Artist, StoreFixture, User, UserEvent};
    use rusqlite::Connection;

    fn count_rows(connection: &Connection, table: &str) -> i64 {
        connection
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<usize, i64>(0)
            })
            .expect("count query should succeed")
    }

    fn table_exists(connection: &Connection, table_name: &str) -> bool {
        connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
                [table_name],
                |_| Ok(()),
            )
            .is_ok()
    }

    #[test]
    fn ensure_schema_creates_source_tables() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_store_schema(&connection).expect("schema creation should succeed");

        assert!(table_exists(&connection, USERS_TABLE));
        assert!(table_exists(&connection, ARTISTS_TABLE));
        assert!(table_exists(&connection, USER_EVENTS_TABLE));
    }

    #[test]
    fn ensure_schema_is_idempotent_and_keeps_rows() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_store_schema(&connection).expect("first ensure should succeed");
        connection
            .execute("INSERT INTO artists (id, name) VALUES (1, 'Aurora')", [])
            .expect("artist insert should succeed");
        ensure_store_schema(&connection).expect("second ensure should succeed");

        assert_eq!(count_rows(&connection, ARTISTS_TABLE), 1);
    }

    #[test]
    fn seed_accepts_events_with_dangling_references() {
        let mut connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_store_schema(&connection).expect("schema creation should succeed");
        let fixture = StoreFixture {
            users: vec![User {
                id: 1,
                timezone: "UTC".to_string(),
            }],
            artists: vec![Artist {
                id: 10,
                name: "Aurora".to_string(),
            }],
            events: vec![UserEvent {
                id: 100,
                user_id: 99,
                artist_id: 10,
                event_type: Some("play_track".to_string()),
                created_at: "2024-01-01".to_string(),
            }],
        };

        let stats = seed_store(&mut connection, &fixture).expect("seed should succeed");

        assert_eq!(stats.users_written, 1);
        assert_eq!(stats.artists_written, 1);
        assert_eq!(stats.events_written, 1);
        assert_eq!(count_rows(&connection, USER_EVENTS_TABLE), 1);
    }

    #[test]
    fn seed_rolls_back_when_a_row_is_rejected() {
        let mut connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_store_schema(&connection).expect("schema creation should succeed");
        let fixture = StoreFixture {
            users: vec![
                User {
                    id: 1,
                    timezone: "UTC".to_string(),
                },
                User {
                    id: 1,
                    timezone: "Europe/Oslo".to_string(),
                },
            ],
            ..StoreFixture::default()
        };

        let err = seed_store(&mut connection, &fixture).expect_err("duplicate id must fail");

        assert!(
            format!("{err:#}").contains("failed to insert user 1"),
            "unexpected error: {err:#}"
        );
        assert_eq!(count_rows(&connection, USERS_TABLE), 0);
    }
}
