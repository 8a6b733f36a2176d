/// DDL to create the schema_version tracking table.
///
/// Applied unconditionally on every open, using `IF NOT EXISTS` so it is safe
/// to run multiple times.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the v1 schema: a single key/value table.
///
/// The client only ever writes two keys (`cr_token`, `cr_user`); a plain
/// key/value layout keeps the file readable with the `sqlite3` shell.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS client_storage (
        key         TEXT    PRIMARY KEY,
        value       TEXT    NOT NULL,
        updated_at  INTEGER NOT NULL
    ) STRICT;
";

/// Runs forward-only schema migration to the latest version.
///
/// Idempotent: safe to call on every startup. Any pre-existing
/// `client_storage` table from an unversioned file is dropped and recreated,
/// which at worst forces one extra sign-in.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if version < 1 {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch("DROP TABLE IF EXISTS client_storage;")?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}
