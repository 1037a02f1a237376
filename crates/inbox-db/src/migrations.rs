use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Columns added after the first release. Databases created by older
/// deployments may lack them.
const ADDED_COLUMNS: &[(&str, &str)] = &[("phone", "TEXT"), ("interest", "TEXT")];

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version = current_version(conn)?;

    if version < 1 {
        info!("Running migration v1 (contacts table)");
        // IF NOT EXISTS: the table may predate schema_version.
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS contacts (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                subject     TEXT NOT NULL,
                message     TEXT NOT NULL,
                timestamp   DATETIME DEFAULT CURRENT_TIMESTAMP,
                created_at  DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_contacts_created
                ON contacts(created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (phone, interest)");
        let existing = table_columns(conn, "contacts")?;
        for (column, ty) in ADDED_COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            conn.execute_batch(&format!("ALTER TABLE contacts ADD COLUMN {column} {ty};"))?;
        }
        conn.execute("INSERT INTO schema_version (version) VALUES (2)", [])?;
    }

    info!("Database migrations complete");
    Ok(())
}

pub fn current_version(conn: &Connection) -> Result<i64> {
    let version =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;
    Ok(version)
}

pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO contacts (name, email, subject, message)
                VALUES ('Old Row', 'old@example.com', 'Legacy subject', 'kept across upgrade');
            ",
        )
        .unwrap();
        conn
    }

    #[test]
    fn fresh_database_gets_full_schema() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        let cols = table_columns(&conn, "contacts").unwrap();
        for expected in [
            "id", "name", "email", "subject", "message", "phone", "interest", "timestamp",
            "created_at",
        ] {
            assert!(cols.iter().any(|c| c == expected), "missing column {expected}");
        }
        assert_eq!(current_version(&conn).unwrap(), 2);
    }

    #[test]
    fn rerun_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn legacy_table_gains_new_columns_and_keeps_rows() {
        let conn = legacy_connection();
        run(&conn).unwrap();

        let cols = table_columns(&conn, "contacts").unwrap();
        assert!(cols.iter().any(|c| c == "phone"));
        assert!(cols.iter().any(|c| c == "interest"));

        let name: String = conn
            .query_row("SELECT name FROM contacts WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "Old Row");
    }

    #[test]
    fn unversioned_table_that_already_has_columns() {
        let conn = legacy_connection();
        conn.execute_batch("ALTER TABLE contacts ADD COLUMN phone TEXT;").unwrap();

        run(&conn).unwrap();

        let cols = table_columns(&conn, "contacts").unwrap();
        assert_eq!(cols.iter().filter(|c| *c == "phone").count(), 1);
        assert!(cols.iter().any(|c| c == "interest"));
    }
}
