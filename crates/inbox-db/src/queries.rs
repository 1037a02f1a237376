use crate::models::{ContactRow, StatsRow};
use crate::Database;
use anyhow::Result;
use inbox_types::models::NewContact;
use rusqlite::Connection;

impl Database {
    /// Store one validated submission and return its id.
    pub fn insert_contact(&self, contact: &NewContact) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (name, email, subject, message, phone, interest, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    contact.name,
                    contact.email,
                    contact.subject,
                    contact.message,
                    contact.phone,
                    contact.interest,
                    contact.timestamp,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest first. `None` returns every row.
    pub fn list_contacts(&self, limit: Option<u32>) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| query_contacts(conn, limit))
    }

    pub fn contact_stats(&self) -> Result<StatsRow> {
        self.with_conn(|conn| {
            // The week window is today plus the six days before it.
            let (total, today, week): (i64, i64, i64) = conn.query_row(
                "SELECT
                    COUNT(*),
                    COUNT(CASE WHEN date(created_at) = date('now') THEN 1 END),
                    COUNT(CASE WHEN date(created_at) BETWEEN date('now', '-6 days') AND date('now') THEN 1 END)
                 FROM contacts",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

            Ok(StatsRow {
                total: total as u64,
                today: today as u64,
                week: week as u64,
            })
        })
    }
}

fn query_contacts(conn: &Connection, limit: Option<u32>) -> Result<Vec<ContactRow>> {
    // id breaks ties between rows stored within the same second
    let mut stmt = conn.prepare(
        "SELECT id, name, email, subject, message, phone, interest, timestamp, created_at
         FROM contacts
         ORDER BY created_at DESC, id DESC
         LIMIT ?1",
    )?;

    // A negative LIMIT means no limit in SQLite.
    let limit = limit.map(i64::from).unwrap_or(-1);

    let rows = stmt
        .query_map([limit], |row| {
            Ok(ContactRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                subject: row.get(3)?,
                message: row.get(4)?,
                phone: row.get(5)?,
                interest: row.get(6)?,
                timestamp: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
