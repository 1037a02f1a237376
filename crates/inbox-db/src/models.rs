/// Database row types — these map directly to SQLite rows.
/// Distinct from inbox-types API models to keep the DB layer independent.

pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub timestamp: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRow {
    pub total: u64,
    pub today: u64,
    pub week: u64,
}
