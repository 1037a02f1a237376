/// A submission that passed validation and is ready to be stored.
/// `id` and `created_at` are assigned by the database on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub timestamp: String,
}
