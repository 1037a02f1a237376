use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Contact submission --

/// Raw submission as posted by the contact page, either as JSON or as an
/// HTML form. Every field is optional here; the validator decides what is
/// required.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub interest: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
}

// -- Listing --

#[derive(Debug, Deserialize)]
pub struct ContactsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub timestamp: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub success: bool,
    pub contacts: Vec<ContactResponse>,
}

// -- Stats --

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContactStats {
    pub total_contacts: u64,
    pub today_contacts: u64,
    pub week_contacts: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ContactStats,
}

// -- Health / errors --

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Envelope for every failed API call.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_request_reads_camel_case_form_names() {
        let req: ContactRequest = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Gomez","email":"ana@example.com","message":"hi there"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Ana"));
        assert_eq!(req.last_name.as_deref(), Some("Gomez"));
        assert!(req.name.is_none());
        assert!(req.subject.is_none());
    }

    #[test]
    fn contact_request_ignores_unknown_fields() {
        let req: ContactRequest =
            serde_json::from_str(r#"{"name":"Ana","newsletter":"yes"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ErrorResponse::new("API endpoint not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "API endpoint not found");
    }
}
