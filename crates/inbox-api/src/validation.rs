use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use thiserror::Error;

use inbox_types::api::ContactRequest;
use inbox_types::models::NewContact;

/// Coarse `local@domain.tld` shape check. Not RFC 5322.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const DEFAULT_SUBJECT: &str = "Contact";

/// Why a submission was rejected. The Display text is sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name, email and message are required")]
    MissingFields,
    #[error("name, email, subject and message are required")]
    MissingFieldsWithSubject,
    #[error("name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("invalid email address")]
    InvalidEmail,
    #[error("subject must be between {min} and {max} characters")]
    SubjectLength { min: usize, max: usize },
    #[error("message must be between {min} and {max} characters")]
    MessageLength { min: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    fn contains(&self, value: &str) -> bool {
        let len = value.chars().count();
        len >= self.min && len <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectPolicy {
    /// Subject must be posted and fall within the bounds.
    Required(LengthBounds),
    /// A posted subject is checked against the bounds; a missing one is
    /// synthesized from the interest field.
    DeriveFromInterest(LengthBounds),
}

/// The rule set a submission is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRules {
    pub name: LengthBounds,
    pub subject: SubjectPolicy,
    pub message: LengthBounds,
    /// Keep `phone` and `interest` when posted.
    pub accept_details: bool,
}

impl ContactRules {
    /// Canonical contract for the contact page.
    pub fn standard() -> Self {
        Self {
            name: LengthBounds::new(2, 120),
            subject: SubjectPolicy::DeriveFromInterest(LengthBounds::new(5, 200)),
            message: LengthBounds::new(5, 2000),
            accept_details: true,
        }
    }

    pub fn strict() -> Self {
        Self {
            name: LengthBounds::new(2, 100),
            subject: SubjectPolicy::Required(LengthBounds::new(5, 200)),
            message: LengthBounds::new(10, 1000),
            accept_details: false,
        }
    }

    /// Check `req` and normalize it into a storable record. The first failing
    /// rule is reported. `received_at` stands in for a missing client
    /// timestamp.
    pub fn validate(
        &self,
        req: &ContactRequest,
        received_at: DateTime<Utc>,
    ) -> Result<NewContact, ValidationError> {
        let name = compose_name(req);
        let email = trimmed(&req.email);
        let message = trimmed(&req.message);
        let subject = trimmed(&req.subject);
        let interest = trimmed(&req.interest);

        let (Some(name), Some(email), Some(message)) = (name, email, message) else {
            return Err(self.missing_fields());
        };
        if matches!(self.subject, SubjectPolicy::Required(_)) && subject.is_none() {
            return Err(ValidationError::MissingFieldsWithSubject);
        }

        if !self.name.contains(&name) {
            return Err(ValidationError::NameLength {
                min: self.name.min,
                max: self.name.max,
            });
        }

        if !EMAIL_SHAPE.is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }

        let subject = match (&self.subject, subject) {
            (SubjectPolicy::Required(bounds) | SubjectPolicy::DeriveFromInterest(bounds), Some(s)) => {
                if !bounds.contains(s) {
                    return Err(ValidationError::SubjectLength {
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
                s.to_string()
            }
            (_, None) => match interest {
                Some(interest) => format!("Interest: {interest}"),
                None => DEFAULT_SUBJECT.to_string(),
            },
        };

        if !self.message.contains(message) {
            return Err(ValidationError::MessageLength {
                min: self.message.min,
                max: self.message.max,
            });
        }

        let (phone, interest) = if self.accept_details {
            (trimmed(&req.phone).map(str::to_string), interest.map(str::to_string))
        } else {
            (None, None)
        };

        let timestamp = trimmed(&req.timestamp)
            .map(str::to_string)
            .unwrap_or_else(|| received_at.to_rfc3339_opts(SecondsFormat::Millis, true));

        Ok(NewContact {
            name,
            email: email.to_string(),
            subject,
            message: message.to_string(),
            phone,
            interest,
            timestamp,
        })
    }

    fn missing_fields(&self) -> ValidationError {
        match self.subject {
            SubjectPolicy::Required(_) => ValidationError::MissingFieldsWithSubject,
            SubjectPolicy::DeriveFromInterest(_) => ValidationError::MissingFields,
        }
    }
}

impl Default for ContactRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Error)]
#[error("unknown rules preset '{0}' (expected 'standard' or 'strict')")]
pub struct UnknownPreset(String);

impl FromStr for ContactRules {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "strict" => Ok(Self::strict()),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `name` wins; otherwise the form's first/last name pair is joined.
fn compose_name(req: &ContactRequest) -> Option<String> {
    if let Some(name) = trimmed(&req.name) {
        return Some(name.to_string());
    }
    let first = trimmed(&req.first_name).unwrap_or_default();
    let last = trimmed(&req.last_name).unwrap_or_default();
    let joined = format!("{first} {last}");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}
