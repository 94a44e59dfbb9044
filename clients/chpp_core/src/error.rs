use chrono::NaiveDateTime;

// Errors raised while building or re-deriving a Hattrick date
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid calendar field(s) {}: {reason}", .fields.join(", "))]
    InvalidField {
        fields: Vec<&'static str>,
        reason: String,
    },
    #[error("Date {0} predates the Hattrick epoch (1997-09-22 00:00:00)")]
    BeforeEpoch(NaiveDateTime),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Could not parse CHPP date '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl CalendarError {
    pub(crate) fn invalid(fields: &[&'static str], reason: impl Into<String>) -> Self {
        CalendarError::InvalidField {
            fields: fields.to_vec(),
            reason: reason.into(),
        }
    }
}

// Errors raised while classifying roles or replaying lineup events
#[derive(Debug, thiserror::Error)]
pub enum LineupError {
    #[error("Unknown role id: {0}")]
    UnknownRoleId(i32),
    #[error("Unknown match order type: {0}")]
    UnknownOrderType(i32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
