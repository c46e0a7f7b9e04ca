use serde::Deserialize;

/// One field-level validation message returned by the server. `field` is
/// empty when the server sent a single top-level message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            field: String::new(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("at least one service must remain selected")]
    MinimumSelection,

    #[error("guest name and phone are required before booking")]
    MissingGuestIdentity,

    #[error("sign-in required")]
    AuthRequired,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("the server rejected the request")]
    ServerRejection(Vec<FieldError>),

    #[error("storage error: {0}")]
    Storage(String),
}

// The db layer reports through anyhow; fold that into the taxonomy here.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl AppError {
    /// Messages suitable for inline display, one per offending field. Server
    /// rejections stay enumerable instead of being collapsed to one string.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            AppError::ServerRejection(errors) => errors
                .iter()
                .map(|e| {
                    if e.field.is_empty() {
                        e.message.clone()
                    } else {
                        format!("{}: {}", e.field, e.message)
                    }
                })
                .collect(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_rejection_messages_stay_enumerable() {
        let err = AppError::ServerRejection(vec![
            FieldError {
                field: "phone".to_string(),
                message: "is required".to_string(),
            },
            FieldError {
                field: "datetime".to_string(),
                message: "is in the past".to_string(),
            },
        ]);
        let messages = err.field_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "phone: is required");
        assert_eq!(messages[1], "datetime: is in the past");
    }

    #[test]
    fn test_general_message_has_no_field_prefix() {
        let err = AppError::ServerRejection(vec![FieldError::general("slot already taken")]);
        assert_eq!(err.field_messages(), vec!["slot already taken".to_string()]);
    }
}
