use thiserror::Error;

use crate::models::DocumentKind;

/// Client-level error taxonomy. Every variant is converted to a user-visible
/// notification at the coordinator/export boundary; nothing propagates past
/// it and nothing is retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or connection failure reaching the service, including a
    /// non-2xx status from the export endpoint.
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service was reached and replied `success: false`.
    #[error("{0}")]
    Service(String),

    /// Export attempted before any successful generation of that kind.
    #[error("no generated {0} content to export")]
    EmptyContent(DocumentKind),

    /// Host clipboard or file-save operation refused or unavailable.
    #[error("platform error: {0}")]
    Platform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_names_the_kind() {
        let err = ClientError::EmptyContent(DocumentKind::Letter);
        assert_eq!(err.to_string(), "no generated letter content to export");
    }

    #[test]
    fn test_service_error_passes_message_through() {
        let err = ClientError::Service("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
