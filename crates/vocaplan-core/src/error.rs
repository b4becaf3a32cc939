//! Error types for schedule computation and vocabulary sources.
//!
//! `SourceError` lives here rather than in `vocaplan-sources` so the word
//! fetcher can downcast and classify errors for retry decisions without
//! string matching.

use thiserror::Error;

/// Errors raised while building or validating a review schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The curriculum shape or the review offsets are unusable.
    #[error("invalid curriculum: {0}")]
    InvalidCurriculum(String),

    /// A date could not be parsed or falls outside the supported calendar.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A schedule handed to us is structurally inconsistent.
    #[error("malformed schedule: {0}")]
    MalformedSchedule(String),
}

/// Errors that can occur when talking to a vocabulary source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source has no words for the requested unit.
    #[error("unit not found: {0}")]
    UnitNotFound(String),

    /// The source rejected the request as invalid.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The source returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The source answered with something we could not decode.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl SourceError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::UnitNotFound(_)
                | SourceError::BadRequest(_)
                | SourceError::InvalidPayload(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_classification() {
        assert!(SourceError::UnitNotFound("list:1,unit:1".into()).is_permanent());
        assert!(SourceError::BadRequest("nope".into()).is_permanent());
        assert!(!SourceError::Timeout(30).is_permanent());
        assert!(!SourceError::ApiError {
            status: 503,
            message: "busy".into()
        }
        .is_permanent());
    }

    #[test]
    fn schedule_error_messages() {
        let err = ScheduleError::InvalidCurriculum("total_lists must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "invalid curriculum: total_lists must be at least 1"
        );
    }
}
