use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid assignment state: {0}")]
    InvalidAssignmentState(String),

    #[error("An answer is required before moving past question {index}")]
    AnswerRequired { index: usize },

    #[error("You must answer at least one question before submitting")]
    EmptyAttempt,

    #[error("A submission is already in flight for this attempt")]
    SubmissionInFlight,

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Attempt is no longer in progress (status: {0})")]
    SessionClosed(String),

    #[error("Time is up for this attempt")]
    SessionExpired,

    #[error("Option {option} does not exist on question {index}")]
    InvalidOption { index: usize, option: usize },

    #[error("Attempt has not been graded yet")]
    NotGraded,

    #[error("Practice session failed: {0}")]
    PracticeFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidAssignmentState(_) => "INVALID_ASSIGNMENT_STATE",
            AppError::AnswerRequired { .. } => "ANSWER_REQUIRED",
            AppError::EmptyAttempt => "EMPTY_ATTEMPT",
            AppError::SubmissionInFlight => "SUBMISSION_IN_FLIGHT",
            AppError::SubmissionFailed(_) => "SUBMISSION_FAILED",
            AppError::SessionClosed(_) => "SESSION_CLOSED",
            AppError::SessionExpired => "SESSION_EXPIRED",
            AppError::InvalidOption { .. } => "INVALID_OPTION",
            AppError::NotGraded => "NOT_GRADED",
            AppError::PracticeFailed(_) => "PRACTICE_FAILED",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Api { .. } => "API_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Local guards (answer required, empty attempt, ...) are never
    /// retryable: the user has to change something first.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(_) | AppError::Timeout(_) | AppError::SubmissionFailed(_) => true,
            AppError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
