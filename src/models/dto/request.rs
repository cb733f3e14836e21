use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::domain::QuestionId;

/// Body of `POST /tests/attempt/`.
///
/// `answers` only holds answered questions; `response_times` holds every
/// visited question, zero-second visits included.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitAttemptRequest {
    pub test_id: i64,
    pub answers: BTreeMap<QuestionId, usize>,
    pub response_times: BTreeMap<QuestionId, u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct FeedbackRequest {
    pub attempt: i64,

    #[validate(length(min = 1, max = 2000))]
    pub feedback_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreatePracticeRequest {
    #[validate(length(min = 1, max = 20000))]
    pub input_text: String,
}
