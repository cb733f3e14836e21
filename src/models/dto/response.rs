use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::domain::{
    Assignment, AssignmentQuestion, QuestionId, ResultsVisibility, TestDuration,
};

/// One entry of `GET /tests/assigned/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignedTestDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub test: TestDto,
    #[serde(default)]
    pub questions: Vec<TestQuestionDto>,
    #[serde(default)]
    pub attempted: bool,
    #[serde(default)]
    pub is_submitted: Option<bool>,
    #[serde(default)]
    pub allow_multiple_attempts: bool,
    #[serde(default)]
    pub show_results: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestDto {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub passing_marks: Option<u32>,
}

/// Link between a test and a question. The backend also sends the
/// `correct_answer` here; it is deliberately not captured.
#[derive(Debug, Clone, Deserialize)]
pub struct TestQuestionDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub question: i64,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl From<TestQuestionDto> for AssignmentQuestion {
    fn from(dto: TestQuestionDto) -> Self {
        AssignmentQuestion {
            question_id: QuestionId(dto.question),
            text: dto.question_text,
            options: dto.options,
        }
    }
}

impl From<AssignedTestDto> for Assignment {
    fn from(dto: AssignedTestDto) -> Self {
        let id = dto
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("assigned-{}", dto.test.id));

        Assignment {
            id,
            test_id: dto.test.id,
            title: dto.test.title,
            questions: dto.questions.into_iter().map(AssignmentQuestion::from).collect(),
            duration: TestDuration::from(dto.test.duration),
            passing_marks: dto.test.passing_marks,
            allow_multiple_attempts: dto.allow_multiple_attempts,
            attempted: dto.attempted,
            is_submitted: dto.is_submitted.unwrap_or(false),
            show_results: dto
                .show_results
                .as_deref()
                .map(ResultsVisibility::parse)
                .unwrap_or(ResultsVisibility::Immediately),
            start_date: dto.start_date,
            end_date: dto.end_date,
        }
    }
}

/// Error bodies vary by endpoint: `{"error"}`, `{"detail"}` or `{"message"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.detail).or(self.message)
    }
}
