use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::poller::Terminal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for PracticeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PracticeStatus::Pending => write!(f, "pending"),
            PracticeStatus::Processing => write!(f, "processing"),
            PracticeStatus::Completed => write!(f, "completed"),
            PracticeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A multiple-choice question generated from the student's own text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
}

/// Server-side job turning free text into summary points and questions.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PracticeSession {
    pub id: i64,
    pub input_text: String,
    pub status: PracticeStatus,
    #[serde(default)]
    pub summary_points: Option<Vec<String>>,
    #[serde(default)]
    pub generated_questions: Option<Vec<GeneratedQuestion>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    pub fn questions(&self) -> &[GeneratedQuestion] {
        self.generated_questions.as_deref().unwrap_or_default()
    }
}

impl Terminal for PracticeSession {
    fn is_terminal(&self) -> bool {
        matches!(self.status, PracticeStatus::Completed | PracticeStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_session_decodes_pending_job() {
        let body = r#"{"id": 3, "input_text": "Photosynthesis...", "status": "pending",
                       "summary_points": null, "generated_questions": null,
                       "error_message": null, "created_at": "2024-05-02T10:00:00Z"}"#;

        let session: PracticeSession = serde_json::from_str(body).expect("session should decode");

        assert_eq!(session.status, PracticeStatus::Pending);
        assert!(!session.is_terminal());
        assert!(session.questions().is_empty());
    }

    #[test]
    fn completed_and_failed_are_terminal() {
        let body = r#"{"id": 3, "input_text": "x", "status": "completed",
                       "generated_questions": [{"question_text": "Q?", "options": ["a","b","c","d"], "correct_answer": "A"}]}"#;
        let session: PracticeSession = serde_json::from_str(body).expect("session should decode");
        assert!(session.is_terminal());
        assert_eq!(session.questions().len(), 1);

        let failed = PracticeSession {
            status: PracticeStatus::Failed,
            error_message: Some("quota".to_string()),
            ..session
        };
        assert!(failed.is_terminal());
        assert_eq!(failed.status.to_string(), "failed");
    }
}
