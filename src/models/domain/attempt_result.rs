use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::assignment::QuestionId;

/// Graded outcome of one submitted attempt. Immutable once received.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptResult {
    pub id: i64,
    pub score: u32,
    pub total_questions: u32,
    pub passed: bool,
    #[serde(default)]
    pub correct_answers: Option<u32>,
    #[serde(default)]
    pub test_title: Option<String>,
    #[serde(default)]
    pub attempted_at: Option<DateTime<Utc>>,
}

impl AttemptResult {
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_questions) * 100.0
    }

    pub fn performance(&self) -> PerformanceBand {
        PerformanceBand::from_percentage(self.percentage())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum PerformanceBand {
    Excellent,
    Great,
    Good,
    NeedsWork,
}

impl PerformanceBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            PerformanceBand::Excellent
        } else if percentage >= 75.0 {
            PerformanceBand::Great
        } else if percentage >= 50.0 {
            PerformanceBand::Good
        } else {
            PerformanceBand::NeedsWork
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent job!",
            PerformanceBand::Great => "Great work!",
            PerformanceBand::Good => "Good effort!",
            PerformanceBand::NeedsWork => "Better luck next time!",
        }
    }
}

/// Per-question breakdown of the latest graded attempt on a test.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptReview {
    pub attempt_id: i64,
    pub test_title: String,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub passed: bool,
    #[serde(default)]
    pub attempted_at: Option<DateTime<Utc>>,
    pub questions: Vec<ReviewedQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewedQuestion {
    pub question_id: QuestionId,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub selected_option: usize,
    pub is_correct: bool,
    #[serde(default)]
    pub time_taken: Option<u64>,
}

impl AttemptReview {
    pub fn incorrect(&self) -> impl Iterator<Item = &ReviewedQuestion> {
        self.questions.iter().filter(|q| !q.is_correct)
    }

    pub fn total_time_seconds(&self) -> u64 {
        self.questions.iter().filter_map(|q| q.time_taken).sum()
    }
}
