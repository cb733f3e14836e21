use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A teacher's reply to one of the student's feedback requests.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TeacherFeedback {
    pub id: i64,
    #[serde(default)]
    pub test_title: String,
    /// Percentage score of the attempt the feedback is about.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, alias = "comments")]
    pub feedback_text: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
