use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable backend id of a question. Answers and response times are keyed by
/// this, never by the question's position in the test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum TestDuration {
    Timed { minutes: u32 },
    Untimed,
}

impl TestDuration {
    pub fn total_seconds(&self) -> Option<u64> {
        match self {
            TestDuration::Timed { minutes } => Some(u64::from(*minutes) * 60),
            TestDuration::Untimed => None,
        }
    }
}

impl From<Option<u32>> for TestDuration {
    // A zero duration is treated like a missing one: no countdown.
    fn from(minutes: Option<u32>) -> Self {
        match minutes {
            Some(minutes) if minutes > 0 => TestDuration::Timed { minutes },
            _ => TestDuration::Untimed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultsVisibility {
    Immediately,
    AfterSubmission,
}

impl ResultsVisibility {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "after_submission" => ResultsVisibility::AfterSubmission,
            _ => ResultsVisibility::Immediately,
        }
    }
}

/// A question as the student sees it. The answer key is never part of it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssignmentQuestion {
    pub question_id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
}

/// One test made available to the current student. Read-only on the client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Assignment {
    pub id: String,
    pub test_id: i64,
    pub title: String,
    pub questions: Vec<AssignmentQuestion>,
    pub duration: TestDuration,
    pub passing_marks: Option<u32>,
    pub allow_multiple_attempts: bool,
    pub attempted: bool,
    pub is_submitted: bool,
    pub show_results: ResultsVisibility,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// A one-shot assignment that already has an attempt on record.
    pub fn is_locked(&self) -> bool {
        !self.allow_multiple_attempts && (self.is_submitted || self.attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(allow_multiple_attempts: bool, attempted: bool, is_submitted: bool) -> Assignment {
        Assignment {
            id: "assigned-7".to_string(),
            test_id: 7,
            title: "Algebra basics".to_string(),
            questions: vec![AssignmentQuestion {
                question_id: QuestionId(70),
                text: "2 + 2 = ?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
            }],
            duration: TestDuration::Untimed,
            passing_marks: Some(1),
            allow_multiple_attempts,
            attempted,
            is_submitted,
            show_results: ResultsVisibility::Immediately,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn duration_from_optional_minutes() {
        assert_eq!(TestDuration::from(Some(30)), TestDuration::Timed { minutes: 30 });
        assert_eq!(TestDuration::from(Some(0)), TestDuration::Untimed);
        assert_eq!(TestDuration::from(None), TestDuration::Untimed);
        assert_eq!(TestDuration::Timed { minutes: 2 }.total_seconds(), Some(120));
        assert_eq!(TestDuration::Untimed.total_seconds(), None);
    }

    #[test]
    fn results_visibility_defaults_to_immediately() {
        assert_eq!(
            ResultsVisibility::parse("after_submission"),
            ResultsVisibility::AfterSubmission
        );
        assert_eq!(ResultsVisibility::parse("Immediately"), ResultsVisibility::Immediately);
        assert_eq!(ResultsVisibility::parse("???"), ResultsVisibility::Immediately);
    }

    #[test]
    fn lock_policy_only_applies_to_single_attempt_assignments() {
        assert!(assignment(false, true, true).is_locked());
        assert!(assignment(false, true, false).is_locked());
        assert!(!assignment(false, false, false).is_locked());
        assert!(!assignment(true, true, true).is_locked());
    }

    #[test]
    fn question_id_serializes_as_map_key() {
        let mut answers = std::collections::BTreeMap::new();
        answers.insert(QuestionId(12), 2usize);

        let json = serde_json::to_string(&answers).expect("map should serialize");
        assert_eq!(json, r#"{"12":2}"#);
    }
}
