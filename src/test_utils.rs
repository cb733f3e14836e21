#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{
        Assignment, AssignmentQuestion, AttemptResult, QuestionId, ResultsVisibility,
        TestDuration,
    };

    /// Creates a four-option question with the given backend id
    pub fn question(id: i64) -> AssignmentQuestion {
        AssignmentQuestion {
            question_id: QuestionId(id),
            text: format!("Question {}", id),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
        }
    }

    /// Creates an untimed, repeatable assignment over `questions`
    pub fn assignment_with(questions: Vec<AssignmentQuestion>) -> Assignment {
        Assignment {
            id: "assigned-1".to_string(),
            test_id: 1,
            title: "Fixture test".to_string(),
            questions,
            duration: TestDuration::Untimed,
            passing_marks: None,
            allow_multiple_attempts: true,
            attempted: false,
            is_submitted: false,
            show_results: ResultsVisibility::Immediately,
            start_date: None,
            end_date: None,
        }
    }

    /// Creates a timed assignment with `count` questions
    pub fn timed_assignment(minutes: u32, count: usize) -> Assignment {
        let mut assignment = assignment_with((0..count).map(|i| question(10 + i as i64)).collect());
        assignment.duration = TestDuration::Timed { minutes };
        assignment
    }

    /// Creates a single-attempt assignment that was already submitted
    pub fn locked_assignment() -> Assignment {
        let mut assignment = assignment_with(vec![question(1)]);
        assignment.allow_multiple_attempts = false;
        assignment.is_submitted = true;
        assignment
    }

    pub fn graded_result(score: u32, total_questions: u32) -> AttemptResult {
        AttemptResult {
            id: 501,
            score,
            total_questions,
            passed: score * 2 >= total_questions,
            correct_answers: Some(score),
            test_title: Some("Fixture test".to_string()),
            attempted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_assignment() {
        let assignment = assignment_with(vec![question(3), question(4)]);
        assert_eq!(assignment.question_count(), 2);
        assert!(!assignment.is_locked());
    }

    #[test]
    fn test_fixtures_locked_assignment() {
        assert!(locked_assignment().is_locked());
    }

    #[test]
    fn test_fixtures_timed_assignment() {
        let assignment = timed_assignment(1, 3);
        assert_eq!(assignment.duration.total_seconds(), Some(60));
        assert_eq!(assignment.questions[2].question_id.0, 12);
    }
}
