#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use preppro_attempt::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            Assignment, AssignmentQuestion, AttemptResult, AttemptReview, PracticeSession,
            PracticeStatus, QuestionId, ResultsVisibility, ReviewedQuestion, TeacherFeedback,
            TestDuration,
        },
        dto::{CreatePracticeRequest, FeedbackRequest, SubmitAttemptRequest},
    },
    repositories::{AssignmentRepository, AttemptRepository, PracticeRepository},
};

/// In-memory stand-in for the scoring backend. Grades against `answer_key`
/// and records every submission it receives.
pub struct InMemoryBackend {
    pub assignments: Arc<RwLock<Vec<Assignment>>>,
    pub answer_key: Arc<RwLock<HashMap<QuestionId, usize>>>,
    pub submissions: Arc<RwLock<Vec<(SubmitAttemptRequest, String)>>>,
    pub attempts: Arc<RwLock<Vec<(i64, AttemptResult, SubmitAttemptRequest)>>>,
    pub feedback: Arc<RwLock<Vec<FeedbackRequest>>>,
    pub inbox: Arc<RwLock<Vec<TeacherFeedback>>>,
    pub practice: Arc<RwLock<HashMap<i64, PracticeSession>>>,
    pub failures_remaining: AtomicUsize,
    pub practice_polls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            assignments: Arc::new(RwLock::new(Vec::new())),
            answer_key: Arc::new(RwLock::new(HashMap::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
            attempts: Arc::new(RwLock::new(Vec::new())),
            feedback: Arc::new(RwLock::new(Vec::new())),
            inbox: Arc::new(RwLock::new(Vec::new())),
            practice: Arc::new(RwLock::new(HashMap::new())),
            failures_remaining: AtomicUsize::new(0),
            practice_polls: AtomicUsize::new(0),
        })
    }

    /// Adds an assignment whose question `i` has answer `answers[i]`.
    pub async fn assign(&self, assignment: Assignment, answers: &[usize]) {
        let mut key = self.answer_key.write().await;
        for (question, answer) in assignment.questions.iter().zip(answers) {
            key.insert(question.question_id, *answer);
        }
        self.assignments.write().await.push(assignment);
    }

    pub fn fail_next_submissions(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }

    /// Queues an unread teacher reply for the student's inbox.
    pub async fn reply(&self, test_title: &str, text: &str) -> i64 {
        let mut inbox = self.inbox.write().await;
        let id = inbox.len() as i64 + 1;
        inbox.push(TeacherFeedback {
            id,
            test_title: test_title.to_string(),
            score: Some(50.0),
            feedback_text: text.to_string(),
            teacher_name: "teacher".to_string(),
            is_read: false,
            created_at: None,
        });
        id
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryBackend {
    async fn list_assigned(&self) -> AppResult<Vec<Assignment>> {
        Ok(self.assignments.read().await.clone())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryBackend {
    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
        idempotency_key: &str,
    ) -> AppResult<AttemptResult> {
        self.submissions
            .write()
            .await
            .push((request.clone(), idempotency_key.to_string()));

        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }

        let assignments = self.assignments.read().await;
        let assignment = assignments
            .iter()
            .find(|a| a.test_id == request.test_id)
            .ok_or_else(|| AppError::NotFound("Test not found".to_string()))?;

        let key = self.answer_key.read().await;
        let score = request
            .answers
            .iter()
            .filter(|(id, option)| key.get(*id) == Some(*option))
            .count() as u32;
        let total = assignment.questions.len() as u32;

        let mut attempts = self.attempts.write().await;
        let result = AttemptResult {
            id: 1000 + attempts.len() as i64,
            score,
            total_questions: total,
            passed: score >= assignment.passing_marks.unwrap_or(0),
            correct_answers: Some(score),
            test_title: Some(assignment.title.clone()),
            attempted_at: None,
        };
        attempts.push((request.test_id, result.clone(), request.clone()));
        Ok(result)
    }

    async fn list_attempts(&self, test_id: i64) -> AppResult<Vec<AttemptResult>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .rev()
            .filter(|(id, _, _)| *id == test_id)
            .map(|(_, result, _)| result.clone())
            .collect())
    }

    async fn fetch_review(&self, test_id: i64) -> AppResult<AttemptReview> {
        let attempts = self.attempts.read().await;
        let (_, result, request) = attempts
            .iter()
            .rev()
            .find(|(id, _, _)| *id == test_id)
            .ok_or_else(|| AppError::NotFound("No attempt found for this test.".to_string()))?;

        let assignments = self.assignments.read().await;
        let key = self.answer_key.read().await;
        let questions = assignments
            .iter()
            .find(|a| a.test_id == test_id)
            .map(|a| a.questions.clone())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|question| {
                let selected = *request.answers.get(&question.question_id)?;
                let correct = key.get(&question.question_id).copied().unwrap_or_default();
                Some(ReviewedQuestion {
                    question_id: question.question_id,
                    question_text: question.text,
                    options: question.options,
                    correct_option: correct,
                    selected_option: selected,
                    is_correct: correct == selected,
                    time_taken: request.response_times.get(&question.question_id).copied(),
                })
            })
            .collect();

        Ok(AttemptReview {
            attempt_id: result.id,
            test_title: result.test_title.clone().unwrap_or_default(),
            score: result.score,
            correct_answers: result.score,
            total_questions: result.total_questions,
            passed: result.passed,
            attempted_at: None,
            questions,
        })
    }

    async fn request_feedback(&self, request: &FeedbackRequest) -> AppResult<()> {
        self.feedback.write().await.push(request.clone());
        Ok(())
    }

    async fn list_feedback(&self) -> AppResult<Vec<TeacherFeedback>> {
        Ok(self.inbox.read().await.clone())
    }

    async fn mark_feedback_read(&self, feedback_id: i64) -> AppResult<()> {
        let mut inbox = self.inbox.write().await;
        let feedback = inbox
            .iter_mut()
            .find(|f| f.id == feedback_id)
            .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;
        feedback.is_read = true;
        Ok(())
    }
}

#[async_trait]
impl PracticeRepository for InMemoryBackend {
    async fn create_session(&self, request: &CreatePracticeRequest) -> AppResult<PracticeSession> {
        let mut sessions = self.practice.write().await;
        let session = PracticeSession {
            id: sessions.len() as i64 + 1,
            input_text: request.input_text.clone(),
            status: PracticeStatus::Pending,
            summary_points: None,
            generated_questions: None,
            error_message: None,
            created_at: None,
        };
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    /// Finishes the job on the second poll.
    async fn get_session(&self, id: i64) -> AppResult<PracticeSession> {
        let polls = self.practice_polls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut sessions = self.practice.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Practice session {}", id)))?;

        if polls >= 2 && session.status == PracticeStatus::Pending {
            session.status = PracticeStatus::Completed;
            session.summary_points = Some(vec![session.input_text.clone()]);
            session.generated_questions = Some(Vec::new());
        }
        Ok(session.clone())
    }

    async fn list_sessions(&self) -> AppResult<Vec<PracticeSession>> {
        Ok(self.practice.read().await.values().cloned().collect())
    }
}

pub fn question(id: i64, text: &str) -> AssignmentQuestion {
    AssignmentQuestion {
        question_id: QuestionId(id),
        text: text.to_string(),
        options: vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
        ],
    }
}

pub fn make_assignment(test_id: i64, question_ids: &[i64], minutes: Option<u32>) -> Assignment {
    Assignment {
        id: format!("assigned-{}", test_id),
        test_id,
        title: format!("Test {}", test_id),
        questions: question_ids
            .iter()
            .map(|id| question(*id, &format!("Question {}", id)))
            .collect(),
        duration: TestDuration::from(minutes),
        passing_marks: Some(1),
        allow_multiple_attempts: true,
        attempted: false,
        is_submitted: false,
        show_results: ResultsVisibility::Immediately,
        start_date: None,
        end_date: None,
    }
}
