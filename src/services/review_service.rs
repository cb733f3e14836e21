use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AttemptResult, AttemptReview, TeacherFeedback},
        dto::FeedbackRequest,
    },
    repositories::AttemptRepository,
    services::attempt_session::AttemptSession,
};

/// Everything that happens around an attempt once it is graded, plus the
/// history shown before starting one.
pub struct ReviewService {
    repository: Arc<dyn AttemptRepository>,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn AttemptRepository>) -> Self {
        Self { repository }
    }

    pub async fn history(&self, test_id: i64) -> AppResult<Vec<AttemptResult>> {
        self.repository.list_attempts(test_id).await
    }

    pub async fn review(&self, session: &AttemptSession) -> AppResult<AttemptReview> {
        Self::graded_result(session)?;
        self.repository.fetch_review(session.test_id()).await
    }

    pub async fn request_feedback(&self, session: &AttemptSession, text: &str) -> AppResult<()> {
        let result = Self::graded_result(session)?;

        let feedback_text = text.trim();
        if feedback_text.is_empty() {
            return Err(AppError::ValidationError(
                "Please enter your feedback request".to_string(),
            ));
        }

        let request = FeedbackRequest {
            attempt: result.id,
            feedback_text: feedback_text.to_string(),
        };
        request.validate()?;

        self.repository.request_feedback(&request).await?;
        log::info!("Feedback requested for attempt {}", result.id);
        Ok(())
    }

    /// Teacher replies, unread first, newest first within each group.
    pub async fn feedback_inbox(&self) -> AppResult<Vec<TeacherFeedback>> {
        let mut inbox = self.repository.list_feedback().await?;
        inbox.sort_by(|a, b| a.is_read.cmp(&b.is_read).then(b.created_at.cmp(&a.created_at)));
        Ok(inbox)
    }

    pub async fn unread_feedback_count(&self) -> AppResult<usize> {
        let inbox = self.repository.list_feedback().await?;
        Ok(inbox.iter().filter(|f| !f.is_read).count())
    }

    pub async fn mark_feedback_read(&self, feedback_id: i64) -> AppResult<()> {
        self.repository.mark_feedback_read(feedback_id).await?;
        log::info!("Feedback {} marked as read", feedback_id);
        Ok(())
    }

    fn graded_result(session: &AttemptSession) -> AppResult<&AttemptResult> {
        session.result().ok_or(AppError::NotGraded)
    }
}
