use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::AppResult,
    models::{
        domain::{AttemptResult, AttemptReview, TeacherFeedback},
        dto::{FeedbackRequest, SubmitAttemptRequest},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Sends one graded submission. Callers reuse `idempotency_key` when
    /// retrying the identical payload.
    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
        idempotency_key: &str,
    ) -> AppResult<AttemptResult>;
    async fn list_attempts(&self, test_id: i64) -> AppResult<Vec<AttemptResult>>;
    async fn fetch_review(&self, test_id: i64) -> AppResult<AttemptReview>;
    async fn request_feedback(&self, request: &FeedbackRequest) -> AppResult<()>;
    /// Teacher replies addressed to the current student.
    async fn list_feedback(&self) -> AppResult<Vec<TeacherFeedback>>;
    async fn mark_feedback_read(&self, feedback_id: i64) -> AppResult<()>;
}

pub struct HttpAttemptRepository {
    client: ApiClient,
}

impl HttpAttemptRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttemptRepository for HttpAttemptRepository {
    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
        idempotency_key: &str,
    ) -> AppResult<AttemptResult> {
        self.client
            .post_json("tests/attempt/", request, Some(idempotency_key))
            .await
    }

    async fn list_attempts(&self, test_id: i64) -> AppResult<Vec<AttemptResult>> {
        let mut attempts: Vec<AttemptResult> = self
            .client
            .get_json(&format!("tests/{}/attempts/", test_id))
            .await?;
        attempts.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));
        Ok(attempts)
    }

    async fn fetch_review(&self, test_id: i64) -> AppResult<AttemptReview> {
        self.client
            .get_json(&format!("tests/{}/attempt-preview/", test_id))
            .await
    }

    async fn request_feedback(&self, request: &FeedbackRequest) -> AppResult<()> {
        let _: serde_json::Value = self
            .client
            .post_json("tests/feedback/", request, None)
            .await?;
        Ok(())
    }

    async fn list_feedback(&self) -> AppResult<Vec<TeacherFeedback>> {
        self.client.get_json("tests/feedback/list/").await
    }

    async fn mark_feedback_read(&self, feedback_id: i64) -> AppResult<()> {
        let _: serde_json::Value = self
            .client
            .post_json(
                &format!("tests/feedback/{}/mark-read/", feedback_id),
                &serde_json::json!({}),
                None,
            )
            .await?;
        Ok(())
    }
}
