use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{PracticeSession, PracticeStatus},
        dto::CreatePracticeRequest,
    },
    repositories::PracticeRepository,
    services::poller::{poll_until_terminal, PollPolicy},
};

pub struct PracticeService {
    repository: Arc<dyn PracticeRepository>,
    policy: PollPolicy,
}

impl PracticeService {
    pub fn new(repository: Arc<dyn PracticeRepository>, policy: PollPolicy) -> Self {
        Self { repository, policy }
    }

    pub async fn list(&self) -> AppResult<Vec<PracticeSession>> {
        self.repository.list_sessions().await
    }

    /// Submits `input_text` for question generation and waits for the job.
    pub async fn create_and_wait(&self, input_text: &str) -> AppResult<PracticeSession> {
        let input_text = input_text.trim();
        if input_text.is_empty() {
            return Err(AppError::ValidationError(
                "Please enter some text to practice with".to_string(),
            ));
        }

        let request = CreatePracticeRequest {
            input_text: input_text.to_string(),
        };
        request.validate()?;

        let created = self.repository.create_session(&request).await?;
        log::info!("Practice session {} created ({})", created.id, created.status);

        let session = if created.status == PracticeStatus::Completed
            || created.status == PracticeStatus::Failed
        {
            created
        } else {
            let id = created.id;
            let repository = Arc::clone(&self.repository);
            poll_until_terminal(self.policy, move || {
                let repository = Arc::clone(&repository);
                async move { repository.get_session(id).await }
            })
            .await?
        };

        match session.status {
            PracticeStatus::Failed => {
                let message = session
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "question generation failed".to_string());
                log::warn!("Practice session {} failed: {}", session.id, message);
                Err(AppError::PracticeFailed(message))
            }
            _ => {
                log::info!(
                    "Practice session {} ready with {} questions",
                    session.id,
                    session.questions().len()
                );
                Ok(session)
            }
        }
    }
}
