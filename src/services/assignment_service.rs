use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Assignment,
    repositories::AssignmentRepository,
    services::{
        attempt_session::AttemptSession,
        clock::{Clock, SystemClock},
    },
};

pub struct AssignmentService {
    repository: Arc<dyn AssignmentRepository>,
    clock: Arc<dyn Clock>,
}

impl AssignmentService {
    pub fn new(repository: Arc<dyn AssignmentRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<dyn AssignmentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn list_assigned(&self) -> AppResult<Vec<Assignment>> {
        let assignments = self.repository.list_assigned().await?;
        log::info!("Loaded {} assigned tests", assignments.len());
        Ok(assignments)
    }

    pub async fn find(&self, test_id: i64) -> AppResult<Assignment> {
        self.repository
            .list_assigned()
            .await?
            .into_iter()
            .find(|assignment| assignment.test_id == test_id)
            .ok_or_else(|| AppError::NotFound(format!("Test {} is not assigned to you", test_id)))
    }

    pub fn can_start(assignment: &Assignment) -> bool {
        !assignment.is_locked() && !assignment.questions.is_empty()
    }

    /// Fetches the assignment fresh and opens a session on it.
    pub async fn start(&self, test_id: i64) -> AppResult<AttemptSession> {
        let assignment = self.find(test_id).await?;
        AttemptSession::start_with_clock(assignment, Arc::clone(&self.clock))
    }
}
