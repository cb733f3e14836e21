use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::Config,
    errors::AppResult,
    repositories::{
        AssignmentRepository, AttemptRepository, HttpAssignmentRepository, HttpAttemptRepository,
        HttpPracticeRepository, PracticeRepository,
    },
    services::{
        poller::PollPolicy, AssignmentService, AttemptRunner, AttemptSession, AttemptSubmitter,
        AttemptHandle, PracticeService, ReviewService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub assignment_service: Arc<AssignmentService>,
    pub review_service: Arc<ReviewService>,
    pub practice_service: Arc<PracticeService>,
    pub submitter: Arc<AttemptSubmitter>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let client = ApiClient::new(&config)?;

        Ok(Self::with_repositories(
            config,
            Arc::new(HttpAssignmentRepository::new(client.clone())),
            Arc::new(HttpAttemptRepository::new(client.clone())),
            Arc::new(HttpPracticeRepository::new(client)),
        ))
    }

    pub fn with_repositories(
        config: Config,
        assignment_repository: Arc<dyn AssignmentRepository>,
        attempt_repository: Arc<dyn AttemptRepository>,
        practice_repository: Arc<dyn PracticeRepository>,
    ) -> Self {
        let policy = PollPolicy::from_config(&config);

        Self {
            assignment_service: Arc::new(AssignmentService::new(assignment_repository)),
            review_service: Arc::new(ReviewService::new(Arc::clone(&attempt_repository))),
            practice_service: Arc::new(PracticeService::new(practice_repository, policy)),
            submitter: Arc::new(AttemptSubmitter::new(attempt_repository)),
            config: Arc::new(config),
        }
    }

    /// Runs `session` on its own task with the configured tick.
    pub fn run_attempt(&self, session: AttemptSession) -> AttemptHandle {
        AttemptRunner::new(session, Arc::clone(&self.submitter), self.config.timer_tick()).spawn()
    }
}
