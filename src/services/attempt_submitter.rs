use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::{domain::AttemptResult, dto::SubmitAttemptRequest},
    repositories::AttemptRepository,
    services::{
        attempt_session::{AttemptSession, AttemptStatus, Navigation},
        attempt_timer::{AttemptTimer, TickOutcome},
    },
};

/// A submission that passed the local checks and is ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub request: SubmitAttemptRequest,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Moved { index: usize },
    Unchanged,
    Submitted(AttemptResult),
}

/// Turns a session into the scoring request and applies the backend's answer.
pub struct AttemptSubmitter {
    repository: Arc<dyn AttemptRepository>,
}

impl AttemptSubmitter {
    pub fn new(repository: Arc<dyn AttemptRepository>) -> Self {
        Self { repository }
    }

    /// Answers keyed by stable question id, unanswered questions omitted.
    /// Response times are copied as-is, zero entries included.
    pub fn build_payload(session: &AttemptSession) -> SubmitAttemptRequest {
        let questions = &session.assignment().questions;
        let answers = session
            .selected_options()
            .iter()
            .filter_map(|(index, option)| {
                questions
                    .get(*index)
                    .map(|question| (question.question_id, *option))
            })
            .collect();

        SubmitAttemptRequest {
            test_id: session.test_id(),
            answers,
            response_times: session.time_spent(),
        }
    }

    /// Moves the session to `submitting` and freezes the payload.
    pub fn prepare(&self, session: &mut AttemptSession) -> AppResult<PreparedSubmission> {
        session.begin_submission()?;

        Ok(PreparedSubmission {
            request: Self::build_payload(session),
            idempotency_key: session.submission_key().to_string(),
        })
    }

    /// The network call, detached from the session so a host loop can keep
    /// serving commands while it is pending.
    pub fn dispatch(&self, prepared: PreparedSubmission) -> BoxFuture<'static, AppResult<AttemptResult>> {
        let repository = Arc::clone(&self.repository);
        async move {
            log::info!(
                "Submitting test {} with {} answers",
                prepared.request.test_id,
                prepared.request.answers.len()
            );
            repository
                .submit_attempt(&prepared.request, &prepared.idempotency_key)
                .await
        }
        .boxed()
    }

    pub fn finish(
        &self,
        session: &mut AttemptSession,
        outcome: AppResult<AttemptResult>,
    ) -> AppResult<AttemptResult> {
        session.complete_submission(outcome)
    }

    /// Submits once. On a graded session this returns the stored result
    /// without another request.
    pub async fn submit(&self, session: &mut AttemptSession) -> AppResult<AttemptResult> {
        if session.status() == AttemptStatus::Graded {
            if let Some(result) = session.result() {
                log::debug!("Test {} already graded, not resubmitting", session.test_id());
                return Ok(result.clone());
            }
        }

        let prepared = self.prepare(session)?;
        let outcome = self.dispatch(prepared).await;
        self.finish(session, outcome)
    }

    /// `next()` on the session, submitting when it was the last question.
    pub async fn next(&self, session: &mut AttemptSession) -> AppResult<StepOutcome> {
        match session.next()? {
            Navigation::Moved { index } => Ok(StepOutcome::Moved { index }),
            Navigation::Unchanged => Ok(StepOutcome::Unchanged),
            Navigation::SubmitRequested => Ok(StepOutcome::Submitted(self.submit(session).await?)),
        }
    }

    /// One timer tick, followed by the autosubmit when the tick asks for it.
    pub async fn tick(
        &self,
        timer: &mut AttemptTimer,
        session: &mut AttemptSession,
    ) -> AppResult<TickOutcome> {
        let outcome = timer.tick(session);
        if outcome == TickOutcome::AutoSubmit {
            self.submit(session).await?;
        }
        Ok(outcome)
    }
}
