use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Assignment, AssignmentQuestion, AttemptResult, QuestionId},
    services::clock::{Clock, SystemClock},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitting,
    Graded,
    SubmitFailed,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::InProgress => write!(f, "in_progress"),
            AttemptStatus::Submitting => write!(f, "submitting"),
            AttemptStatus::Graded => write!(f, "graded"),
            AttemptStatus::SubmitFailed => write!(f, "submit_failed"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    Untimed,
    Remaining(u64),
}

/// Result of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Moved { index: usize },
    Unchanged,
    /// `next()` on the last question: the caller should submit.
    SubmitRequested,
}

/// Point-in-time view of a session, published to whoever renders it.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptSnapshot {
    pub status: AttemptStatus,
    pub current_index: usize,
    pub question_count: usize,
    pub current_selection: Option<usize>,
    pub current_flagged: bool,
    pub answered_count: usize,
    pub flagged: Vec<usize>,
    pub remaining_seconds: Option<u64>,
    pub expired: bool,
    pub result: Option<AttemptResult>,
    pub last_error: Option<AppError>,
    /// Host commands handled so far; set by the runner.
    pub commands_applied: u64,
}

/// In-progress state of one run through an assignment's questions.
///
/// The maps are owned exclusively by the session; the timer and submitter
/// only go through the crate-internal hooks below.
pub struct AttemptSession {
    assignment: Assignment,
    submission_key: String,
    current_index: usize,
    selected_option_by_index: BTreeMap<usize, usize>,
    flagged_by_index: BTreeSet<usize>,
    dwell_millis_by_question_id: BTreeMap<QuestionId, u64>,
    countdown: Countdown,
    expired: bool,
    status: AttemptStatus,
    segment_started_at: Option<DateTime<Utc>>,
    result: Option<AttemptResult>,
    last_failure: Option<AppError>,
    clock: Arc<dyn Clock>,
}

impl AttemptSession {
    pub fn start(assignment: Assignment) -> AppResult<Self> {
        Self::start_with_clock(assignment, Arc::new(SystemClock))
    }

    pub fn start_with_clock(assignment: Assignment, clock: Arc<dyn Clock>) -> AppResult<Self> {
        if assignment.is_locked() {
            log::warn!(
                "Refusing to start test {}: already attempted and only one attempt is allowed",
                assignment.test_id
            );
            return Err(AppError::InvalidAssignmentState(format!(
                "test {} was already attempted and does not allow multiple attempts",
                assignment.test_id
            )));
        }
        if assignment.questions.is_empty() {
            return Err(AppError::InvalidAssignmentState(format!(
                "test {} has no questions",
                assignment.test_id
            )));
        }

        let countdown = match assignment.duration.total_seconds() {
            Some(seconds) => Countdown::Remaining(seconds),
            None => Countdown::Untimed,
        };

        let mut session = Self {
            assignment,
            submission_key: Uuid::new_v4().to_string(),
            current_index: 0,
            selected_option_by_index: BTreeMap::new(),
            flagged_by_index: BTreeSet::new(),
            dwell_millis_by_question_id: BTreeMap::new(),
            countdown,
            expired: false,
            status: AttemptStatus::InProgress,
            segment_started_at: None,
            result: None,
            last_failure: None,
            clock,
        };
        session.restart_dwell_clock();

        log::info!(
            "Started attempt on test {} ({} questions, {:?})",
            session.assignment.test_id,
            session.question_count(),
            session.countdown
        );
        Ok(session)
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn assignment_id(&self) -> &str {
        &self.assignment.id
    }

    pub fn test_id(&self) -> i64 {
        self.assignment.test_id
    }

    /// Stable per-session key sent with every submission of this attempt.
    pub fn submission_key(&self) -> &str {
        &self.submission_key
    }

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.assignment.questions.len()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.question_count()
    }

    pub fn current_question(&self) -> Option<&AssignmentQuestion> {
        self.assignment.questions.get(self.current_index)
    }

    pub fn selected_option(&self, index: usize) -> Option<usize> {
        self.selected_option_by_index.get(&index).copied()
    }

    pub fn selected_options(&self) -> &BTreeMap<usize, usize> {
        &self.selected_option_by_index
    }

    pub fn has_answers(&self) -> bool {
        !self.selected_option_by_index.is_empty()
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.flagged_by_index.contains(&index)
    }

    pub fn flagged(&self) -> impl Iterator<Item = usize> + '_ {
        self.flagged_by_index.iter().copied()
    }

    /// Whole seconds per visited question. Dwell is accumulated in
    /// milliseconds and floored only here, so short visits still add up.
    pub fn time_spent(&self) -> BTreeMap<QuestionId, u64> {
        self.dwell_millis_by_question_id
            .iter()
            .map(|(id, millis)| (*id, millis / 1000))
            .collect()
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        match self.countdown {
            Countdown::Remaining(seconds) => Some(seconds),
            Countdown::Untimed => None,
        }
    }

    /// The countdown reached zero. With no answers given the session stays
    /// `in_progress` but accepts no further input.
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    pub fn last_failure(&self) -> Option<&AppError> {
        self.last_failure.as_ref()
    }

    pub fn select_option(&mut self, option: usize) -> AppResult<()> {
        self.ensure_accepting_input()?;

        let option_count = self
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or_default();
        if option >= option_count {
            return Err(AppError::InvalidOption {
                index: self.current_index,
                option,
            });
        }

        self.selected_option_by_index.insert(self.current_index, option);
        Ok(())
    }

    pub fn next(&mut self) -> AppResult<Navigation> {
        self.ensure_accepting_input()?;

        if !self.selected_option_by_index.contains_key(&self.current_index) {
            log::debug!("Blocked forward navigation from unanswered question {}", self.current_index);
            return Err(AppError::AnswerRequired {
                index: self.current_index,
            });
        }
        if self.is_last_question() {
            return Ok(Navigation::SubmitRequested);
        }

        self.commit_current_dwell_time();
        self.current_index += 1;
        self.restart_dwell_clock();
        Ok(Navigation::Moved {
            index: self.current_index,
        })
    }

    pub fn previous(&mut self) -> AppResult<Navigation> {
        self.ensure_accepting_input()?;

        if self.current_index == 0 {
            return Ok(Navigation::Unchanged);
        }

        self.commit_current_dwell_time();
        self.current_index -= 1;
        self.restart_dwell_clock();
        Ok(Navigation::Moved {
            index: self.current_index,
        })
    }

    /// Returns whether the current question is flagged afterwards.
    pub fn toggle_flag(&mut self) -> AppResult<bool> {
        self.ensure_accepting_input()?;

        if self.flagged_by_index.remove(&self.current_index) {
            Ok(false)
        } else {
            self.flagged_by_index.insert(self.current_index);
            Ok(true)
        }
    }

    pub fn snapshot(&self) -> AttemptSnapshot {
        AttemptSnapshot {
            status: self.status,
            current_index: self.current_index,
            question_count: self.question_count(),
            current_selection: self.selected_option(self.current_index),
            current_flagged: self.is_flagged(self.current_index),
            answered_count: self.selected_option_by_index.len(),
            flagged: self.flagged().collect(),
            remaining_seconds: self.remaining_seconds(),
            expired: self.expired,
            result: self.result.clone(),
            last_error: self.last_failure.clone(),
            commands_applied: 0,
        }
    }

    /// Folds the open visit segment into the current question's total and
    /// returns the milliseconds added. A second call without a restart in
    /// between adds nothing.
    pub(crate) fn commit_current_dwell_time(&mut self) -> u64 {
        let Some(started_at) = self.segment_started_at.take() else {
            return 0;
        };
        let Some(question_id) = self.current_question().map(|q| q.question_id) else {
            return 0;
        };

        let elapsed = (self.clock.now() - started_at).num_milliseconds().max(0) as u64;
        *self.dwell_millis_by_question_id.entry(question_id).or_insert(0) += elapsed;
        elapsed
    }

    /// Counts one second off a timed session. `None` when untimed.
    pub(crate) fn decrement_remaining(&mut self) -> Option<u64> {
        match self.countdown {
            Countdown::Untimed => None,
            Countdown::Remaining(seconds) => {
                let remaining = seconds.saturating_sub(1);
                self.countdown = Countdown::Remaining(remaining);
                Some(remaining)
            }
        }
    }

    pub(crate) fn mark_expired(&mut self) {
        self.expired = true;
        self.commit_current_dwell_time();
    }

    /// Moves to `submitting` after the local checks pass.
    pub(crate) fn begin_submission(&mut self) -> AppResult<()> {
        match self.status {
            AttemptStatus::InProgress | AttemptStatus::SubmitFailed => {}
            AttemptStatus::Submitting => return Err(AppError::SubmissionInFlight),
            AttemptStatus::Graded => {
                return Err(AppError::SessionClosed(self.status.to_string()))
            }
        }
        if self.selected_option_by_index.is_empty() {
            return Err(AppError::EmptyAttempt);
        }

        self.commit_current_dwell_time();
        self.status = AttemptStatus::Submitting;
        self.last_failure = None;
        Ok(())
    }

    pub(crate) fn complete_submission(
        &mut self,
        outcome: AppResult<AttemptResult>,
    ) -> AppResult<AttemptResult> {
        if self.status != AttemptStatus::Submitting {
            return Err(AppError::InternalError(format!(
                "submission completed while session was {}",
                self.status
            )));
        }

        match outcome {
            Ok(result) => {
                log::info!(
                    "Attempt on test {} graded: {}/{} (passed: {})",
                    self.assignment.test_id,
                    result.score,
                    result.total_questions,
                    result.passed
                );
                self.status = AttemptStatus::Graded;
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                log::warn!(
                    "Submission for test {} failed: {}",
                    self.assignment.test_id,
                    err
                );
                let failure = match err {
                    AppError::SubmissionFailed(message) => AppError::SubmissionFailed(message),
                    other => AppError::SubmissionFailed(other.to_string()),
                };
                self.status = AttemptStatus::SubmitFailed;
                self.last_failure = Some(failure.clone());
                Err(failure)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn forget_selection(&mut self, index: usize) {
        self.selected_option_by_index.remove(&index);
    }

    fn restart_dwell_clock(&mut self) {
        if let Some(question_id) = self.current_question().map(|q| q.question_id) {
            self.dwell_millis_by_question_id.entry(question_id).or_insert(0);
            self.segment_started_at = Some(self.clock.now());
        }
    }

    fn ensure_accepting_input(&self) -> AppResult<()> {
        if self.status != AttemptStatus::InProgress {
            return Err(AppError::SessionClosed(self.status.to_string()));
        }
        if self.expired {
            return Err(AppError::SessionExpired);
        }
        Ok(())
    }
}
