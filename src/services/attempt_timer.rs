use crate::services::attempt_session::{AttemptSession, AttemptStatus, Countdown};

/// What a single one-second tick did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Untimed,
    /// The timer no longer counts; the tick changed nothing.
    Stopped,
    Counting { remaining_seconds: u64 },
    /// Time ran out with at least one answer: the caller must submit.
    AutoSubmit,
    /// Time ran out with nothing answered. No submission is made.
    ExpiredInert,
}

/// Countdown bound to one session. Once stopped it never restarts.
#[derive(Debug)]
pub struct AttemptTimer {
    stopped: bool,
}

impl AttemptTimer {
    pub fn for_session(session: &AttemptSession) -> Self {
        let stopped = session.countdown() == Countdown::Untimed
            || session.status() != AttemptStatus::InProgress
            || session.is_expired();
        Self { stopped }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn tick(&mut self, session: &mut AttemptSession) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Stopped;
        }
        if session.status() != AttemptStatus::InProgress || session.is_expired() {
            self.stopped = true;
            return TickOutcome::Stopped;
        }

        match session.decrement_remaining() {
            None => {
                self.stopped = true;
                TickOutcome::Untimed
            }
            Some(remaining) if remaining > 0 => TickOutcome::Counting {
                remaining_seconds: remaining,
            },
            Some(_) => {
                self.stopped = true;
                session.mark_expired();
                if session.has_answers() {
                    log::info!("Time is up on test {}, submitting", session.test_id());
                    TickOutcome::AutoSubmit
                } else {
                    log::warn!(
                        "Time is up on test {} with no answers; leaving the attempt unsubmitted",
                        session.test_id()
                    );
                    TickOutcome::ExpiredInert
                }
            }
        }
    }
}
