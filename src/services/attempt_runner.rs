use futures::future::{BoxFuture, OptionFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::{
    errors::{AppError, AppResult},
    models::domain::AttemptResult,
    services::{
        attempt_session::{AttemptSession, AttemptSnapshot, AttemptStatus, Navigation},
        attempt_submitter::AttemptSubmitter,
        attempt_timer::{AttemptTimer, TickOutcome},
    },
};

const COMMAND_BUFFER: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptCommand {
    SelectOption(usize),
    Next,
    Previous,
    ToggleFlag,
    Submit,
    Close,
}

/// Host-side handle to a running attempt.
pub struct AttemptHandle {
    commands: mpsc::Sender<AttemptCommand>,
    snapshots: watch::Receiver<AttemptSnapshot>,
    task: JoinHandle<AttemptSession>,
}

impl AttemptHandle {
    pub async fn send(&self, command: AttemptCommand) -> AppResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AppError::SessionClosed("runner stopped".to_string()))
    }

    pub fn subscribe(&self) -> watch::Receiver<AttemptSnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> AttemptSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Closes the attempt and hands the session back. A submission that is
    /// still pending is awaited and applied first.
    pub async fn finish(self) -> AppResult<AttemptSession> {
        let _ = self.commands.send(AttemptCommand::Close).await;
        self.task
            .await
            .map_err(|e| AppError::InternalError(format!("Attempt runner panicked: {}", e)))
    }
}

/// Serializes user commands, timer ticks and the submission result for a
/// single session on one task.
pub struct AttemptRunner {
    session: AttemptSession,
    timer: AttemptTimer,
    submitter: Arc<AttemptSubmitter>,
    tick_every: Duration,
    commands_applied: u64,
    /// Rejection of the latest command, kept until the next command so
    /// tick snapshots do not hide it.
    command_error: Option<AppError>,
}

impl AttemptRunner {
    pub fn new(session: AttemptSession, submitter: Arc<AttemptSubmitter>, tick_every: Duration) -> Self {
        let timer = AttemptTimer::for_session(&session);
        Self {
            session,
            timer,
            submitter,
            tick_every,
            commands_applied: 0,
            command_error: None,
        }
    }

    pub fn spawn(self) -> AttemptHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.session.snapshot());

        let task = tokio::spawn(self.run(command_rx, snapshot_tx));

        AttemptHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<AttemptCommand>,
        snapshots: watch::Sender<AttemptSnapshot>,
    ) -> AttemptSession {
        let mut ticker = interval_at(Instant::now() + self.tick_every, self.tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut in_flight: Option<BoxFuture<'static, AppResult<AttemptResult>>> = None;
        let mut closing = false;

        loop {
            if closing && in_flight.is_none() {
                break;
            }

            tokio::select! {
                Some(outcome) = OptionFuture::from(in_flight.as_mut()) => {
                    in_flight = None;
                    self.command_error = None;
                    let error = self.submitter.finish(&mut self.session, outcome).err();
                    self.publish(&snapshots, error);
                }
                command = commands.recv(), if !closing => {
                    match command {
                        None | Some(AttemptCommand::Close) => {
                            log::debug!("Closing attempt on test {}", self.session.test_id());
                            closing = true;
                        }
                        Some(command) => {
                            self.commands_applied += 1;
                            self.command_error = self.apply(command, &mut in_flight).err();
                            self.publish(&snapshots, None);
                        }
                    }
                }
                _ = ticker.tick(), if self.timer.is_running() && !closing => {
                    let error = match self.timer.tick(&mut self.session) {
                        TickOutcome::AutoSubmit => self.start_submission(&mut in_flight).err(),
                        _ => None,
                    };
                    self.publish(&snapshots, error);
                }
            }
        }

        self.timer.stop();
        self.session
    }

    fn apply(
        &mut self,
        command: AttemptCommand,
        in_flight: &mut Option<BoxFuture<'static, AppResult<AttemptResult>>>,
    ) -> AppResult<()> {
        match command {
            AttemptCommand::SelectOption(option) => self.session.select_option(option),
            AttemptCommand::Next => match self.session.next()? {
                Navigation::SubmitRequested => self.start_submission(in_flight),
                Navigation::Moved { .. } | Navigation::Unchanged => Ok(()),
            },
            AttemptCommand::Previous => self.session.previous().map(|_| ()),
            AttemptCommand::ToggleFlag => self.session.toggle_flag().map(|_| ()),
            AttemptCommand::Submit => self.start_submission(in_flight),
            AttemptCommand::Close => Ok(()),
        }
    }

    fn start_submission(
        &mut self,
        in_flight: &mut Option<BoxFuture<'static, AppResult<AttemptResult>>>,
    ) -> AppResult<()> {
        if self.session.status() == AttemptStatus::Graded {
            return Ok(());
        }

        let prepared = self.submitter.prepare(&mut self.session)?;
        self.timer.stop();
        *in_flight = Some(self.submitter.dispatch(prepared));
        Ok(())
    }

    fn publish(&self, snapshots: &watch::Sender<AttemptSnapshot>, error: Option<AppError>) {
        let mut snapshot = self.session.snapshot();
        snapshot.commands_applied = self.commands_applied;
        if let Some(error) = error.or_else(|| self.command_error.clone()) {
            snapshot.last_error = Some(error);
        }
        snapshots.send_replace(snapshot);
    }
}
