pub mod assignment_service;
pub mod attempt_runner;
pub mod attempt_session;
pub mod attempt_submitter;
pub mod attempt_timer;
pub mod clock;
pub mod poller;
pub mod practice_service;
pub mod review_service;

pub use assignment_service::AssignmentService;
pub use attempt_runner::{AttemptCommand, AttemptHandle, AttemptRunner};
pub use attempt_session::{AttemptSession, AttemptSnapshot, AttemptStatus, Countdown, Navigation};
pub use attempt_submitter::{AttemptSubmitter, PreparedSubmission, StepOutcome};
pub use attempt_timer::{AttemptTimer, TickOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use poller::{poll_until_terminal, PollPolicy, Terminal};
pub use practice_service::PracticeService;
pub use review_service::ReviewService;
