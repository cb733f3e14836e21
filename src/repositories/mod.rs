pub mod assignment_repository;
pub mod attempt_repository;
pub mod practice_repository;

pub use assignment_repository::{AssignmentRepository, HttpAssignmentRepository};
pub use attempt_repository::{AttemptRepository, HttpAttemptRepository};
pub use practice_repository::{HttpPracticeRepository, PracticeRepository};

#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(test)]
pub use attempt_repository::MockAttemptRepository;
#[cfg(test)]
pub use practice_repository::MockPracticeRepository;
