pub mod assignment;
pub mod attempt_result;
pub mod feedback;
pub mod practice;
pub use assignment::{
    Assignment, AssignmentQuestion, QuestionId, ResultsVisibility, TestDuration,
};
pub use attempt_result::{AttemptResult, AttemptReview, PerformanceBand, ReviewedQuestion};
pub use feedback::TeacherFeedback;
pub use practice::{GeneratedQuestion, PracticeSession, PracticeStatus};
