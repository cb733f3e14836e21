pub mod request;
pub mod response;

pub use request::{CreatePracticeRequest, FeedbackRequest, SubmitAttemptRequest};
pub use response::{ApiErrorBody, AssignedTestDto};
