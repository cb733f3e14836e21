use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::{AppError, AppResult},
    models::{domain::Assignment, dto::AssignedTestDto},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn list_assigned(&self) -> AppResult<Vec<Assignment>>;
}

pub struct HttpAssignmentRepository {
    client: ApiClient,
}

impl HttpAssignmentRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssignmentRepository for HttpAssignmentRepository {
    async fn list_assigned(&self) -> AppResult<Vec<Assignment>> {
        // The backend answers 404 "No tests assigned." for an empty list.
        let dtos: Vec<AssignedTestDto> = match self.client.get_json("tests/assigned/").await {
            Ok(dtos) => dtos,
            Err(AppError::NotFound(message)) => {
                log::info!("No assigned tests: {}", message);
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        Ok(dtos.into_iter().map(Assignment::from).collect())
    }
}
