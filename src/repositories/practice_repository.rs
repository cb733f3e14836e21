use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::AppResult,
    models::{domain::PracticeSession, dto::CreatePracticeRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PracticeRepository: Send + Sync {
    async fn create_session(&self, request: &CreatePracticeRequest) -> AppResult<PracticeSession>;
    async fn get_session(&self, id: i64) -> AppResult<PracticeSession>;
    async fn list_sessions(&self) -> AppResult<Vec<PracticeSession>>;
}

pub struct HttpPracticeRepository {
    client: ApiClient,
}

impl HttpPracticeRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PracticeRepository for HttpPracticeRepository {
    async fn create_session(&self, request: &CreatePracticeRequest) -> AppResult<PracticeSession> {
        self.client.post_json("practice/", request, None).await
    }

    async fn get_session(&self, id: i64) -> AppResult<PracticeSession> {
        self.client.get_json(&format!("practice/{}/", id)).await
    }

    async fn list_sessions(&self) -> AppResult<Vec<PracticeSession>> {
        self.client.get_json("practice/").await
    }
}
