//! Persistence collaborators for validated question records.
use crate::conf;
use crate::erx::{Erx, ResultE};
use crate::question::QuestionRecord;
use crate::web::client::{Client, ClientBuilder};
use crate::web::url::encode_segment;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Stores question records. Only ever called with a record that passed the
/// form pipeline; failures are remote errors and are not retried.
#[async_trait]
pub trait QuestionService: Send + Sync {
    fn name(&self) -> &str;

    /// returns the new question id
    async fn create(&self, record: &QuestionRecord) -> ResultE<String>;

    async fn update(&self, id: &str, record: &QuestionRecord) -> ResultE<String>;
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// `QuestionService` over the quiz REST service.
pub struct HttpQuestionService {
    client: Client,
}

impl HttpQuestionService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(services: &conf::Services) -> ResultE<Self> {
        let mut builder = ClientBuilder::new(&services.quiz);
        builder.use_json();
        if let Some(agent) = services.user_agent.as_deref() {
            builder.set_user_agent(agent);
        }
        Ok(Self::new(builder.build()?))
    }

    fn accepted(created: Created) -> ResultE<String> {
        if created.id.trim().is_empty() {
            return Err(Erx::remote("quiz service returned an empty question id"));
        }
        Ok(created.id)
    }
}

#[async_trait]
impl QuestionService for HttpQuestionService {
    fn name(&self) -> &str {
        "http"
    }

    async fn create(&self, record: &QuestionRecord) -> ResultE<String> {
        debug!("create question in quiz {} via {}", record.quiz_id, self.client.base());
        let created: Created = self.client.post_typed("/questions", record).await?;
        Self::accepted(created)
    }

    async fn update(&self, id: &str, record: &QuestionRecord) -> ResultE<String> {
        debug!("update question {} via {}", id, self.client.base());
        let path = format!("/questions/{}", encode_segment(id));
        let updated: Created = self.client.put_typed(&path, record).await?;
        Self::accepted(updated)
    }
}
