use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes requests for the queue-times clients.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
