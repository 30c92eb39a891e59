use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for the dashboard API; wrappers can add headers or
/// rewrite requests before delegating.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
