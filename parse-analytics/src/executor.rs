use crate::analytics::EventData;
use async_trait::async_trait;
use http::Method;
use std::sync::Arc;

/// Performs a single request against the backend on behalf of a reporter.
///
/// Implementors own transport, authentication and encoding. Whatever they
/// return, success or failure, reaches the caller untouched.
#[async_trait]
pub trait RequestExecutor {
    type Response: Send;
    type Error: Send;

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: EventData,
    ) -> Result<Self::Response, Self::Error>;
}

#[async_trait]
impl<T> RequestExecutor for Arc<T>
where
    T: RequestExecutor + Send + Sync + ?Sized,
{
    type Response = T::Response;
    type Error = T::Error;

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: EventData,
    ) -> Result<Self::Response, Self::Error> {
        (**self).execute(method, path, body).await
    }
}
