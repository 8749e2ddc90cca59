use crate::executor::RequestExecutor;
use http::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Key-value payload attached to an analytics event.
pub type EventData = Map<String, Value>;

/// Event name the backend reserves for application-open tracking.
pub const APP_OPENED: &str = "AppOpened";

const EVENTS_PATH: &str = "events";

/// Builds the request path for an event. The name is used verbatim; any
/// escaping is left to the executor.
pub fn event_path(event_name: &str) -> String {
    format!("{EVENTS_PATH}/{event_name}")
}

/// Reports named events through a shared [`RequestExecutor`].
#[derive(Debug)]
pub struct Analytics<E: ?Sized> {
    executor: Arc<E>,
}

impl<E: ?Sized> Clone for Analytics<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl<E> Analytics<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }
}

impl<E: ?Sized> Analytics<E> {
    pub fn from_arc(executor: Arc<E>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }
}

impl<E> Analytics<E>
where
    E: RequestExecutor + Send + Sync + ?Sized,
{
    /// POSTs `data` (or an empty object) to `events/<event_name>` and hands
    /// back the executor's result as is.
    #[tracing::instrument(skip(self, data))]
    pub async fn send_event(
        &self,
        event_name: &str,
        data: Option<EventData>,
    ) -> Result<E::Response, E::Error> {
        let path = event_path(event_name);
        let body = data.unwrap_or_default();

        debug!("Sending analytics event to {path} with {} field(s)", body.len());

        self.executor.execute(Method::POST, &path, body).await
    }

    pub async fn app_opened(&self, data: Option<EventData>) -> Result<E::Response, E::Error> {
        self.send_event(APP_OPENED, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct StubError(String);

    type Call = (Method, String, EventData);

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<Call>>,
        fail_with: Option<StubError>,
    }

    impl RecordingExecutor {
        fn failing(error: StubError) -> Self {
            Self {
                calls: Mutex::default(),
                fail_with: Some(error),
            }
        }

        async fn calls(&self) -> Vec<Call> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl RequestExecutor for RecordingExecutor {
        type Response = Value;
        type Error = StubError;

        async fn execute(
            &self,
            method: Method,
            path: &str,
            body: EventData,
        ) -> Result<Value, StubError> {
            self.calls
                .lock()
                .await
                .push((method, path.to_string(), body));

            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(json!({ "ok": true })),
            }
        }
    }

    fn data(value: Value) -> EventData {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn test_event_path() {
        assert_eq!(event_path("app_open"), "events/app_open");
        assert_eq!(event_path("with space/slash"), "events/with space/slash");
        assert_eq!(event_path(""), "events/");
    }

    #[tokio::test]
    async fn test_send_event_with_data() {
        let analytics = Analytics::new(RecordingExecutor::default());
        let payload = data(json!({ "item": "coins", "amount": 5 }));

        analytics
            .send_event("purchase", Some(payload.clone()))
            .await
            .expect("Failed to send event");

        let calls = analytics.executor().calls().await;
        assert_eq!(
            calls,
            vec![(Method::POST, "events/purchase".to_string(), payload)]
        );
    }

    #[tokio::test]
    async fn test_send_event_without_data_sends_empty_object() {
        let analytics = Analytics::new(RecordingExecutor::default());

        let response = analytics
            .send_event("app_open", None)
            .await
            .expect("Failed to send event");

        assert_eq!(response, json!({ "ok": true }));

        let calls = analytics.executor().calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Method::POST);
        assert_eq!(calls[0].1, "events/app_open");
        assert!(calls[0].2.is_empty());
    }

    #[tokio::test]
    async fn test_send_event_propagates_error() {
        let error = StubError("rate limited".to_string());
        let analytics = Analytics::new(RecordingExecutor::failing(error.clone()));

        let result = analytics.send_event("purchase", None).await;

        assert_eq!(result, Err(error));
        assert_eq!(analytics.executor().calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_app_opened() {
        let analytics = Analytics::new(RecordingExecutor::default());

        analytics
            .app_opened(Some(data(json!({ "source": "push" }))))
            .await
            .expect("Failed to send event");

        let calls = analytics.executor().calls().await;
        assert_eq!(calls[0].1, "events/AppOpened");
        assert_eq!(calls[0].2, data(json!({ "source": "push" })));
    }

    #[tokio::test]
    async fn test_clones_share_executor() {
        let analytics = Analytics::new(RecordingExecutor::default());
        let other = analytics.clone();

        let (first, second) = tokio::join!(
            analytics.send_event("first", None),
            other.send_event("second", None)
        );
        assert!(first.is_ok());
        assert!(second.is_ok());

        let mut paths: Vec<String> = analytics
            .executor()
            .calls()
            .await
            .into_iter()
            .map(|(_, path, _)| path)
            .collect();
        paths.sort();

        assert_eq!(paths, vec!["events/first", "events/second"]);
    }
}
