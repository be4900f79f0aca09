//! Inbound hook endpoint.
//!
//! Accepts issue event notifications posted by the host application and
//! forwards them to the matching [`HookListener`] call site. Delivery
//! outcomes never affect the response: the host gets `202 Accepted` as
//! soon as the event has gone through the pipeline, whether or not any
//! target delivery failed, so a broken chat endpoint can never break the
//! host's own request handling.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::AppState;
use crate::delivery::Deliverer;
use crate::hooks::{HookOutcome, RequestContext};
use crate::status::StatusDirectory;
use crate::targets::TargetStore;
use crate::types::{Issue, Journal};

/// Which host hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Issue created through the controller.
    Created,
    /// Issue edited through the controller.
    Updated,
    /// One issue of a controller bulk edit.
    BulkUpdated,
    /// Background changeset scan linked a commit to the issue.
    Commit,
}

/// Wire shape of a host event notification.
#[derive(Debug, Deserialize)]
pub struct HookRequest {
    pub kind: HookKind,
    pub issue: Issue,
    #[serde(default)]
    pub journal: Option<Journal>,
    /// Canonical issue URL, when the host had a serving context.
    #[serde(default)]
    pub url: Option<String>,
}

/// Errors that can occur when accepting a hook notification.
#[derive(Debug, Error)]
pub enum HookRequestError {
    /// Invalid JSON body.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Update-class event without a journal.
    #[error("missing journal for {0} event")]
    MissingJournal(&'static str),

    /// Create event without a canonical URL.
    #[error("missing url for created event")]
    MissingUrl,
}

impl IntoResponse for HookRequestError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Hook handler.
///
/// # Request
///
/// - Method: POST
/// - Body: JSON `{kind, issue, journal?, url?}` (see [`HookRequest`])
/// - Optional header `X-Skip-Webhooks` (any value): suppresses dispatch,
///   letting webhook-driven automation replay host actions without
///   re-notifying.
///
/// # Response
///
/// - 202 Accepted: event went through the pipeline (delivery failures
///   are logged, not reported here)
/// - 202 Accepted (skipped): event suppressed by the skip gate
/// - 400 Bad Request: malformed body, or journal/url missing for the kind
pub async fn hook_handler<S, C, D>(
    State(app_state): State<AppState<S, C, D>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), HookRequestError>
where
    S: TargetStore + Send + Sync + 'static,
    C: StatusDirectory + Send + Sync + 'static,
    D: Deliverer + Send + Sync + 'static,
{
    let request: HookRequest = serde_json::from_slice(&body)?;

    debug!(issue = %request.issue.id, kind = ?request.kind, "received host event");

    let ctx = request_context(&headers);
    let listener = app_state.listener();

    let outcome = match request.kind {
        HookKind::Created => {
            let url = request.url.as_deref().ok_or(HookRequestError::MissingUrl)?;
            listener
                .issue_created(Some(&ctx), &request.issue, url)
                .await
        }
        HookKind::Updated => {
            let journal = request
                .journal
                .as_ref()
                .ok_or(HookRequestError::MissingJournal("updated"))?;
            listener
                .issue_updated(Some(&ctx), &request.issue, journal, request.url.as_deref())
                .await
        }
        HookKind::BulkUpdated => {
            let journal = request
                .journal
                .as_ref()
                .ok_or(HookRequestError::MissingJournal("bulk_updated"))?;
            listener
                .issues_bulk_updated(Some(&ctx), &request.issue, journal, request.url.as_deref())
                .await
        }
        HookKind::Commit => {
            let journal = request
                .journal
                .as_ref()
                .ok_or(HookRequestError::MissingJournal("commit"))?;
            listener.commit_referenced(&request.issue, journal).await
        }
    };

    match outcome {
        HookOutcome::Skipped => Ok((StatusCode::ACCEPTED, "Accepted (skipped)")),
        HookOutcome::Dispatched(_) => Ok((StatusCode::ACCEPTED, "Accepted")),
    }
}

/// Builds the listener's request context from the inbound headers.
///
/// Only headers with valid UTF-8 values are carried over.
fn request_context(headers: &HeaderMap) -> RequestContext {
    let map: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect();
    RequestContext::new(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::DeliveryError;
    use crate::dispatch::Dispatcher;
    use crate::hooks::HookListener;
    use crate::payload::EventPayloadBuilder;
    use crate::server::build_router;
    use crate::targets::{InMemoryTargetStore, TargetResolver, WebhookTarget};
    use crate::types::{ChatMessage, ProjectId, StatusId, TargetId};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Deliverer recording calls behind an Arc so tests can inspect them
    /// after the router has consumed the state.
    #[derive(Clone, Default)]
    struct RecordingDeliverer {
        calls: Arc<Mutex<Vec<(String, ChatMessage)>>>,
    }

    impl Deliverer for RecordingDeliverer {
        fn deliver(
            &self,
            url: &str,
            message: &ChatMessage,
        ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), message.clone()));
            async { Ok(()) }
        }
    }

    fn test_router(deliverer: RecordingDeliverer) -> axum::Router {
        let store = InMemoryTargetStore::new(vec![WebhookTarget {
            id: TargetId(1),
            project_id: ProjectId(5),
            url: "https://chat.example/a".to_string(),
        }]);
        let statuses = std::collections::HashMap::from([(StatusId(1), "New".to_string())]);
        let listener = HookListener::new(Dispatcher::new(
            TargetResolver::new(store),
            EventPayloadBuilder::new(statuses),
            deliverer,
        ));
        build_router(AppState::new(listener))
    }

    fn created_body() -> serde_json::Value {
        serde_json::json!({
            "kind": "created",
            "issue": {
                "id": 42,
                "subject": "Login broken",
                "project": { "id": 5, "name": "Web" },
                "tracker_name": "Bug",
                "status_id": 1,
                "author": { "firstname": "Alice", "lastname": "Smith" }
            },
            "url": "https://host/issues/42"
        })
    }

    fn post_hook(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/hooks/redmine")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn created_event_returns_202_and_delivers() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer.clone());

        let response = app.oneshot(post_hook(&created_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Accepted");

        let calls = deliverer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://chat.example/a");
        assert!(calls[0].1.text.starts_with("📌 Redmine New"));
    }

    #[tokio::test]
    async fn skip_header_returns_202_without_delivery() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/hooks/redmine")
            .header("content-type", "application/json")
            .header("X-Skip-Webhooks", "1")
            .body(Body::from(serde_json::to_vec(&created_body()).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Accepted (skipped)");
        assert!(deliverer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn updated_event_without_journal_returns_400() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer.clone());

        let mut body = created_body();
        body["kind"] = serde_json::json!("updated");

        let response = app.oneshot(post_hook(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(deliverer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn created_event_without_url_returns_400() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer.clone());

        let mut body = created_body();
        body.as_object_mut().unwrap().remove("url");

        let response = app.oneshot(post_hook(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_returns_400() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer);

        let request = Request::builder()
            .method("POST")
            .uri("/hooks/redmine")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn commit_event_dispatches_with_placeholder_url() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer.clone());

        let body = serde_json::json!({
            "kind": "commit",
            "issue": created_body()["issue"],
            "journal": { "notes": "applied in changeset r100" }
        });

        let response = app.oneshot(post_hook(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let calls = deliverer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.text.ends_with("URL: not yet implemented"));
    }

    #[tokio::test]
    async fn update_event_golden_message() {
        let deliverer = RecordingDeliverer::default();
        let app = test_router(deliverer.clone());

        let body = serde_json::json!({
            "kind": "updated",
            "issue": created_body()["issue"],
            "journal": {
                "notes": "fixed in trunk",
                "author": { "firstname": "Bob", "lastname": "Jones" }
            },
            "url": "https://host/issues/42"
        });

        let response = app.oneshot(post_hook(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let calls = deliverer.calls.lock().unwrap();
        assert_eq!(
            calls[0].1.text,
            "📌 Redmine Update\nSubject: [Web - Bug #42] (New) Login broken\n\nIssue #42 was updated by Bob Jones.\n\nfixed in trunk\n\nURL: https://host/issues/42"
        );
    }
}
