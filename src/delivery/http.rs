//! HTTP deliverer backed by reqwest.
//!
//! The outbound wire contract is fixed: one POST per target with
//! `Content-Type: application/json` and body `{"text": "<message>"}`.
//! No authentication headers are added; targets needing auth encode it in
//! their URL.

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::types::ChatMessage;

use super::{Deliverer, DeliveryError};

/// Default per-request timeout for outbound posts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers chat messages over HTTP.
///
/// Cheap to clone; the inner reqwest client shares its connection pool
/// across clones.
#[derive(Debug, Clone)]
pub struct HttpDeliverer {
    client: reqwest::Client,
}

impl HttpDeliverer {
    /// Creates a deliverer with the default client configuration.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        HttpDeliverer { client }
    }

    /// Creates a deliverer over a pre-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpDeliverer { client }
    }
}

impl Default for HttpDeliverer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deliverer for HttpDeliverer {
    fn deliver(
        &self,
        url: &str,
        message: &ChatMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        let request = serde_json::to_vec(message).map(|body| {
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
        });

        async move {
            let response = request?.send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(DeliveryError::Status(status.as_u16()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Received = Arc<Mutex<Vec<(Option<String>, String)>>>;

    /// Stands up a local receiver that records content type and raw body,
    /// responding with the given status.
    async fn spawn_receiver(status: StatusCode) -> (SocketAddr, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));

        async fn record(
            State((received, status)): State<(Received, StatusCode)>,
            headers: HeaderMap,
            body: String,
        ) -> StatusCode {
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            received.lock().unwrap().push((content_type, body));
            status
        }

        let app = Router::new()
            .route("/hook", post(record))
            .with_state((Arc::clone(&received), status));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (addr, received)
    }

    fn message() -> ChatMessage {
        ChatMessage {
            text: "📌 Redmine New\nhello".into(),
        }
    }

    #[tokio::test]
    async fn posts_json_body_with_content_type() {
        let (addr, received) = spawn_receiver(StatusCode::OK).await;
        let deliverer = HttpDeliverer::new();

        let url = format!("http://{}/hook", addr);
        deliverer.deliver(&url, &message()).await.unwrap();

        let recorded = received.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        let (content_type, body) = &recorded[0];
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let parsed: ChatMessage = serde_json::from_str(body).unwrap();
        assert_eq!(parsed, message());
    }

    #[tokio::test]
    async fn non_2xx_response_is_a_status_error() {
        let (addr, _received) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
        let deliverer = HttpDeliverer::new();

        let url = format!("http://{}/hook", addr);
        let result = deliverer.deliver(&url, &message()).await;

        assert!(matches!(result, Err(DeliveryError::Status(500))));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let deliverer = HttpDeliverer::new();
        let url = format!("http://{}/hook", addr);
        let result = deliverer.deliver(&url, &message()).await;

        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
