//! HTTP ingest output.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use super::Sink;
use crate::config::NDJSON_CONTENT_TYPE;
use crate::error_handling::DeliveryError;

/// POSTs each payload to an ingest endpoint with a bearer token.
///
/// Success is strictly `200 OK`; any other status, including other 2xx codes,
/// fails the delivery.
pub struct HttpIngestSink {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpIngestSink {
    /// The client's timeout applies to every delivery.
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Sink for HttpIngestSink {
    fn name(&self) -> &'static str {
        "http-ingest"
    }

    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, NDJSON_CONTENT_TYPE)
            .bearer_auth(&self.token)
            .body(payload.to_owned())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(DeliveryError::Status {
                status: response.status().to_string(),
            });
        }

        log::debug!("Ingested {} bytes", payload.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HTTP_INGEST_TIMEOUT;
    use crate::initialization::init_http_client;
    use std::time::Duration;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sink_for(server: &MockServer) -> HttpIngestSink {
        let client = init_http_client(HTTP_INGEST_TIMEOUT).unwrap();
        HttpIngestSink::new(
            client,
            format!("{}/v1/http/maxmind-geoip", server.uri()),
            "secret-token",
        )
    }

    #[tokio::test]
    async fn test_http_sink_posts_ndjson_with_bearer_token() {
        let server = MockServer::start().await;
        let payload = "{\"network\":\"1.0.0.0/24\"}\n{\"network\":\"1.0.1.0/24\"}";
        Mock::given(method("POST"))
            .and(path("/v1/http/maxmind-geoip"))
            .and(header("content-type", "application/x-ndjson"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_string(payload))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        sink_for(&server).deliver(payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_sink_server_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        match sink_for(&server).deliver("{}").await {
            Err(DeliveryError::Status { status }) => {
                assert_eq!(status, "500 Internal Server Error");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_sink_requires_exactly_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let result = sink_for(&server).deliver("{}").await;
        assert!(matches!(result, Err(DeliveryError::Status { .. })));
    }

    #[tokio::test]
    async fn test_http_sink_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = init_http_client(Duration::from_millis(100)).unwrap();
        let sink = HttpIngestSink::new(client, server.uri(), "token");
        let result = sink.deliver("{}").await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
