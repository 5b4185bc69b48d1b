//! Shared HTTP client plumbing for the Pub/Sub and metadata clients

use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use thiserror::Error;

/// HTTP/1 client over plain TCP
pub type HttpClient = Client<HttpConnector, Full<Bytes>>;

pub fn build_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build_http()
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("Connection error: {0}")]
    Connection(#[from] hyper_util::client::legacy::Error),

    #[error("Body collection error: {0}")]
    Body(#[from] hyper::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// A fully collected response
#[derive(Debug, Clone)]
pub struct CollectedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl CollectedResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Send a request and collect the whole response body, bounded by `timeout`
pub async fn send(
    client: &HttpClient,
    request: Request<Full<Bytes>>,
    timeout: Duration,
) -> Result<CollectedResponse, HttpError> {
    let exchange = async {
        let response = client.request(request).await?;
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();
        Ok::<_, HttpError>(CollectedResponse { status, body })
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| HttpError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_failures_surface_as_errors() {
        let client = build_client();
        // Port 9 (discard) on localhost is closed in test environments.
        let request = Request::get("http://127.0.0.1:9/")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let result = send(&client, request, Duration::from_secs(2)).await;
        assert!(matches!(
            result,
            Err(HttpError::Connection(_)) | Err(HttpError::Timeout(_))
        ));
    }

    #[test]
    fn body_text_is_lossy() {
        let response = CollectedResponse {
            status: StatusCode::OK,
            body: Bytes::from_static(b"ok\xff"),
        };
        assert_eq!(response.body_text(), "ok\u{fffd}");
    }
}
