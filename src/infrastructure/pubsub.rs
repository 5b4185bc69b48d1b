//! Google Pub/Sub channel over the REST v1 API
//!
//! Opening a channel resolves the topic and creates it when it does not
//! exist yet. Pushing publishes a single base64-encoded message. Requests
//! go over plain HTTP, which is what the Pub/Sub emulator speaks; an
//! optional bearer token is attached when configured.

use crate::application::channel::{Channel, ChannelError};
use crate::domain::{ChannelName, ProjectId};
use crate::infrastructure::constants::{self, headers, paths};
use crate::infrastructure::http_client::{self, CollectedResponse, HttpClient, HttpError};
use crate::infrastructure::log_messages;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::Full;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// How to reach the Pub/Sub service
#[derive(Debug, Clone)]
pub struct PubSubOptions {
    /// Base URL, e.g. `http://localhost:8085`
    pub endpoint: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub token: Option<String>,
    /// Upper bound for a single request
    pub timeout: Duration,
}

impl Default for PubSubOptions {
    fn default() -> Self {
        Self {
            endpoint: constants::endpoints::PUBSUB_EMULATOR.to_string(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: Vec<PubsubMessage>,
}

#[derive(Debug, Serialize)]
struct PubsubMessage {
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

impl From<HttpError> for ChannelError {
    fn from(err: HttpError) -> Self {
        ChannelError::Transport(err.to_string())
    }
}

/// A resolved Pub/Sub topic
pub struct PubSubChannel {
    client: HttpClient,
    name: ChannelName,
    topic_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl PubSubChannel {
    /// Resolve `name` within `project`, creating the topic if needed
    #[instrument(skip(client, options), fields(endpoint = %options.endpoint))]
    pub async fn open(
        client: HttpClient,
        options: &PubSubOptions,
        project: &ProjectId,
        name: ChannelName,
    ) -> Result<Self, ChannelError> {
        if project.is_placeholder() {
            return Err(ChannelError::InvalidRequest(format!(
                "a project id is required to open topic {name}"
            )));
        }

        let channel = Self {
            client,
            topic_url: topic_url(&options.endpoint, project, &name),
            name,
            token: options.token.clone(),
            timeout: options.timeout,
        };

        let response = channel
            .send(Method::GET, &channel.topic_url, Bytes::new())
            .await?;
        match response.status {
            status if status.is_success() => {
                info!(topic = %channel.name, "{}", log_messages::transport::TOPIC_FOUND);
            }
            StatusCode::NOT_FOUND => channel.create_topic().await?,
            status => return Err(rejected(status, &response)),
        }

        Ok(channel)
    }

    async fn create_topic(&self) -> Result<(), ChannelError> {
        let response = self
            .send(Method::PUT, &self.topic_url, Bytes::from_static(b"{}"))
            .await?;

        // CONFLICT means another publisher created it first.
        if response.status.is_success() || response.status == StatusCode::CONFLICT {
            info!(topic = %self.name, "{}", log_messages::transport::TOPIC_CREATED);
            Ok(())
        } else {
            Err(rejected(response.status, &response))
        }
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Bytes,
    ) -> Result<Request<Full<Bytes>>, ChannelError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url)
            .header(header::USER_AGENT, constants::USER_AGENT)
            .header(header::CONTENT_TYPE, headers::APPLICATION_JSON);
        if let Some(token) = &self.token {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("{}{token}", headers::BEARER_PREFIX),
            );
        }

        builder
            .body(Full::new(body))
            .map_err(|e| ChannelError::InvalidRequest(e.to_string()))
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Bytes,
    ) -> Result<CollectedResponse, ChannelError> {
        let request = self.build_request(method, url, body)?;
        Ok(http_client::send(&self.client, request, self.timeout).await?)
    }
}

#[async_trait]
impl Channel for PubSubChannel {
    fn name(&self) -> &ChannelName {
        &self.name
    }

    async fn push(&self, payload: Bytes) -> Result<(), ChannelError> {
        let url = format!("{}{}", self.topic_url, paths::PUBLISH_SUFFIX);
        let response = self
            .send(Method::POST, &url, publish_body(&payload))
            .await?;

        if !response.status.is_success() {
            return Err(rejected(response.status, &response));
        }

        if let Ok(published) = serde_json::from_slice::<PublishResponse>(&response.body) {
            debug!(
                topic = %self.name,
                message_ids = ?published.message_ids,
                "{}",
                log_messages::transport::MESSAGE_PUBLISHED
            );
        }
        Ok(())
    }
}

fn topic_url(endpoint: &str, project: &ProjectId, name: &ChannelName) -> String {
    format!(
        "{}/{}/projects/{}/topics/{}",
        endpoint.trim_end_matches('/'),
        paths::PUBSUB_API_VERSION,
        project,
        name
    )
}

/// JSON body of a publish call carrying one message
fn publish_body(payload: &[u8]) -> Bytes {
    let request = PublishRequest {
        messages: vec![PubsubMessage {
            data: STANDARD.encode(payload),
        }],
    };
    Bytes::from(serde_json::to_vec(&request).expect("publish request always serializes"))
}

fn rejected(status: StatusCode, response: &CollectedResponse) -> ChannelError {
    match status {
        StatusCode::NOT_FOUND => ChannelError::NotFound(response.body_text()),
        _ => ChannelError::Rejected {
            status: status.as_u16(),
            message: response.body_text(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectId {
        ProjectId::new("my-project".to_string())
    }

    fn name() -> ChannelName {
        ChannelName::try_new("eventmakertemp".to_string()).unwrap()
    }

    #[test]
    fn topic_url_joins_segments() {
        assert_eq!(
            topic_url("http://localhost:8085/", &project(), &name()),
            "http://localhost:8085/v1/projects/my-project/topics/eventmakertemp"
        );
    }

    #[test]
    fn publish_body_base64_encodes_payload() {
        let body = publish_body(br#"{"value":1.5}"#);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let data = json["messages"][0]["data"].as_str().unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), br#"{"value":1.5}"#.to_vec());
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn rejected_maps_not_found() {
        let response = CollectedResponse {
            status: StatusCode::NOT_FOUND,
            body: Bytes::from_static(b"no such topic"),
        };
        assert_eq!(
            rejected(StatusCode::NOT_FOUND, &response),
            ChannelError::NotFound("no such topic".to_string())
        );
    }

    #[tokio::test]
    async fn open_requires_a_project() {
        let result = PubSubChannel::open(
            http_client::build_client(),
            &PubSubOptions::default(),
            &ProjectId::placeholder(),
            name(),
        )
        .await;

        assert!(matches!(result, Err(ChannelError::InvalidRequest(_))));
    }
}
