//! Best-effort project lookup against the GCE metadata server

use crate::domain::ProjectId;
use crate::infrastructure::constants::{self, headers, paths};
use crate::infrastructure::http_client::{self, HttpClient, HttpError};
use crate::infrastructure::log_messages;
use bytes::Bytes;
use http::{header, Request};
use http_body_util::Full;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Metadata server answered with status {0}")]
    Status(u16),

    #[error("Metadata server returned an empty project id")]
    Empty,
}

pub struct MetadataClient {
    client: HttpClient,
    endpoint: String,
    timeout: Duration,
}

impl MetadataClient {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(2),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Project the current instance runs in, or `None` when it cannot be
    /// determined
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn project_id(&self) -> Option<ProjectId> {
        match self.fetch_project_id().await {
            Ok(project) => {
                info!(%project, "{}", log_messages::identity::PROJECT_RESOLVED);
                Some(project)
            }
            Err(error) => {
                warn!(%error, "{}", log_messages::identity::LOOKUP_FAILED);
                None
            }
        }
    }

    async fn fetch_project_id(&self) -> Result<ProjectId, MetadataError> {
        let url = format!(
            "{}{}",
            self.endpoint.trim_end_matches('/'),
            paths::METADATA_PROJECT_ID
        );
        let request = Request::get(url)
            .header(headers::METADATA_FLAVOR, headers::METADATA_FLAVOR_GOOGLE)
            .header(header::USER_AGENT, constants::USER_AGENT)
            .body(Full::new(Bytes::new()))
            .map_err(HttpError::from)?;

        let response = http_client::send(&self.client, request, self.timeout).await?;
        if !response.status.is_success() {
            return Err(MetadataError::Status(response.status.as_u16()));
        }

        let project = ProjectId::new(response.body_text());
        if project.is_placeholder() {
            return Err(MetadataError::Empty);
        }
        Ok(project)
    }
}

/// Pick the project to publish into
///
/// An explicitly configured project wins. Otherwise the metadata server is
/// asked, and when that fails too the empty placeholder is returned so
/// that startup can continue.
pub async fn resolve_project_id(
    configured: Option<ProjectId>,
    metadata: &MetadataClient,
) -> ProjectId {
    match configured.filter(|project| !project.is_placeholder()) {
        Some(project) => {
            info!(%project, "{}", log_messages::identity::PROJECT_CONFIGURED);
            project
        }
        None => metadata
            .project_id()
            .await
            .unwrap_or_else(ProjectId::placeholder),
    }
}
