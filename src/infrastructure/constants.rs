//! Constants for the HTTP transports
//!
//! Endpoints, header values and JSON field names used by the Pub/Sub and
//! metadata clients.

/// Value sent in the `User-Agent` header of every outgoing request
pub const USER_AGENT: &str = "event-maker";

/// Default endpoints
pub mod endpoints {
    /// Local Pub/Sub emulator
    pub const PUBSUB_EMULATOR: &str = "http://localhost:8085";
    /// GCE metadata server
    pub const METADATA_SERVER: &str = "http://metadata.google.internal";
}

/// Environment variables honoured by the Google client libraries
pub mod env {
    pub const PUBSUB_EMULATOR_HOST: &str = "PUBSUB_EMULATOR_HOST";
    pub const GCE_METADATA_HOST: &str = "GCE_METADATA_HOST";
    pub const GCP_PROJECT: &str = "GCP_PROJECT";
}

/// URL paths
pub mod paths {
    pub const PUBSUB_API_VERSION: &str = "v1";
    pub const PUBLISH_SUFFIX: &str = ":publish";
    pub const METADATA_PROJECT_ID: &str = "/computeMetadata/v1/project/project-id";
}

/// Header names and values
pub mod headers {
    pub const METADATA_FLAVOR: &str = "Metadata-Flavor";
    pub const METADATA_FLAVOR_GOOGLE: &str = "Google";
    pub const APPLICATION_JSON: &str = "application/json";
    pub const BEARER_PREFIX: &str = "Bearer ";
}

