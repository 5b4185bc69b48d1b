//! Infrastructure layer for Event Maker
//!
//! Channel transports, the metadata client used for project lookup, and
//! the HTTP plumbing they share.

pub mod constants;
pub mod http_client;
pub mod log_messages;
pub mod memory;
pub mod metadata;
pub mod pubsub;
pub mod writer;

pub use memory::MemoryChannel;
pub use metadata::{resolve_project_id, MetadataClient};
pub use pubsub::{PubSubChannel, PubSubOptions};
pub use writer::{StdoutChannel, WriterChannel};
